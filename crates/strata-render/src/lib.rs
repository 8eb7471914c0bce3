//! Strata Render - 2D render batching and mediation.
//!
//! Per-frame draw requests for four primitive kinds (textured quads, font
//! glyphs, shapes and lines) are collected into fixed-capacity accumulators,
//! ordered by layer and insertion stamp, and turned into a minimal GPU call
//! sequence. The renderer never sorts or draws directly from its
//! accumulators: a [`RenderMediator`] pulls their contents, sorts them and
//! pushes them back over a [`MessageBus`], so either side can be replaced or
//! observed independently.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use strata_core::math::Vec2;
//! use strata_render::{Color, Line, RectShape, Renderer, RendererConfig, Texture, TextureDraw};
//! use strata_test_utils::TracingGpuDevice;
//!
//! let mut renderer = Renderer::new(Arc::new(TracingGpuDevice), RendererConfig::default())?;
//! let player = Texture::new(1, "player", 32, 32);
//!
//! renderer.begin();
//! renderer.render_texture_with(&player, &TextureDraw::at(Vec2::new(100.0, 80.0)).on_layer(1))?;
//! renderer.render_rect(&RectShape::new(Vec2::new(100.0, 80.0), 64.0, 64.0), 0)?;
//! renderer.render_line(&Line::new(Vec2::ZERO, Vec2::new(200.0, 0.0), Color::RED, 2.0), 2)?;
//! renderer.end()?;
//! # Ok::<(), strata_render::RenderError>(())
//! ```
//!
//! # Observing batches
//!
//! Any code holding the bus can watch sorted batches as they are drawn:
//!
//! ```
//! use std::sync::Arc;
//! use strata_render::{Batch, MessageId, PushReceiver, Renderer, RendererConfig, ShapeBatchItem};
//! use strata_test_utils::TracingGpuDevice;
//!
//! let renderer = Renderer::new(Arc::new(TracingGpuDevice), RendererConfig::default())?;
//! let _watch = renderer.bus().shapes.ready.subscribe(PushReceiver::new(
//!     MessageId::SHAPES_READY,
//!     |batch: &Batch<ShapeBatchItem>| println!("{} shapes", batch.len()),
//! ));
//! # Ok::<(), strata_render::RenderError>(())
//! ```

pub mod batching;
pub mod color;
pub mod config;
mod draw;
pub mod error;
pub mod font;
pub mod mediator;
pub mod messaging;
pub mod renderer;
pub mod shapes;
pub mod texture;

pub use batching::{
    Accumulator, Batch, BatchComparer, BatchItem, BatchKind, FlipEffects, GlyphBatchItem,
    LayerStampComparer, LineBatchItem, RenderItem, RenderStamp, ShapeBatchItem, TextureBatchItem,
};
pub use color::Color;
pub use config::RendererConfig;
pub use draw::FrameStats;
pub use error::{MessagingError, MessagingResult, RenderError, RenderResult};
pub use font::{BitmapFont, Font, GlyphMetrics};
pub use mediator::{Comparers, MediatorState, RenderMediator};
pub use messaging::{
    MessageBus, MessageId, PullReactable, PullResponder, PushReactable, PushReceiver, Subscription,
};
pub use renderer::{Renderer, TextDraw, TextureDraw};
pub use shapes::{CircleShape, CornerRadius, GradientType, Line, RectShape};
pub use texture::Texture;

// Re-export the GPU contract so callers need only this crate.
pub use strata_test_utils::{GpuDevice, ShaderKind, TextureId, TracingGpuDevice};
