//! Strata - layered 2D render batching
//!
//! Strata collects per-frame draw requests into fixed-capacity batches,
//! orders them by layer and submission order, and hands them to a GPU
//! device with as few state changes as possible.
//!
//! - **Core**: logging bootstrap, puffin profiling hooks, geometry and math
//! - **Render**: accumulators, the message bus, the mediator and the renderer
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use strata::prelude::*;
//!
//! strata::core::logging::init();
//!
//! let mut renderer = Renderer::new(Arc::new(TracingGpuDevice), RendererConfig::default())?;
//! renderer.begin();
//! renderer.render_circle(&CircleShape::new(Vec2::new(50.0, 50.0), 20.0), 0)?;
//! renderer.end()?;
//! # Ok::<(), RenderError>(())
//! ```
//!
//! # Features
//!
//! - `render` (default) - the batching renderer
//! - `profiling` (default) - puffin scopes on the hot paths
//! - `mock` - the recording `MockGpuDevice` for tests

pub use strata_core as core;
pub use strata_core::math;

#[cfg(feature = "render")]
pub use strata_render as render;

pub use strata_test_utils::{GpuDevice, ShaderKind, TextureId, TracingGpuDevice};

#[cfg(feature = "mock")]
pub use strata_test_utils::{GpuCall, MockGpuDevice};

/// Prelude module for convenient imports
pub mod prelude {
    pub use strata_core::geometry::{Pos, Rect, Size};
    pub use strata_core::math::{Vec2, Vec4};

    pub use strata_test_utils::{GpuDevice, TracingGpuDevice};

    #[cfg(feature = "render")]
    pub use strata_render::{
        BatchKind, BitmapFont, CircleShape, Color, CornerRadius, FlipEffects, Font, GradientType,
        Line, RectShape, RenderError, RenderResult, Renderer, RendererConfig, TextDraw, Texture,
        TextureDraw,
    };
}

#[cfg(all(test, feature = "render"))]
mod tests {
    use std::sync::Arc;

    use strata_test_utils::MockGpuDevice;

    use super::prelude::*;

    #[test]
    fn test_prelude_draws_a_frame() {
        let gpu = Arc::new(MockGpuDevice::new());
        let mut renderer = Renderer::new(gpu.clone(), RendererConfig::default()).unwrap();

        renderer.begin();
        renderer
            .render_rect(&RectShape::new(Vec2::new(10.0, 10.0), 4.0, 4.0), 0)
            .unwrap();
        renderer.end().unwrap();

        assert_eq!(gpu.count_draws(), 1);
    }
}
