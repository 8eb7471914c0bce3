//! Batched Frame - Layered Drawing Through the Mediator
//!
//! Draws a few frames of sprites, text, shapes and lines on several layers
//! and logs what reached the GPU. The device is a `TracingGpuDevice`, so
//! every GPU call shows up in the log instead of on screen.
//!
//! The shape accumulator is deliberately small, so the busy frame flushes
//! it early and the stats report the extra draw.
//!
//! Run with:
//!   RUST_LOG=strata_render=debug cargo run -p strata-render --example batched_frame
//!
//! With the default `profiling` feature a puffin server is started on
//! 127.0.0.1:8585; connect puffin_viewer to it to see the frame scopes.

use std::sync::Arc;

use strata_core::geometry::{Rect, Size};
use strata_core::logging;
use strata_core::math::Vec2;
use strata_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use strata_render::{
    BatchKind, BitmapFont, CircleShape, Color, CornerRadius, FlipEffects, GradientType, Line,
    RectShape, RenderError, Renderer, RendererConfig, TextDraw, Texture, TextureDraw,
    TracingGpuDevice,
};

const FRAMES: u32 = 3;

fn main() -> Result<(), RenderError> {
    logging::init();
    init_profiling(ProfilingBackend::PuffinHttp);

    let config = RendererConfig::default()
        .with_batch_size(BatchKind::Shape, 64)
        .with_viewport(Size::new(1280, 720));
    let mut renderer = Renderer::new(Arc::new(TracingGpuDevice), config)?;

    let sheet = Texture::new(1, "sprites", 256, 256);
    let background = Texture::new(2, "background", 1280, 720);
    let font = BitmapFont::monospace_grid(
        "mono-16",
        Texture::new(3, "mono-16-atlas", 256, 128),
        Size::new(16, 16),
        16,
        ' ',
        95,
    );

    for frame in 0..FRAMES {
        new_frame();
        renderer.begin();
        renderer.clear();

        renderer.render_texture_with(
            &background,
            &TextureDraw::at(Vec2::new(640.0, 360.0)).on_layer(-10),
        )?;

        for i in 0..8 {
            let x = 80.0 + i as f32 * 48.0;
            let effects = if i % 2 == 0 {
                FlipEffects::empty()
            } else {
                FlipEffects::HORIZONTAL
            };
            renderer.render_texture_with(
                &sheet,
                &TextureDraw::at(Vec2::new(x, 200.0))
                    .with_src_rect(Rect::new((i % 4) as f32 * 32.0, 0.0, 32.0, 32.0))
                    .with_angle(frame as f32 * 0.1)
                    .with_effects(effects)
                    .on_layer(1),
            )?;
        }

        // One more shape than the accumulator holds on the last frame.
        let shape_count = if frame + 1 == FRAMES { 65 } else { 20 };
        for i in 0..shape_count {
            let position = Vec2::new(40.0 + (i % 16) as f32 * 76.0, 400.0 + (i / 16) as f32 * 60.0);
            if i % 3 == 0 {
                renderer.render_circle(
                    &CircleShape::new(position, 40.0).with_color(Color::GREEN),
                    0,
                )?;
            } else {
                renderer.render_rect(
                    &RectShape::new(position, 64.0, 48.0)
                        .with_corner_radius(CornerRadius::uniform(8.0))
                        .with_gradient(GradientType::Vertical, Color::BLUE, Color::WHITE),
                    0,
                )?;
            }
        }

        renderer.render_line(
            &Line::new(Vec2::new(0.0, 360.0), Vec2::new(1280.0, 360.0), Color::RED, 2.0),
            2,
        )?;
        renderer.render_line_between(Vec2::new(640.0, 0.0), Vec2::new(640.0, 720.0), Color::BLACK, 1.0)?;

        renderer.render_text_with(
            &font,
            &format!("frame {frame}"),
            &TextDraw::at(Vec2::new(640.0, 40.0))
                .with_color(Color::WHITE)
                .on_layer(5),
        )?;

        renderer.end()?;

        let stats = renderer.stats();
        tracing::info!(
            frame,
            draw_calls = stats.draw_calls,
            texture_binds = stats.texture_binds,
            items = stats.items_drawn,
            flushes = stats.flushes,
            "frame submitted"
        );
    }

    Ok(())
}
