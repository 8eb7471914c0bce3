//! Simple frame using the `strata` prelude.
//!
//! Run with: cargo run -p strata --example simple_frame

use std::sync::Arc;

use strata::prelude::*;

fn main() -> Result<(), RenderError> {
    strata::core::logging::init();

    let mut renderer = Renderer::new(Arc::new(TracingGpuDevice), RendererConfig::default())?;
    let sprite = Texture::new(1, "sprite", 64, 64);

    renderer.begin();
    renderer.clear();
    renderer.render_texture(&sprite, 400.0, 300.0)?;
    renderer.render_rect(
        &RectShape::new(Vec2::new(400.0, 300.0), 96.0, 96.0)
            .with_solid(false)
            .with_border_thickness(3.0),
        1,
    )?;
    renderer.end()?;

    let stats = renderer.stats();
    tracing::info!(draw_calls = stats.draw_calls, "done");
    Ok(())
}
