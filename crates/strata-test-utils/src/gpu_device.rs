//! Trait abstracting the GPU invocation layer.

use strata_core::geometry::Size;

use crate::gpu_types::{ShaderKind, TextureId};

/// The immediate-mode GPU calls the renderer issues.
///
/// The renderer only calls these from its end-of-frame draw phase and from
/// `clear`, `on_resize` and its property setters; never while accumulating.
///
/// # Borrow Checking Pattern
///
/// Methods take `&self` and return nothing borrowed, so one device can be
/// shared as `Arc<dyn GpuDevice>` and mock implementations record calls
/// behind a `Mutex`.
///
/// ```rust
/// use strata_test_utils::{GpuDevice, ShaderKind};
///
/// fn draw_one(gpu: &dyn GpuDevice, bytes: &[u8]) {
///     gpu.use_shader(ShaderKind::Line);
///     gpu.upload_vertex_data(ShaderKind::Line, 0, bytes);
///     gpu.draw_indexed(1);
/// }
/// ```
pub trait GpuDevice: Send + Sync {
    /// Bind a texture for subsequent textured draws.
    fn bind_texture(&self, texture_id: TextureId);

    /// Make `shader` the active program.
    fn use_shader(&self, shader: ShaderKind);

    /// Upload the packed vertex record for one batch slot.
    fn upload_vertex_data(&self, shader: ShaderKind, slot: u32, data: &[u8]);

    /// Draw `primitive_count` quads from the uploaded slots, starting at slot 0.
    fn draw_indexed(&self, primitive_count: u32);

    fn set_viewport(&self, size: Size<u32>);

    /// Clear the current framebuffer with the clear color.
    fn clear(&self);

    fn set_clear_color(&self, rgba: [f32; 4]);

    /// Open a labeled debug scope, visible in graphics debuggers.
    fn push_debug_group(&self, label: &str);

    fn pop_debug_group(&self);
}

/// A device that performs no GPU work and only logs each call at `trace`
/// level. Useful for headless runs.
#[derive(Debug, Default)]
pub struct TracingGpuDevice;

impl GpuDevice for TracingGpuDevice {
    fn bind_texture(&self, texture_id: TextureId) {
        tracing::trace!(texture_id, "bind_texture");
    }

    fn use_shader(&self, shader: ShaderKind) {
        tracing::trace!(%shader, "use_shader");
    }

    fn upload_vertex_data(&self, shader: ShaderKind, slot: u32, data: &[u8]) {
        tracing::trace!(%shader, slot, bytes = data.len(), "upload_vertex_data");
    }

    fn draw_indexed(&self, primitive_count: u32) {
        tracing::trace!(primitive_count, "draw_indexed");
    }

    fn set_viewport(&self, size: Size<u32>) {
        tracing::trace!(width = size.width, height = size.height, "set_viewport");
    }

    fn clear(&self) {
        tracing::trace!("clear");
    }

    fn set_clear_color(&self, rgba: [f32; 4]) {
        tracing::trace!(?rgba, "set_clear_color");
    }

    fn push_debug_group(&self, label: &str) {
        tracing::trace!(label, "push_debug_group");
    }

    fn pop_debug_group(&self) {
        tracing::trace!("pop_debug_group");
    }
}
