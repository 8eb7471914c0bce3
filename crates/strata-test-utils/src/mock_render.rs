//! Mock implementation of GpuDevice for testing.
//!
//! This module provides a GPU device that records every call without
//! touching a real graphics API.

use parking_lot::Mutex;
use strata_core::geometry::Size;

use crate::{
    gpu_device::GpuDevice,
    gpu_types::{ShaderKind, TextureId},
};

/// Records a GPU call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    BindTexture {
        texture_id: TextureId,
    },
    UseShader {
        shader: ShaderKind,
    },
    UploadVertexData {
        shader: ShaderKind,
        slot: u32,
        size: usize,
    },
    DrawIndexed {
        /// The shader active when the draw was issued.
        shader: Option<ShaderKind>,
        primitive_count: u32,
    },
    SetViewport {
        width: u32,
        height: u32,
    },
    Clear,
    SetClearColor {
        rgba: [f32; 4],
    },
    PushDebugGroup {
        label: String,
    },
    PopDebugGroup,
}

/// Mock implementation of GpuDevice for testing.
///
/// # Borrow Checking Pattern: Interior Mutability
///
/// Methods take `&self` but need to record calls, so state lives behind
/// `parking_lot::Mutex`, which keeps the type `Send + Sync` as the trait
/// requires.
///
/// ```rust
/// use strata_test_utils::{GpuCall, GpuDevice, MockGpuDevice};
///
/// let mock = MockGpuDevice::new();
/// mock.clear();
///
/// assert_eq!(mock.calls(), vec![GpuCall::Clear]);
/// ```
pub struct MockGpuDevice {
    /// Recorded calls for verification
    calls: Mutex<Vec<GpuCall>>,

    /// The shader made active by the most recent `use_shader`
    current_shader: Mutex<Option<ShaderKind>>,
}

impl MockGpuDevice {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            current_shader: Mutex::new(None),
        }
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<GpuCall> {
        self.calls.lock().clone()
    }

    /// Total number of `draw_indexed` calls.
    pub fn count_draws(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, GpuCall::DrawIndexed { .. }))
            .count()
    }

    /// Primitive counts of every draw issued while `shader` was active, in order.
    pub fn draws_for(&self, shader: ShaderKind) -> Vec<u32> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GpuCall::DrawIndexed {
                    shader: Some(active),
                    primitive_count,
                } if *active == shader => Some(*primitive_count),
                _ => None,
            })
            .collect()
    }

    /// Texture ids in bind order.
    pub fn bound_textures(&self) -> Vec<TextureId> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GpuCall::BindTexture { texture_id } => Some(*texture_id),
                _ => None,
            })
            .collect()
    }

    /// Slots uploaded for `shader`, in upload order.
    pub fn uploads_for(&self, shader: ShaderKind) -> Vec<u32> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GpuCall::UploadVertexData {
                    shader: uploaded,
                    slot,
                    ..
                } if *uploaded == shader => Some(*slot),
                _ => None,
            })
            .collect()
    }

    /// Shader switches in order.
    pub fn shaders_used(&self) -> Vec<ShaderKind> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GpuCall::UseShader { shader } => Some(*shader),
                _ => None,
            })
            .collect()
    }

    /// Labels of every debug group opened, in order.
    pub fn debug_groups(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                GpuCall::PushDebugGroup { label } => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: GpuCall) {
        self.calls.lock().push(call);
    }
}

impl Default for MockGpuDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuDevice for MockGpuDevice {
    fn bind_texture(&self, texture_id: TextureId) {
        self.record(GpuCall::BindTexture { texture_id });
    }

    fn use_shader(&self, shader: ShaderKind) {
        *self.current_shader.lock() = Some(shader);
        self.record(GpuCall::UseShader { shader });
    }

    fn upload_vertex_data(&self, shader: ShaderKind, slot: u32, data: &[u8]) {
        self.record(GpuCall::UploadVertexData {
            shader,
            slot,
            size: data.len(),
        });
    }

    fn draw_indexed(&self, primitive_count: u32) {
        let shader = *self.current_shader.lock();
        self.record(GpuCall::DrawIndexed {
            shader,
            primitive_count,
        });
    }

    fn set_viewport(&self, size: Size<u32>) {
        self.record(GpuCall::SetViewport {
            width: size.width,
            height: size.height,
        });
    }

    fn clear(&self) {
        self.record(GpuCall::Clear);
    }

    fn set_clear_color(&self, rgba: [f32; 4]) {
        self.record(GpuCall::SetClearColor { rgba });
    }

    fn push_debug_group(&self, label: &str) {
        self.record(GpuCall::PushDebugGroup {
            label: label.to_string(),
        });
    }

    fn pop_debug_group(&self) {
        self.record(GpuCall::PopDebugGroup);
    }
}
