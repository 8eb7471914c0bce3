//! GPU invocation contract and test utilities for Strata.
//!
//! The batching core never talks to a graphics API directly. Everything it
//! needs from the GPU goes through the [`GpuDevice`] trait:
//!
//! - [`GpuDevice`] - Trait abstracting the immediate-mode GPU calls
//! - [`TracingGpuDevice`] - Implementation that only logs calls
//! - `MockGpuDevice` - Recording implementation for tests (requires `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use strata_test_utils::{GpuDevice, MockGpuDevice, ShaderKind};
//!
//! let mock = MockGpuDevice::new();
//! mock.use_shader(ShaderKind::Texture);
//! mock.bind_texture(3);
//! mock.draw_indexed(2);
//!
//! assert_eq!(mock.draws_for(ShaderKind::Texture), vec![2]);
//! assert_eq!(mock.bound_textures(), vec![3]);
//! # }
//! ```
//!
//! # Object Safety
//!
//! `GpuDevice` is object-safe and takes `&self` everywhere, so a renderer can
//! hold an `Arc<dyn GpuDevice>` and mock implementations record calls through
//! interior mutability.

pub mod gpu_device;
pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;

pub use gpu_device::*;
pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
