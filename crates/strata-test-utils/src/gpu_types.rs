//! Plain data shared between the renderer and a GPU device implementation.

use std::fmt;

/// The shader program a draw belongs to. One per batch kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Textured quads.
    Texture,
    /// Font glyphs sampled from an atlas.
    Font,
    /// Filled or bordered rectangles and circles.
    Shape,
    /// Thick line segments.
    Line,
}

impl ShaderKind {
    /// Whether draws with this shader sample a texture and so need
    /// [`GpuDevice::bind_texture`](crate::GpuDevice::bind_texture).
    pub const fn is_textured(self) -> bool {
        matches!(self, ShaderKind::Texture | ShaderKind::Font)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShaderKind::Texture => "texture",
            ShaderKind::Font => "font",
            ShaderKind::Shape => "shape",
            ShaderKind::Line => "line",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a GPU texture as understood by the device.
///
/// `0` is never a valid texture.
pub type TextureId = u32;
