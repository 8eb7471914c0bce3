use strata_core::geometry::{Rect, Size};
use strata_test_utils::TextureId;

/// An opaque, value-like handle to a texture owned by the GPU layer.
///
/// Id `0` is reserved for "no texture"; a handle with that id or with a zero
/// dimension is null and is rejected by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Texture {
    id: TextureId,
    name: String,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn new(id: TextureId, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
        }
    }

    /// The null handle.
    pub fn null() -> Self {
        Self::new(0, "", 0, 0)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width, self.height)
    }

    /// The whole texture as a source rectangle.
    pub fn bounds(&self) -> Rect<f32> {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn is_null(&self) -> bool {
        self.id == 0 || self.size().is_empty()
    }
}
