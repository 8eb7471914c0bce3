use strata_core::geometry::{Rect, Size};
use strata_core::math::{PackedVec2, PackedVec4, Vec2};
use strata_test_utils::TextureId;

use super::BatchKind;
use super::vertex::{LineVertex, QuadVertex, ShapeVertex};
use crate::color::Color;
use crate::shapes::{CircleShape, CornerRadius, GradientType, Line, RectShape};

bitflags::bitflags! {
    /// Mirroring applied to a textured quad.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct FlipEffects: u8 {
        const HORIZONTAL = 1 << 0;
        const VERTICAL = 1 << 1;
    }
}

/// Plain data describing one draw of a given kind.
///
/// Items are small `Copy` values so accumulator slots can be overwritten in
/// place every frame.
pub trait BatchItem: Copy + Default + 'static {
    const KIND: BatchKind;

    type Vertex: bytemuck::Pod;

    /// The texture this item samples from, if any. Adjacent items sharing an
    /// id are drawn under a single bind.
    fn texture_id(&self) -> Option<TextureId>;

    /// Pack into the GPU-upload record.
    fn to_vertex(&self) -> Self::Vertex;
}

/// One textured quad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextureBatchItem {
    /// Region of the texture to sample, in texels.
    pub src_rect: Rect<f32>,
    /// `x`/`y` is the destination center; `width`/`height` the unscaled size.
    pub dest_rect: Rect<f32>,
    /// Scale applied to `dest_rect`'s size.
    pub size: Vec2,
    /// Degrees, clockwise, around the destination center.
    pub angle: f32,
    pub tint: Color,
    pub effects: FlipEffects,
    pub texture_id: TextureId,
    /// Viewport size when the item was recorded.
    pub view_size: Size<u32>,
}

impl TextureBatchItem {
    pub fn render_size(&self) -> Vec2 {
        Vec2::new(
            self.dest_rect.width * self.size.x,
            self.dest_rect.height * self.size.y,
        )
    }
}

fn packed_src(src: Rect<f32>, effects: FlipEffects) -> PackedVec4 {
    let width = if effects.contains(FlipEffects::HORIZONTAL) {
        -src.width
    } else {
        src.width
    };
    let height = if effects.contains(FlipEffects::VERTICAL) {
        -src.height
    } else {
        src.height
    };
    PackedVec4::from([src.x, src.y, width, height])
}

fn packed_view(view: Size<u32>) -> PackedVec2 {
    PackedVec2::from(Vec2::new(view.width as f32, view.height as f32))
}

impl BatchItem for TextureBatchItem {
    const KIND: BatchKind = BatchKind::Texture;

    type Vertex = QuadVertex;

    fn texture_id(&self) -> Option<TextureId> {
        Some(self.texture_id)
    }

    fn to_vertex(&self) -> QuadVertex {
        let size = self.render_size();
        QuadVertex {
            src: packed_src(self.src_rect, self.effects),
            dest: PackedVec4::from([self.dest_rect.x, self.dest_rect.y, size.x, size.y]),
            tint: self.tint.to_packed(),
            view_size: packed_view(self.view_size),
            angle: self.angle,
            _pad: 0.0,
        }
    }
}

/// One glyph quad sampled from a font atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphBatchItem {
    pub glyph: char,
    /// Atlas region of the glyph, in texels.
    pub src_rect: Rect<f32>,
    /// `x`/`y` is the glyph center after rotation; `width`/`height` its size.
    pub dest_rect: Rect<f32>,
    pub angle: f32,
    pub tint: Color,
    pub view_size: Size<u32>,
    /// The font atlas.
    pub texture_id: TextureId,
}

impl BatchItem for GlyphBatchItem {
    const KIND: BatchKind = BatchKind::Glyph;

    type Vertex = QuadVertex;

    fn texture_id(&self) -> Option<TextureId> {
        Some(self.texture_id)
    }

    fn to_vertex(&self) -> QuadVertex {
        QuadVertex {
            src: packed_src(self.src_rect, FlipEffects::empty()),
            dest: PackedVec4::from([
                self.dest_rect.x,
                self.dest_rect.y,
                self.dest_rect.width,
                self.dest_rect.height,
            ]),
            tint: self.tint.to_packed(),
            view_size: packed_view(self.view_size),
            angle: self.angle,
            _pad: 0.0,
        }
    }
}

/// One rectangle or circle. Circles are rectangles whose corner radii equal
/// half their diameter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeBatchItem {
    /// Center.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub is_solid: bool,
    pub border_thickness: f32,
    pub corner_radius: CornerRadius,
    pub gradient_type: GradientType,
    pub gradient_start: Color,
    pub gradient_stop: Color,
}

impl BatchItem for ShapeBatchItem {
    const KIND: BatchKind = BatchKind::Shape;

    type Vertex = ShapeVertex;

    fn texture_id(&self) -> Option<TextureId> {
        None
    }

    fn to_vertex(&self) -> ShapeVertex {
        ShapeVertex {
            rect: PackedVec4::from([self.position.x, self.position.y, self.width, self.height]),
            color: self.color.to_packed(),
            gradient_start: self.gradient_start.to_packed(),
            gradient_stop: self.gradient_stop.to_packed(),
            corner_radius: PackedVec4::from(self.corner_radius.to_array()),
            border_thickness: self.border_thickness,
            is_solid: if self.is_solid { 1.0 } else { 0.0 },
            gradient_type: self.gradient_type.as_f32(),
            _pad: 0.0,
        }
    }
}

impl From<&RectShape> for ShapeBatchItem {
    fn from(rect: &RectShape) -> Self {
        Self {
            position: rect.position,
            width: rect.width(),
            height: rect.height(),
            color: rect.style.color,
            is_solid: rect.style.is_solid,
            border_thickness: rect.border_thickness(),
            corner_radius: rect.corner_radius(),
            gradient_type: rect.style.gradient_type,
            gradient_start: rect.style.gradient_start,
            gradient_stop: rect.style.gradient_stop,
        }
    }
}

impl From<&CircleShape> for ShapeBatchItem {
    fn from(circle: &CircleShape) -> Self {
        Self {
            position: circle.position,
            width: circle.diameter(),
            height: circle.diameter(),
            color: circle.style.color,
            is_solid: circle.style.is_solid,
            border_thickness: circle.border_thickness(),
            corner_radius: CornerRadius::uniform(circle.radius()),
            gradient_type: circle.style.gradient_type,
            gradient_start: circle.style.gradient_start,
            gradient_stop: circle.style.gradient_stop,
        }
    }
}

/// One line segment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineBatchItem {
    pub p1: Vec2,
    pub p2: Vec2,
    pub color: Color,
    pub thickness: f32,
}

impl BatchItem for LineBatchItem {
    const KIND: BatchKind = BatchKind::Line;

    type Vertex = LineVertex;

    fn texture_id(&self) -> Option<TextureId> {
        None
    }

    fn to_vertex(&self) -> LineVertex {
        LineVertex {
            p1: self.p1.into(),
            p2: self.p2.into(),
            color: self.color.to_packed(),
            thickness: self.thickness,
            _pad: [0.0; 3],
        }
    }
}

impl From<&Line> for LineBatchItem {
    fn from(line: &Line) -> Self {
        Self {
            p1: line.p1,
            p2: line.p2,
            color: line.color,
            thickness: line.thickness(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flips_mirror_source_rect() {
        let item = TextureBatchItem {
            src_rect: Rect::new(4.0, 8.0, 16.0, 32.0),
            effects: FlipEffects::HORIZONTAL | FlipEffects::VERTICAL,
            ..Default::default()
        };
        let vertex = item.to_vertex();
        assert_eq!(vertex.src.z, -16.0);
        assert_eq!(vertex.src.w, -32.0);

        let item = TextureBatchItem {
            effects: FlipEffects::VERTICAL,
            ..item
        };
        assert_eq!(item.to_vertex().src.z, 16.0);
    }

    #[test]
    fn test_texture_vertex_applies_scale() {
        let item = TextureBatchItem {
            dest_rect: Rect::new(100.0, 50.0, 20.0, 10.0),
            size: Vec2::new(2.0, 3.0),
            view_size: Size::new(800, 600),
            texture_id: 7,
            ..Default::default()
        };
        let vertex = item.to_vertex();
        assert_eq!(vertex.dest, PackedVec4::from([100.0, 50.0, 40.0, 30.0]));
        assert_eq!(vertex.view_size, PackedVec2::from(Vec2::new(800.0, 600.0)));
        assert_eq!(item.texture_id(), Some(7));
    }

    #[test]
    fn test_circle_becomes_fully_rounded_shape() {
        let circle = CircleShape::new(Vec2::new(5.0, 5.0), 30.0).with_solid(false);
        let item = ShapeBatchItem::from(&circle);
        assert_eq!(item.width, 30.0);
        assert_eq!(item.corner_radius, CornerRadius::uniform(15.0));
        assert!(!item.is_solid);
        assert_eq!(item.texture_id(), None);
        assert_eq!(item.to_vertex().is_solid, 0.0);
    }

    #[test]
    fn test_rect_carries_gradient() {
        let rect = RectShape::new(Vec2::ZERO, 10.0, 10.0).with_gradient(
            GradientType::Vertical,
            Color::RED,
            Color::BLUE,
        );
        let vertex = ShapeBatchItem::from(&rect).to_vertex();
        assert_eq!(vertex.gradient_type, 2.0);
        assert_eq!(vertex.gradient_start, Color::RED.to_packed());
        assert_eq!(vertex.gradient_stop, Color::BLUE.to_packed());
    }

    #[test]
    fn test_line_item_uses_clamped_thickness() {
        let line = Line::new(Vec2::ZERO, Vec2::ONE, Color::GREEN, 0.0);
        let item = LineBatchItem::from(&line);
        assert_eq!(item.thickness, 1.0);
        assert_eq!(item.to_vertex().thickness, 1.0);
    }
}
