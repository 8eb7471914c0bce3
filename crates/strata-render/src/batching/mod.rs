//! Per-kind batch accumulation.
//!
//! Draw requests become [`RenderItem`]s wrapping one of four batch item
//! kinds. Each kind has its own fixed-capacity [`Accumulator`]; when an
//! accumulator fills it notifies its observers so the batch can be drawn and
//! emptied before more items arrive.
//!
//! | Kind | Item | Shader | Textured |
//! |------|------|--------|----------|
//! | Texture | [`TextureBatchItem`] | `ShaderKind::Texture` | yes |
//! | Glyph | [`GlyphBatchItem`] | `ShaderKind::Font` | yes (atlas) |
//! | Shape | [`ShapeBatchItem`] | `ShaderKind::Shape` | no |
//! | Line | [`LineBatchItem`] | `ShaderKind::Line` | no |

mod accumulator;
mod items;
mod render_item;
mod vertex;

pub use accumulator::Accumulator;
pub use items::*;
pub use render_item::{BatchComparer, LayerStampComparer, RenderItem, RenderStamp, sort_render_items};
pub use vertex::{LineVertex, QuadVertex, ShapeVertex};

use std::fmt;

use strata_test_utils::ShaderKind;

use crate::messaging::MessageId;

/// An ordered set of render items of one kind.
pub type Batch<T> = Vec<RenderItem<T>>;

/// The four primitive kinds the renderer batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Texture,
    Glyph,
    Shape,
    Line,
}

impl BatchKind {
    /// The order the mediator processes kinds in. Stable across frames so
    /// draw call sequences are reproducible.
    pub const MEDIATION_ORDER: [BatchKind; 4] = [
        BatchKind::Texture,
        BatchKind::Glyph,
        BatchKind::Shape,
        BatchKind::Line,
    ];

    pub const fn shader(self) -> ShaderKind {
        match self {
            BatchKind::Texture => ShaderKind::Texture,
            BatchKind::Glyph => ShaderKind::Font,
            BatchKind::Shape => ShaderKind::Shape,
            BatchKind::Line => ShaderKind::Line,
        }
    }

    /// Pull request id answered with this kind's current items.
    pub const fn items_id(self) -> MessageId {
        match self {
            BatchKind::Texture => MessageId::TEXTURE_ITEMS,
            BatchKind::Glyph => MessageId::GLYPH_ITEMS,
            BatchKind::Shape => MessageId::SHAPE_ITEMS,
            BatchKind::Line => MessageId::LINE_ITEMS,
        }
    }

    /// Push event id carrying this kind's sorted, ready-to-draw batch.
    pub const fn ready_id(self) -> MessageId {
        match self {
            BatchKind::Texture => MessageId::TEXTURES_READY,
            BatchKind::Glyph => MessageId::GLYPHS_READY,
            BatchKind::Shape => MessageId::SHAPES_READY,
            BatchKind::Line => MessageId::LINES_READY,
        }
    }

    /// Label used for GPU debug groups and logs.
    pub const fn label(self) -> &'static str {
        match self {
            BatchKind::Texture => "Texture",
            BatchKind::Glyph => "Font",
            BatchKind::Shape => "Shape",
            BatchKind::Line => "Line",
        }
    }
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mediation_order() {
        assert_eq!(
            BatchKind::MEDIATION_ORDER,
            [
                BatchKind::Texture,
                BatchKind::Glyph,
                BatchKind::Shape,
                BatchKind::Line
            ]
        );
    }

    #[test]
    fn test_ids_are_distinct_per_kind() {
        let mut ids: Vec<_> = BatchKind::MEDIATION_ORDER
            .iter()
            .flat_map(|kind| [kind.items_id(), kind.ready_id()])
            .map(MessageId::get)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_glyphs_use_font_shader() {
        assert_eq!(BatchKind::Glyph.shader(), ShaderKind::Font);
        assert!(BatchKind::Glyph.shader().is_textured());
        assert!(!BatchKind::Line.shader().is_textured());
    }
}
