//! The font service consumed by the renderer, and text layout.
//!
//! The renderer does no shaping. A [`Font`] answers per-character metrics and
//! kerning; [`layout_text`] turns those into positioned glyph quads.

use strata_core::alloc::HashMap;
use strata_core::geometry::{Rect, Size};
use strata_core::math::{Vec2, rotate_around};

use crate::texture::Texture;

/// Character substituted for glyphs the font does not have.
pub const FALLBACK_GLYPH: char = '?';

/// Placement data for one character of a font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub glyph: char,
    /// Region of the atlas texture holding the glyph, in texels.
    pub atlas_bounds: Rect<f32>,
    /// Horizontal pen movement after this glyph.
    pub advance: f32,
    /// Offset from the pen to the glyph's left edge.
    pub bearing_x: f32,
    /// Distance from the baseline up to the glyph's top edge.
    pub bearing_y: f32,
}

/// A font the renderer can draw text with.
pub trait Font {
    fn name(&self) -> &str;

    /// The texture every glyph is sampled from.
    fn atlas(&self) -> &Texture;

    /// Nominal size in pixels. A size of zero draws nothing.
    fn size(&self) -> f32;

    /// Distance between consecutive baselines.
    fn line_spacing(&self) -> f32;

    /// Distance from the top of a line to its baseline.
    fn ascender(&self) -> f32 {
        self.size()
    }

    fn glyph(&self, ch: char) -> Option<GlyphMetrics>;

    /// Extra horizontal adjustment between `left` and `right`.
    fn kerning(&self, _left: char, _right: char) -> f32 {
        0.0
    }

    /// Metrics for `ch`, falling back to [`FALLBACK_GLYPH`].
    fn resolve(&self, ch: char) -> Option<GlyphMetrics> {
        self.glyph(ch).or_else(|| self.glyph(FALLBACK_GLYPH))
    }

    /// Bounding box of `text`: the widest line by the number of lines times
    /// the line spacing.
    fn measure(&self, text: &str) -> Size<f32> {
        if text.is_empty() {
            return Size::new(0.0, 0.0);
        }

        let mut width: f32 = 0.0;
        let mut lines = 0;
        for line in text.split('\n') {
            width = width.max(line_width(self, line));
            lines += 1;
        }
        Size::new(width, lines as f32 * self.line_spacing())
    }
}

/// Pen movement for `ch`, or `None` if the character is skipped.
fn advance_of<F: Font + ?Sized>(font: &F, ch: char) -> Option<f32> {
    if ch.is_whitespace() {
        // Whitespace without metrics still moves the pen.
        return Some(font.glyph(ch).map_or(font.size() / 4.0, |m| m.advance));
    }
    font.resolve(ch).map(|m| m.advance)
}

fn line_width<F: Font + ?Sized>(font: &F, line: &str) -> f32 {
    let mut width = 0.0;
    let mut prev = None;
    for ch in line.chars() {
        let Some(advance) = advance_of(font, ch) else {
            continue;
        };
        if let Some(prev) = prev {
            width += font.kerning(prev, ch);
        }
        width += advance;
        prev = Some(ch);
    }
    width
}

/// One glyph quad produced by [`layout_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub glyph: char,
    pub src_rect: Rect<f32>,
    /// Quad center after rotation.
    pub center: Vec2,
    pub size: Vec2,
}

/// Lay `text` out centered on `position`, rotated `angle` degrees around it.
///
/// Lines break on `'\n'`. Whitespace advances the pen without producing a
/// quad. Characters the font lacks are drawn as [`FALLBACK_GLYPH`] when it
/// exists and skipped otherwise.
pub fn layout_text(font: &dyn Font, text: &str, position: Vec2, angle: f32) -> Vec<PlacedGlyph> {
    let block = font.measure(text);
    let origin = position - Vec2::new(block.width, block.height) / 2.0;

    let mut placed = Vec::with_capacity(text.len());
    for (index, line) in text.split('\n').enumerate() {
        let baseline = origin.y + index as f32 * font.line_spacing() + font.ascender();
        let mut pen = origin.x;
        let mut prev = None;

        for ch in line.chars() {
            let Some(advance) = advance_of(font, ch) else {
                continue;
            };
            if let Some(prev) = prev {
                pen += font.kerning(prev, ch);
            }
            prev = Some(ch);

            if !ch.is_whitespace()
                && let Some(metrics) = font.resolve(ch)
            {
                let size = Vec2::new(metrics.atlas_bounds.width, metrics.atlas_bounds.height);
                let top_left = Vec2::new(pen + metrics.bearing_x, baseline - metrics.bearing_y);
                placed.push(PlacedGlyph {
                    glyph: metrics.glyph,
                    src_rect: metrics.atlas_bounds,
                    center: rotate_around(top_left + size / 2.0, position, angle),
                    size,
                });
            }

            pen += advance;
        }
    }
    placed
}

/// A table-driven font over a prebuilt atlas.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    name: String,
    atlas: Texture,
    size: f32,
    line_spacing: f32,
    glyphs: HashMap<char, GlyphMetrics>,
    kerning: HashMap<(char, char), f32>,
}

impl BitmapFont {
    pub fn new(name: impl Into<String>, atlas: Texture, size: f32, line_spacing: f32) -> Self {
        Self {
            name: name.into(),
            atlas,
            size,
            line_spacing,
            glyphs: HashMap::new(),
            kerning: HashMap::new(),
        }
    }

    /// A fixed-width font whose atlas is a grid of `cell`-sized glyphs,
    /// `columns` per row, holding `count` consecutive characters from `first`.
    pub fn monospace_grid(
        name: impl Into<String>,
        atlas: Texture,
        cell: Size<u32>,
        columns: u32,
        first: char,
        count: u32,
    ) -> Self {
        let cell_w = cell.width as f32;
        let cell_h = cell.height as f32;
        let mut font = Self::new(name, atlas, cell_h, cell_h);

        let columns = columns.max(1);
        for (index, code) in (first as u32..first as u32 + count).enumerate() {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            let index = index as u32;
            let col = index % columns;
            let row = index / columns;
            font.glyphs.insert(
                ch,
                GlyphMetrics {
                    glyph: ch,
                    atlas_bounds: Rect::new(col as f32 * cell_w, row as f32 * cell_h, cell_w, cell_h),
                    advance: cell_w,
                    bearing_x: 0.0,
                    bearing_y: cell_h,
                },
            );
        }
        font
    }

    pub fn with_glyph(mut self, metrics: GlyphMetrics) -> Self {
        self.glyphs.insert(metrics.glyph, metrics);
        self
    }

    pub fn with_kerning(mut self, left: char, right: char, amount: f32) -> Self {
        self.kerning.insert((left, right), amount);
        self
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

impl Font for BitmapFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn atlas(&self) -> &Texture {
        &self.atlas
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    fn glyph(&self, ch: char) -> Option<GlyphMetrics> {
        self.glyphs.get(&ch).copied()
    }

    fn kerning(&self, left: char, right: char) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 8x10 cells covering printable ASCII.
    fn ascii_font() -> BitmapFont {
        BitmapFont::monospace_grid(
            "ascii",
            Texture::new(9, "ascii atlas", 128, 60),
            Size::new(8, 10),
            16,
            ' ',
            95,
        )
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_grid_atlas_bounds() {
        let font = ascii_font();
        assert_eq!(font.glyph_count(), 95);
        // 'A' is index 33: column 1, row 2.
        let a = font.glyph('A').unwrap();
        assert_eq!(a.atlas_bounds, Rect::new(8.0, 20.0, 8.0, 10.0));
    }

    #[test]
    fn test_measure_uses_widest_line() {
        let font = ascii_font();
        assert_eq!(font.measure(""), Size::new(0.0, 0.0));
        assert_eq!(font.measure("abc"), Size::new(24.0, 10.0));
        assert_eq!(font.measure("abcd\nab"), Size::new(32.0, 20.0));
    }

    #[test]
    fn test_kerning_tightens_pairs() {
        let font = ascii_font().with_kerning('A', 'V', -2.0);
        assert_eq!(font.measure("AV").width, 14.0);
        assert_eq!(font.measure("VA").width, 16.0);
    }

    #[test]
    fn test_layout_centers_block_on_position() {
        let font = ascii_font();
        let glyphs = layout_text(&font, "ab", Vec2::new(100.0, 50.0), 0.0);

        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].center, Vec2::new(96.0, 50.0));
        assert_eq!(glyphs[1].center, Vec2::new(104.0, 50.0));
        assert_eq!(glyphs[0].size, Vec2::new(8.0, 10.0));
    }

    #[test]
    fn test_layout_skips_whitespace_but_advances() {
        let font = ascii_font();
        let glyphs = layout_text(&font, "a b\nc", Vec2::ZERO, 0.0);

        let chars: Vec<_> = glyphs.iter().map(|g| g.glyph).collect();
        assert_eq!(chars, vec!['a', 'b', 'c']);
        assert!(approx(glyphs[1].center.x - glyphs[0].center.x, 16.0));
        assert!(approx(glyphs[2].center.y - glyphs[0].center.y, 10.0));
    }

    #[test]
    fn test_missing_characters_fall_back_or_skip() {
        let font = ascii_font();
        let glyphs = layout_text(&font, "é", Vec2::ZERO, 0.0);
        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[0].glyph, '?');

        let bare = BitmapFont::new("bare", Texture::new(1, "atlas", 8, 8), 8.0, 8.0);
        assert!(layout_text(&bare, "xyz", Vec2::ZERO, 0.0).is_empty());
        assert_eq!(bare.measure("xyz").width, 0.0);
    }

    #[test]
    fn test_layout_rotates_around_position() {
        let font = ascii_font();
        let glyphs = layout_text(&font, "ab", Vec2::new(10.0, 10.0), 180.0);

        assert!(approx(glyphs[0].center.x, 14.0));
        assert!(approx(glyphs[1].center.x, 6.0));
        assert!(approx(glyphs[0].center.y, 10.0));
    }
}
