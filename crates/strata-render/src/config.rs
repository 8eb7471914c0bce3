use strata_core::geometry::Size;

use crate::batching::BatchKind;
use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// Default capacity of every accumulator.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Construction-time settings of a [`Renderer`](crate::Renderer).
///
/// ```
/// use strata_render::{BatchKind, Color, RendererConfig};
/// use strata_core::geometry::Size;
///
/// let config = RendererConfig::default()
///     .with_batch_size(BatchKind::Line, 64)
///     .with_viewport(Size::new(1280, 720))
///     .with_clear_color(Color::BLACK);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub texture_batch_size: usize,
    pub glyph_batch_size: usize,
    pub shape_batch_size: usize,
    pub line_batch_size: usize,
    pub viewport: Size<u32>,
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_batch_size: DEFAULT_BATCH_SIZE,
            glyph_batch_size: DEFAULT_BATCH_SIZE,
            shape_batch_size: DEFAULT_BATCH_SIZE,
            line_batch_size: DEFAULT_BATCH_SIZE,
            viewport: Size::new(800, 600),
            clear_color: Color::CORNFLOWER_BLUE,
        }
    }
}

impl RendererConfig {
    pub fn batch_size(&self, kind: BatchKind) -> usize {
        match kind {
            BatchKind::Texture => self.texture_batch_size,
            BatchKind::Glyph => self.glyph_batch_size,
            BatchKind::Shape => self.shape_batch_size,
            BatchKind::Line => self.line_batch_size,
        }
    }

    pub fn with_batch_size(mut self, kind: BatchKind, size: usize) -> Self {
        match kind {
            BatchKind::Texture => self.texture_batch_size = size,
            BatchKind::Glyph => self.glyph_batch_size = size,
            BatchKind::Shape => self.shape_batch_size = size,
            BatchKind::Line => self.line_batch_size = size,
        }
        self
    }

    /// Same capacity for every kind.
    pub fn with_uniform_batch_size(self, size: usize) -> Self {
        BatchKind::MEDIATION_ORDER
            .into_iter()
            .fold(self, |config, kind| config.with_batch_size(kind, size))
    }

    pub fn with_viewport(mut self, viewport: Size<u32>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn validate(&self) -> RenderResult<()> {
        for kind in BatchKind::MEDIATION_ORDER {
            if self.batch_size(kind) == 0 {
                return Err(RenderError::InvalidConfig(format!(
                    "{} batch size must be greater than zero",
                    kind
                )));
            }
        }
        Ok(())
    }
}
