//! The renderer front door.
//!
//! # Frame lifecycle
//!
//! ```text
//! NotBegun --begin()--> Begun --end()--> NotBegun
//! ```
//!
//! Draw calls are only accepted while `Begun`. They validate their input,
//! build one batch item per primitive and add it to that kind's accumulator;
//! no GPU call is made while accumulating. `end()` signals
//! [`MessageId::BATCH_END`], the mediator pushes every kind's sorted batch
//! back, the renderer draws each one and then empties the accumulators on
//! [`MessageId::BATCHES_EMPTIED`].
//!
//! An accumulator that fills mid-frame is drawn and emptied immediately
//! through [`MessageId::BATCH_FILLED`], so no draw is ever dropped.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use strata_core::geometry::{Rect, Size};
use strata_core::math::Vec2;
use strata_core::profiling::profile_function;
use strata_test_utils::GpuDevice;

use crate::batching::{
    Accumulator, Batch, BatchItem, BatchKind, FlipEffects, GlyphBatchItem, LayerStampComparer,
    LineBatchItem, RenderItem, ShapeBatchItem, TextureBatchItem, sort_render_items,
};
use crate::color::Color;
use crate::config::RendererConfig;
use crate::draw::{BatchDrawer, FrameStats};
use crate::error::{RenderError, RenderResult};
use crate::font::{Font, layout_text};
use crate::mediator::RenderMediator;
use crate::messaging::{
    BatchChannels, MessageBus, MessageId, PullResponder, PushReceiver, Subscription,
};
use crate::shapes::{CircleShape, Line, RectShape};
use crate::texture::Texture;

/// Options for a textured draw.
///
/// ```
/// use strata_render::{Color, FlipEffects, TextureDraw};
/// use strata_core::math::Vec2;
///
/// let draw = TextureDraw::at(Vec2::new(64.0, 32.0))
///     .with_angle(45.0)
///     .with_color(Color::RED)
///     .with_effects(FlipEffects::HORIZONTAL)
///     .on_layer(2);
/// assert_eq!(draw.layer, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDraw {
    /// Destination center.
    pub position: Vec2,
    /// Region to sample; the whole texture when `None`.
    pub src_rect: Option<Rect<f32>>,
    /// Unscaled destination size; the source size when `None`.
    pub dest_size: Option<Vec2>,
    pub scale: Vec2,
    /// Degrees, clockwise.
    pub angle: f32,
    pub color: Color,
    pub effects: FlipEffects,
    pub layer: i32,
}

impl Default for TextureDraw {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            src_rect: None,
            dest_size: None,
            scale: Vec2::ONE,
            angle: 0.0,
            color: Color::WHITE,
            effects: FlipEffects::empty(),
            layer: 0,
        }
    }
}

impl TextureDraw {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_src_rect(mut self, src_rect: Rect<f32>) -> Self {
        self.src_rect = Some(src_rect);
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.dest_size = Some(size);
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_effects(mut self, effects: FlipEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}

/// Options for a text draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextDraw {
    /// Center of the text block.
    pub position: Vec2,
    /// Degrees, clockwise, around `position`.
    pub angle: f32,
    pub color: Color,
    pub layer: i32,
}

impl Default for TextDraw {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            color: Color::WHITE,
            layer: 0,
        }
    }
}

impl TextDraw {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}

/// State shared with the closures registered on the bus. They hold it
/// weakly so the renderer and the bus never keep each other alive.
struct RendererShared {
    bus: MessageBus,
    drawer: BatchDrawer,
    textures: Accumulator<TextureBatchItem>,
    glyphs: Accumulator<GlyphBatchItem>,
    shapes: Accumulator<ShapeBatchItem>,
    lines: Accumulator<LineBatchItem>,
    begun: Cell<bool>,
    viewport: Cell<Size<u32>>,
    clear_color: Cell<Color>,
    /// Set when a kind's ready batch reached this renderer's drawer, in
    /// `MEDIATION_ORDER`.
    delivered: [Cell<bool>; 4],
}

/// Ties a batch item type to its accumulator and bus channels.
trait KindSlots: BatchItem {
    fn accumulator(shared: &RendererShared) -> &Accumulator<Self>;
    fn channels(bus: &MessageBus) -> &BatchChannels<Self>;
}

impl KindSlots for TextureBatchItem {
    fn accumulator(shared: &RendererShared) -> &Accumulator<Self> {
        &shared.textures
    }

    fn channels(bus: &MessageBus) -> &BatchChannels<Self> {
        &bus.textures
    }
}

impl KindSlots for GlyphBatchItem {
    fn accumulator(shared: &RendererShared) -> &Accumulator<Self> {
        &shared.glyphs
    }

    fn channels(bus: &MessageBus) -> &BatchChannels<Self> {
        &bus.glyphs
    }
}

impl KindSlots for ShapeBatchItem {
    fn accumulator(shared: &RendererShared) -> &Accumulator<Self> {
        &shared.shapes
    }

    fn channels(bus: &MessageBus) -> &BatchChannels<Self> {
        &bus.shapes
    }
}

impl KindSlots for LineBatchItem {
    fn accumulator(shared: &RendererShared) -> &Accumulator<Self> {
        &shared.lines
    }

    fn channels(bus: &MessageBus) -> &BatchChannels<Self> {
        &bus.lines
    }
}

impl RendererShared {
    fn accumulated_len(&self, kind: BatchKind) -> usize {
        match kind {
            BatchKind::Texture => self.textures.len(),
            BatchKind::Glyph => self.glyphs.len(),
            BatchKind::Shape => self.shapes.len(),
            BatchKind::Line => self.lines.len(),
        }
    }

    fn empty(&self, kind: BatchKind) {
        match kind {
            BatchKind::Texture => self.textures.empty(),
            BatchKind::Glyph => self.glyphs.empty(),
            BatchKind::Shape => self.shapes.empty(),
            BatchKind::Line => self.lines.empty(),
        }
    }

    fn delivered(&self, kind: BatchKind) -> &Cell<bool> {
        match kind {
            BatchKind::Texture => &self.delivered[0],
            BatchKind::Glyph => &self.delivered[1],
            BatchKind::Shape => &self.delivered[2],
            BatchKind::Line => &self.delivered[3],
        }
    }

    fn empty_all(&self) {
        for kind in BatchKind::MEDIATION_ORDER {
            self.empty(kind);
        }
    }

    /// Draw one kind without a mediator, sorted by layer then stamp.
    fn draw_unmediated<T: KindSlots>(&self) {
        let mut batch = T::accumulator(self).rendered_items();
        sort_render_items(&mut batch, &LayerStampComparer);
        self.drawer.draw(&batch);
    }

    fn draw_unmediated_kind(&self, kind: BatchKind) {
        match kind {
            BatchKind::Texture => self.draw_unmediated::<TextureBatchItem>(),
            BatchKind::Glyph => self.draw_unmediated::<GlyphBatchItem>(),
            BatchKind::Shape => self.draw_unmediated::<ShapeBatchItem>(),
            BatchKind::Line => self.draw_unmediated::<LineBatchItem>(),
        }
    }

    /// Draw and empty a kind whose accumulator just filled.
    fn flush(&self, kind: BatchKind) {
        profile_function!();

        tracing::debug!(%kind, items = self.accumulated_len(kind), "Flushing full batch");

        // Listeners on the filled channel are not necessarily a mediator;
        // only a batch that came back through the ready channel counts.
        self.delivered(kind).set(false);
        self.bus.filled.push(MessageId::BATCH_FILLED, &kind);
        if !self.delivered(kind).get() {
            self.draw_unmediated_kind(kind);
        }

        self.drawer.record_flush();
        self.empty(kind);
    }

    fn end_frame(&self) {
        profile_function!();

        for kind in BatchKind::MEDIATION_ORDER {
            self.delivered(kind).set(false);
        }

        self.bus.end_batch();

        for kind in BatchKind::MEDIATION_ORDER {
            if !self.delivered(kind).get() {
                self.draw_unmediated_kind(kind);
            }
        }
        // A mediator has already emptied everything through BATCHES_EMPTIED.
        self.empty_all();
    }
}

/// Accepts draw requests for one frame at a time and turns them into
/// batched GPU work.
///
/// ```
/// use std::sync::Arc;
/// use strata_render::{Renderer, RendererConfig, RectShape, Color};
/// use strata_core::math::Vec2;
/// use strata_test_utils::TracingGpuDevice;
///
/// let mut renderer = Renderer::new(Arc::new(TracingGpuDevice), RendererConfig::default())?;
/// renderer.begin();
/// renderer.render_rect(&RectShape::new(Vec2::new(40.0, 40.0), 20.0, 10.0).with_color(Color::RED), 0)?;
/// renderer.end()?;
/// # Ok::<(), strata_render::RenderError>(())
/// ```
pub struct Renderer {
    shared: Rc<RendererShared>,
    mediator: Option<RenderMediator>,
    subscriptions: Vec<Subscription>,
}

impl Renderer {
    /// A renderer with its own bus and mediator.
    pub fn new(gpu: Arc<dyn GpuDevice>, config: RendererConfig) -> RenderResult<Self> {
        let bus = MessageBus::new();
        let mut renderer = Self::with_bus(gpu, config, bus)?;
        renderer.mediator = Some(RenderMediator::new(&renderer.shared.bus));
        Ok(renderer)
    }

    /// A renderer wired into an existing bus. No mediator is created; any
    /// kind whose sorted batch does not come back over the bus is sorted and
    /// drawn by the renderer itself.
    ///
    /// Fails with [`RenderError::Messaging`] if another renderer already
    /// answers item pulls on `bus`.
    pub fn with_bus(
        gpu: Arc<dyn GpuDevice>,
        config: RendererConfig,
        bus: MessageBus,
    ) -> RenderResult<Self> {
        profile_function!();
        config.validate()?;

        let shared = Rc::new(RendererShared {
            bus,
            drawer: BatchDrawer::new(gpu),
            textures: Accumulator::new(config.texture_batch_size),
            glyphs: Accumulator::new(config.glyph_batch_size),
            shapes: Accumulator::new(config.shape_batch_size),
            lines: Accumulator::new(config.line_batch_size),
            begun: Cell::new(false),
            viewport: Cell::new(config.viewport),
            clear_color: Cell::new(config.clear_color),
            delivered: Default::default(),
        });

        let mut subscriptions = Vec::new();
        wire_kind::<TextureBatchItem>(&shared, &mut subscriptions)?;
        wire_kind::<GlyphBatchItem>(&shared, &mut subscriptions)?;
        wire_kind::<ShapeBatchItem>(&shared, &mut subscriptions)?;
        wire_kind::<LineBatchItem>(&shared, &mut subscriptions)?;

        let weak = Rc::downgrade(&shared);
        subscriptions.push(
            shared.bus.signals.subscribe(
                PushReceiver::new(MessageId::BATCHES_EMPTIED, move |_: &()| {
                    if let Some(shared) = weak.upgrade() {
                        shared.empty_all();
                    }
                })
                .with_name("renderer batches emptied"),
            ),
        );

        let gpu = shared.drawer.gpu();
        gpu.set_viewport(config.viewport);
        gpu.set_clear_color(config.clear_color.to_array());

        tracing::info!(
            viewport = ?config.viewport,
            texture_batch = config.texture_batch_size,
            glyph_batch = config.glyph_batch_size,
            shape_batch = config.shape_batch_size,
            line_batch = config.line_batch_size,
            "Renderer created"
        );

        Ok(Self {
            shared,
            mediator: None,
            subscriptions,
        })
    }

    pub fn bus(&self) -> &MessageBus {
        &self.shared.bus
    }

    pub fn mediator(&self) -> Option<&RenderMediator> {
        self.mediator.as_ref()
    }

    /// Start accepting draw calls. Calling it again before `end()` does
    /// nothing.
    pub fn begin(&mut self) {
        if self.shared.begun.get() {
            tracing::trace!("begin() called while already begun");
            return;
        }
        self.shared.begun.set(true);
        self.shared.drawer.reset_stats();
    }

    /// Draw everything accumulated since `begin()` and stop accepting draws.
    pub fn end(&mut self) -> RenderResult<()> {
        self.ensure_begun("end")?;
        self.shared.end_frame();
        self.shared.begun.set(false);
        Ok(())
    }

    pub fn is_begun(&self) -> bool {
        self.shared.begun.get()
    }

    /// Clear the target with the current clear color.
    pub fn clear(&self) {
        let gpu = self.shared.drawer.gpu();
        gpu.set_clear_color(self.shared.clear_color.get().to_array());
        gpu.clear();
    }

    pub fn on_resize(&mut self, size: Size<u32>) {
        tracing::debug!(width = size.width, height = size.height, "Viewport resized");
        self.shared.viewport.set(size);
        self.shared.drawer.gpu().set_viewport(size);
    }

    pub fn viewport_size(&self) -> Size<u32> {
        self.shared.viewport.get()
    }

    pub fn clear_color(&self) -> Color {
        self.shared.clear_color.get()
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.shared.clear_color.set(color);
        self.shared.drawer.gpu().set_clear_color(color.to_array());
    }

    /// Counters since the last `begin()`.
    pub fn stats(&self) -> FrameStats {
        self.shared.drawer.stats()
    }

    /// Items of `kind` waiting to be drawn.
    pub fn pending(&self, kind: BatchKind) -> usize {
        self.shared.accumulated_len(kind)
    }

    fn ensure_begun(&self, operation: &'static str) -> RenderResult<()> {
        if self.shared.begun.get() {
            Ok(())
        } else {
            Err(RenderError::NotBegun { operation })
        }
    }

    /// Draw the whole `texture` centered on (`x`, `y`).
    pub fn render_texture(&mut self, texture: &Texture, x: f32, y: f32) -> RenderResult<()> {
        self.render_texture_with(texture, &TextureDraw::at(Vec2::new(x, y)))
    }

    pub fn render_texture_with(&mut self, texture: &Texture, draw: &TextureDraw) -> RenderResult<()> {
        self.ensure_begun("render_texture")?;

        if texture.is_null() {
            return Err(RenderError::NullTexture);
        }

        let src_rect = draw.src_rect.unwrap_or_else(|| texture.bounds());
        if src_rect.is_empty() || !(src_rect.width.is_finite() && src_rect.height.is_finite()) {
            return Err(RenderError::InvalidSourceRect {
                width: src_rect.width,
                height: src_rect.height,
            });
        }

        let dest_size = draw
            .dest_size
            .unwrap_or(Vec2::new(src_rect.width, src_rect.height));

        let item = TextureBatchItem {
            src_rect,
            dest_rect: Rect::new(draw.position.x, draw.position.y, dest_size.x, dest_size.y),
            size: draw.scale,
            angle: draw.angle,
            tint: draw.color,
            effects: draw.effects,
            texture_id: texture.id(),
            view_size: self.shared.viewport.get(),
        };
        self.shared.textures.add(RenderItem::new(item, draw.layer));
        Ok(())
    }

    /// Draw `text` in white, centered on (`x`, `y`).
    pub fn render_text(&mut self, font: &dyn Font, text: &str, x: f32, y: f32) -> RenderResult<()> {
        self.render_text_with(font, text, &TextDraw::at(Vec2::new(x, y)))
    }

    /// Empty text and zero-sized fonts are accepted and draw nothing.
    pub fn render_text_with(&mut self, font: &dyn Font, text: &str, draw: &TextDraw) -> RenderResult<()> {
        self.ensure_begun("render_text")?;

        if font.atlas().is_null() {
            return Err(RenderError::NullFont);
        }
        if text.is_empty() || font.size() <= 0.0 {
            return Ok(());
        }

        let view_size = self.shared.viewport.get();
        let texture_id = font.atlas().id();

        for glyph in layout_text(font, text, draw.position, draw.angle) {
            let item = GlyphBatchItem {
                glyph: glyph.glyph,
                src_rect: glyph.src_rect,
                dest_rect: Rect::new(glyph.center.x, glyph.center.y, glyph.size.x, glyph.size.y),
                angle: draw.angle,
                tint: draw.color,
                view_size,
                texture_id,
            };
            self.shared.glyphs.add(RenderItem::new(item, draw.layer));
        }
        Ok(())
    }

    pub fn render_rect(&mut self, rect: &RectShape, layer: i32) -> RenderResult<()> {
        self.ensure_begun("render_rect")?;
        self.shared
            .shapes
            .add(RenderItem::new(ShapeBatchItem::from(rect), layer));
        Ok(())
    }

    pub fn render_circle(&mut self, circle: &CircleShape, layer: i32) -> RenderResult<()> {
        self.ensure_begun("render_circle")?;
        self.shared
            .shapes
            .add(RenderItem::new(ShapeBatchItem::from(circle), layer));
        Ok(())
    }

    pub fn render_line(&mut self, line: &Line, layer: i32) -> RenderResult<()> {
        self.ensure_begun("render_line")?;
        self.shared
            .lines
            .add(RenderItem::new(LineBatchItem::from(line), layer));
        Ok(())
    }

    /// Draw a line on layer 0.
    pub fn render_line_between(
        &mut self,
        p1: Vec2,
        p2: Vec2,
        color: Color,
        thickness: f32,
    ) -> RenderResult<()> {
        self.render_line(&Line::new(p1, p2, color, thickness), 0)
    }
}

/// Answer the kind's item pulls, draw its ready batches and flush it when it
/// fills.
fn wire_kind<T: KindSlots>(
    shared: &Rc<RendererShared>,
    subscriptions: &mut Vec<Subscription>,
) -> RenderResult<()> {
    let channels = T::channels(&shared.bus);
    let weak: Weak<RendererShared> = Rc::downgrade(shared);

    subscriptions.push(
        channels.items.subscribe(
            PullResponder::new(channels.items_id, {
                let weak = weak.clone();
                move || {
                    weak.upgrade()
                        .map(|shared| T::accumulator(&shared).rendered_items())
                        .unwrap_or_default()
                }
            })
            .with_name(format!("renderer {} items", T::KIND)),
        )?,
    );

    subscriptions.push(
        channels.ready.subscribe(
            PushReceiver::new(channels.ready_id, {
                let weak = weak.clone();
                move |batch: &Batch<T>| {
                    if let Some(shared) = weak.upgrade() {
                        shared.delivered(T::KIND).set(true);
                        shared.drawer.draw(batch);
                    }
                }
            })
            .with_name(format!("renderer {} draw", T::KIND)),
        ),
    );

    subscriptions.push(T::accumulator(shared).on_filled(move |kind| {
        if let Some(shared) = weak.upgrade() {
            shared.flush(kind);
        }
    }));

    Ok(())
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("begun", &self.is_begun())
            .field("viewport", &self.viewport_size())
            .field("mediated", &self.mediator.is_some())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // Release bus listeners before the accumulators go away.
        self.subscriptions.clear();
        self.shared.textures.dispose();
        self.shared.glyphs.dispose();
        self.shared.shapes.dispose();
        self.shared.lines.dispose();
    }
}

#[cfg(test)]
mod tests {
    use strata_test_utils::{MockGpuDevice, ShaderKind};

    use super::*;

    fn renderer() -> (Arc<MockGpuDevice>, Renderer) {
        let mock = Arc::new(MockGpuDevice::new());
        let renderer = Renderer::new(mock.clone(), RendererConfig::default()).unwrap();
        mock.clear_calls();
        (mock, renderer)
    }

    #[test]
    fn test_render_before_begin_is_rejected() {
        let (_mock, mut renderer) = renderer();
        let line = Line::new(Vec2::ZERO, Vec2::ONE, Color::WHITE, 1.0);

        assert_eq!(
            renderer.render_line(&line, 0),
            Err(RenderError::NotBegun {
                operation: "render_line"
            })
        );
        assert_eq!(
            renderer.end(),
            Err(RenderError::NotBegun { operation: "end" })
        );
    }

    #[test]
    fn test_begin_is_idempotent() {
        let (mock, mut renderer) = renderer();
        renderer.begin();
        renderer.render_line_between(Vec2::ZERO, Vec2::ONE, Color::RED, 2.0).unwrap();
        renderer.begin();

        assert_eq!(renderer.pending(BatchKind::Line), 1);
        renderer.end().unwrap();
        assert_eq!(mock.draws_for(ShaderKind::Line), vec![1]);
        assert!(!renderer.is_begun());
    }

    #[test]
    fn test_property_setters_reach_gpu() {
        let (mock, mut renderer) = renderer();

        renderer.on_resize(Size::new(1024, 768));
        renderer.set_clear_color(Color::BLACK);
        renderer.clear();

        assert_eq!(renderer.viewport_size(), Size::new(1024, 768));
        assert_eq!(renderer.clear_color(), Color::BLACK);
        assert_eq!(
            mock.calls(),
            vec![
                strata_test_utils::GpuCall::SetViewport {
                    width: 1024,
                    height: 768
                },
                strata_test_utils::GpuCall::SetClearColor {
                    rgba: [0.0, 0.0, 0.0, 1.0]
                },
                strata_test_utils::GpuCall::SetClearColor {
                    rgba: [0.0, 0.0, 0.0, 1.0]
                },
                strata_test_utils::GpuCall::Clear,
            ]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mock = Arc::new(MockGpuDevice::new());
        let config = RendererConfig::default().with_batch_size(BatchKind::Texture, 0);

        let err = Renderer::new(mock.clone(), config).unwrap_err();

        assert!(matches!(err, RenderError::InvalidConfig(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_draw_calls_are_deferred_to_end() {
        let (mock, mut renderer) = renderer();
        renderer.begin();
        renderer
            .render_rect(&RectShape::new(Vec2::ZERO, 10.0, 10.0), 0)
            .unwrap();

        assert_eq!(mock.call_count(), 0);

        renderer.end().unwrap();
        assert_eq!(mock.draws_for(ShaderKind::Shape), vec![1]);
        assert_eq!(renderer.pending(BatchKind::Shape), 0);
    }
}
