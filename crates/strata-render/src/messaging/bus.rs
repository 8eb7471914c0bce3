use crate::batching::{
    Batch, BatchKind, GlyphBatchItem, LineBatchItem, ShapeBatchItem, TextureBatchItem,
};

use super::ids::MessageId;
use super::pull::PullReactable;
use super::push::PushReactable;

/// The pull and push channels carrying one batch kind.
pub struct BatchChannels<T> {
    /// Answers with the accumulator's current rendered items.
    pub items: PullReactable<Batch<T>>,
    /// Delivers a sorted batch that is ready to draw.
    pub ready: PushReactable<Batch<T>>,
    pub items_id: MessageId,
    pub ready_id: MessageId,
}

impl<T: 'static> BatchChannels<T> {
    fn new(kind: BatchKind) -> Self {
        Self {
            items: PullReactable::new(),
            ready: PushReactable::new(),
            items_id: kind.items_id(),
            ready_id: kind.ready_id(),
        }
    }
}

impl<T> Clone for BatchChannels<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            ready: self.ready.clone(),
            items_id: self.items_id,
            ready_id: self.ready_id,
        }
    }
}

/// Every channel the batching core communicates over.
///
/// The renderer, the mediator and any observer hold clones of the same bus;
/// none of them holds a reference to another directly.
#[derive(Clone)]
pub struct MessageBus {
    /// Untyped frame signals: [`MessageId::BATCH_END`] and
    /// [`MessageId::BATCHES_EMPTIED`].
    pub signals: PushReactable<()>,
    /// [`MessageId::BATCH_FILLED`], carrying the kind that filled.
    pub filled: PushReactable<BatchKind>,
    pub textures: BatchChannels<TextureBatchItem>,
    pub glyphs: BatchChannels<GlyphBatchItem>,
    pub shapes: BatchChannels<ShapeBatchItem>,
    pub lines: BatchChannels<LineBatchItem>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self {
            signals: PushReactable::new(),
            filled: PushReactable::new(),
            textures: BatchChannels::new(BatchKind::Texture),
            glyphs: BatchChannels::new(BatchKind::Glyph),
            shapes: BatchChannels::new(BatchKind::Shape),
            lines: BatchChannels::new(BatchKind::Line),
        }
    }

    /// Signal the end of a frame.
    pub fn end_batch(&self) {
        self.signals.push(MessageId::BATCH_END, &());
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
