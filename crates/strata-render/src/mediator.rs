//! Sequences pull, sort and push for every batch kind.
//!
//! The mediator only knows the [`MessageBus`]. On
//! [`MessageId::BATCH_END`] it pulls each kind's current items in
//! [`BatchKind::MEDIATION_ORDER`], sorts them with that kind's comparer,
//! pushes the sorted batch on the kind's ready channel and finally signals
//! [`MessageId::BATCHES_EMPTIED`]. On [`MessageId::BATCH_FILLED`] it does
//! the same for the one kind that filled, without the final signal.
//!
//! Kinds with nothing pending are still pushed (with an empty batch) because
//! listeners use the arrival itself to sequence their work.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use strata_core::profiling::{profile_function, profile_scope};

use crate::batching::{
    BatchComparer, BatchKind, GlyphBatchItem, LayerStampComparer, LineBatchItem, ShapeBatchItem,
    TextureBatchItem, sort_render_items,
};
use crate::messaging::{BatchChannels, MessageBus, MessageId, PushReceiver, Subscription};

/// One comparer per batch kind.
pub struct Comparers {
    pub texture: Box<dyn BatchComparer<TextureBatchItem>>,
    pub glyph: Box<dyn BatchComparer<GlyphBatchItem>>,
    pub shape: Box<dyn BatchComparer<ShapeBatchItem>>,
    pub line: Box<dyn BatchComparer<LineBatchItem>>,
}

impl Default for Comparers {
    fn default() -> Self {
        Self {
            texture: Box::new(LayerStampComparer),
            glyph: Box::new(LayerStampComparer),
            shape: Box::new(LayerStampComparer),
            line: Box::new(LayerStampComparer),
        }
    }
}

impl fmt::Debug for Comparers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparers").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediatorState {
    Idle,
    Mediating,
}

struct MediatorInner {
    bus: MessageBus,
    comparers: Comparers,
    state: Cell<MediatorState>,
}

/// Returns the mediator to `Idle` even if a listener panics.
struct MediatingGuard<'a>(&'a Cell<MediatorState>);

impl Drop for MediatingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(MediatorState::Idle);
    }
}

impl MediatorInner {
    fn enter(&self, trigger: MessageId) -> Option<MediatingGuard<'_>> {
        if self.state.get() == MediatorState::Mediating {
            tracing::warn!(%trigger, "Ignoring mediation signal received while already mediating");
            return None;
        }
        self.state.set(MediatorState::Mediating);
        Some(MediatingGuard(&self.state))
    }

    fn mediate_all(&self) {
        profile_function!();

        let Some(_guard) = self.enter(MessageId::BATCH_END) else {
            return;
        };

        for kind in BatchKind::MEDIATION_ORDER {
            self.relay(kind);
        }

        self.bus.signals.push(MessageId::BATCHES_EMPTIED, &());
    }

    fn mediate_one(&self, kind: BatchKind) {
        profile_function!();

        let Some(_guard) = self.enter(MessageId::BATCH_FILLED) else {
            return;
        };
        self.relay(kind);
    }

    fn relay(&self, kind: BatchKind) {
        match kind {
            BatchKind::Texture => relay(kind, &self.bus.textures, self.comparers.texture.as_ref()),
            BatchKind::Glyph => relay(kind, &self.bus.glyphs, self.comparers.glyph.as_ref()),
            BatchKind::Shape => relay(kind, &self.bus.shapes, self.comparers.shape.as_ref()),
            BatchKind::Line => relay(kind, &self.bus.lines, self.comparers.line.as_ref()),
        }
    }
}

fn relay<T: 'static>(kind: BatchKind, channels: &BatchChannels<T>, comparer: &dyn BatchComparer<T>) {
    profile_scope!("relay_batch");

    let mut batch = match channels.items.pull(channels.items_id) {
        Ok(batch) => batch,
        Err(err) => {
            tracing::error!(%kind, "Failed to pull batch items: {}", err);
            Vec::new()
        }
    };

    sort_render_items(&mut batch, comparer);
    tracing::debug!(%kind, items = batch.len(), "Mediated batch");

    channels.ready.push(channels.ready_id, &batch);
}

/// Drives batches from the accumulators to whoever draws them.
///
/// Subscriptions are released when the mediator is dropped or
/// [`dispose`](Self::dispose)d.
pub struct RenderMediator {
    inner: Rc<MediatorInner>,
    subscriptions: Vec<Subscription>,
}

impl RenderMediator {
    pub fn new(bus: &MessageBus) -> Self {
        Self::with_comparers(bus, Comparers::default())
    }

    pub fn with_comparers(bus: &MessageBus, comparers: Comparers) -> Self {
        let inner = Rc::new(MediatorInner {
            bus: bus.clone(),
            comparers,
            state: Cell::new(MediatorState::Idle),
        });

        let weak: Weak<MediatorInner> = Rc::downgrade(&inner);
        let on_end = bus.signals.subscribe(
            PushReceiver::new(MessageId::BATCH_END, {
                let weak = weak.clone();
                move |_: &()| {
                    if let Some(inner) = weak.upgrade() {
                        inner.mediate_all();
                    }
                }
            })
            .with_name("mediator batch end"),
        );
        let on_filled = bus.filled.subscribe(
            PushReceiver::new(MessageId::BATCH_FILLED, move |kind: &BatchKind| {
                if let Some(inner) = weak.upgrade() {
                    inner.mediate_one(*kind);
                }
            })
            .with_name("mediator batch filled"),
        );

        tracing::info!("Render mediator created");

        Self {
            inner,
            subscriptions: vec![on_end, on_filled],
        }
    }

    pub fn state(&self) -> MediatorState {
        self.inner.state.get()
    }

    /// Mediate every kind now, as if [`MessageId::BATCH_END`] arrived.
    pub fn mediate(&self) {
        self.inner.mediate_all();
    }

    /// Stop listening to the bus. Idempotent.
    pub fn dispose(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.unsubscribe();
        }
        self.subscriptions.clear();
    }

    pub fn is_listening(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }
}

impl fmt::Debug for RenderMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderMediator")
            .field("state", &self.state())
            .field("listening", &self.is_listening())
            .finish()
    }
}
