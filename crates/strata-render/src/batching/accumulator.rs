use std::cell::{Cell, RefCell};
use std::fmt;

use strata_core::profiling::profile_function;

use super::items::BatchItem;
use super::render_item::RenderItem;
use super::{Batch, BatchKind};
use crate::messaging::{MessageId, PushReactable, PushReceiver, Subscription};

/// Fixed-capacity slot arena for one batch kind.
///
/// Slots are allocated once at construction and overwritten in place, with a
/// parallel `should_render` flag per slot. [`empty`](Self::empty) only clears
/// the flags, so a frame never allocates.
///
/// All methods take `&self`: the renderer shares an accumulator with the
/// responders that answer pulls for it, and its filled observers may call
/// back into it while a notification is in flight.
pub struct Accumulator<T: BatchItem> {
    slots: RefCell<Vec<RenderItem<T>>>,
    should_render: RefCell<Vec<bool>>,
    next_slot: Cell<usize>,
    filled: PushReactable<BatchKind>,
}

impl<T: BatchItem> Accumulator<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity > 0,
            "{} accumulator capacity must be greater than zero",
            T::KIND
        );

        tracing::debug!(kind = %T::KIND, capacity, "Creating accumulator");

        Self {
            slots: RefCell::new(vec![RenderItem::vacant(); capacity]),
            should_render: RefCell::new(vec![false; capacity]),
            next_slot: Cell::new(0),
            filled: PushReactable::new(),
        }
    }

    pub fn kind(&self) -> BatchKind {
        T::KIND
    }

    /// Store `item` in the next free slot and return that slot's index.
    ///
    /// The add that occupies the last slot notifies every
    /// [`on_filled`](Self::on_filled) observer before returning. Observers
    /// typically draw and [`empty`](Self::empty) the batch.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already occupied, i.e. the accumulator filled
    /// and was not emptied.
    pub fn add(&self, item: RenderItem<T>) -> usize {
        profile_function!();

        let slot = self.next_slot.get();
        let capacity = self.capacity();
        assert!(
            slot < capacity,
            "{} accumulator overflow: all {} slots are occupied; empty it before adding more",
            T::KIND,
            capacity
        );

        self.slots.borrow_mut()[slot] = item;
        self.should_render.borrow_mut()[slot] = true;
        self.next_slot.set(slot + 1);

        tracing::trace!(kind = %T::KIND, slot, layer = item.layer, "Added render item");

        // No slot borrow is held here; observers read and empty the batch.
        if slot + 1 == capacity {
            tracing::debug!(kind = %T::KIND, capacity, "Accumulator filled");
            self.filled.push(MessageId::ACCUMULATOR_FILLED, &T::KIND);
        }

        slot
    }

    /// Snapshot of every slot with its `should_render` flag, in slot order.
    pub fn items(&self) -> Vec<(bool, RenderItem<T>)> {
        let flags = self.should_render.borrow();
        self.slots
            .borrow()
            .iter()
            .zip(flags.iter())
            .map(|(item, flag)| (*flag, *item))
            .collect()
    }

    /// The items flagged to render, in slot order.
    pub fn rendered_items(&self) -> Batch<T> {
        let flags = self.should_render.borrow();
        self.slots
            .borrow()
            .iter()
            .zip(flags.iter())
            .filter(|(_, flag)| **flag)
            .map(|(item, _)| *item)
            .collect()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.next_slot.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.should_render.borrow().len()
    }

    /// Mark every slot as not rendered and start filling from slot 0 again.
    /// Storage is kept. Idempotent.
    pub fn empty(&self) {
        self.should_render.borrow_mut().fill(false);
        self.next_slot.set(0);
    }

    /// Observe the filled notification. The callback receives this
    /// accumulator's kind.
    pub fn on_filled<F>(&self, callback: F) -> Subscription
    where
        F: Fn(BatchKind) + 'static,
    {
        self.filled.subscribe(
            PushReceiver::new(MessageId::ACCUMULATOR_FILLED, move |kind: &BatchKind| {
                callback(*kind)
            })
            .with_name(format!("{} filled observer", T::KIND)),
        )
    }

    /// Release every filled observer. The stored items are untouched.
    pub fn dispose(&self) {
        self.filled.unsubscribe_all();
    }
}

impl<T: BatchItem> fmt::Debug for Accumulator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("kind", &T::KIND)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::batching::{LineBatchItem, RenderStamp};

    fn line(thickness: f32, layer: i32) -> RenderItem<LineBatchItem> {
        RenderItem::new(
            LineBatchItem {
                thickness,
                ..Default::default()
            },
            layer,
        )
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn test_zero_capacity_panics() {
        let _ = Accumulator::<LineBatchItem>::new(0);
    }

    #[test]
    fn test_add_returns_sequential_slots() {
        let acc = Accumulator::<LineBatchItem>::new(4);
        assert_eq!(acc.add(line(1.0, 0)), 0);
        assert_eq!(acc.add(line(2.0, 0)), 1);
        assert_eq!(acc.len(), 2);
        assert!(!acc.is_full());
    }

    #[test]
    fn test_filled_raised_exactly_once_on_last_add() {
        let acc = Accumulator::<LineBatchItem>::new(3);
        let fired_at = Rc::new(RefCell::new(Vec::new()));

        let _sub = acc.on_filled({
            let fired_at = fired_at.clone();
            move |kind| fired_at.borrow_mut().push(kind)
        });

        acc.add(line(1.0, 0));
        acc.add(line(1.0, 0));
        assert!(fired_at.borrow().is_empty());

        acc.add(line(1.0, 0));
        assert_eq!(*fired_at.borrow(), vec![BatchKind::Line]);
        assert!(acc.is_full());
    }

    #[test]
    #[should_panic(expected = "accumulator overflow")]
    fn test_add_past_capacity_panics() {
        let acc = Accumulator::<LineBatchItem>::new(1);
        acc.add(line(1.0, 0));
        acc.add(line(1.0, 0));
    }

    #[test]
    fn test_observer_can_empty_during_notification() {
        let acc = Rc::new(Accumulator::<LineBatchItem>::new(2));
        let seen = Rc::new(Cell::new(0));

        let _sub = acc.on_filled({
            let weak = Rc::downgrade(&acc);
            let seen = seen.clone();
            move |_| {
                if let Some(acc) = weak.upgrade() {
                    seen.set(acc.rendered_items().len());
                    acc.empty();
                }
            }
        });

        for _ in 0..5 {
            acc.add(line(1.0, 0));
        }

        assert_eq!(seen.get(), 2);
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_empty_keeps_storage_and_is_idempotent() {
        let acc = Accumulator::<LineBatchItem>::new(3);
        acc.add(line(5.0, 2));
        acc.add(line(6.0, 1));

        acc.empty();
        acc.empty();

        assert!(acc.is_empty());
        assert_eq!(acc.capacity(), 3);
        assert!(acc.rendered_items().is_empty());

        let items = acc.items();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|(flag, _)| !flag));
        // Old contents stay in their slots until overwritten.
        assert_eq!(items[0].1.item.thickness, 5.0);
    }

    #[test]
    fn test_items_reflect_slots() {
        let acc = Accumulator::<LineBatchItem>::new(3);
        let first = RenderItem::with_stamp(LineBatchItem::default(), 7, RenderStamp::from_raw(42));
        acc.add(first);

        let items = acc.items();
        assert_eq!(items[0], (true, first));
        assert!(!items[1].0);
        assert_eq!(items[1].1.stamp, RenderStamp::VACANT);
        assert_eq!(acc.rendered_items(), vec![first]);
    }

    #[test]
    fn test_dispose_releases_observers() {
        let acc = Accumulator::<LineBatchItem>::new(1);
        let fired = Rc::new(Cell::new(false));
        let mut sub = acc.on_filled({
            let fired = fired.clone();
            move |_| fired.set(true)
        });

        acc.dispose();
        acc.dispose();
        acc.add(line(1.0, 0));
        sub.unsubscribe();

        assert!(!fired.get());
    }
}
