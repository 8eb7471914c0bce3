use std::cmp::Ordering;
use std::sync::atomic::{self, AtomicU64};

static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Insertion-order tie-breaker for items sharing a layer.
///
/// Stamps come from a process-wide strictly increasing sequence, so an item
/// created later always carries a greater stamp, even within one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderStamp(u64);

impl RenderStamp {
    /// Stamp carried by vacant accumulator slots.
    pub const VACANT: Self = Self(0);

    /// The next stamp in creation order.
    pub fn next() -> Self {
        Self(NEXT_STAMP.fetch_add(1, atomic::Ordering::Relaxed))
    }

    /// A fixed stamp, for deterministic ordering in tests and tools.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for RenderStamp {
    fn default() -> Self {
        Self::next()
    }
}

/// One draw request of kind `T`, placed on a layer.
///
/// Lower layers draw first (further back). Within a layer, earlier stamps
/// draw first, so later requests end up on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem<T> {
    pub item: T,
    pub layer: i32,
    pub stamp: RenderStamp,
}

impl<T> RenderItem<T> {
    /// Wrap `item` on `layer`, stamped now.
    pub fn new(item: T, layer: i32) -> Self {
        Self {
            item,
            layer,
            stamp: RenderStamp::next(),
        }
    }

    pub const fn with_stamp(item: T, layer: i32, stamp: RenderStamp) -> Self {
        Self { item, layer, stamp }
    }
}

impl<T: Default> RenderItem<T> {
    pub(crate) fn vacant() -> Self {
        Self::with_stamp(T::default(), 0, RenderStamp::VACANT)
    }
}

/// Total order over render items of one kind.
///
/// Implementations must be deterministic and free of side effects.
pub trait BatchComparer<T> {
    fn compare(&self, a: &RenderItem<T>, b: &RenderItem<T>) -> Ordering;
}

/// Orders by layer ascending, then stamp ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStampComparer;

impl<T> BatchComparer<T> for LayerStampComparer {
    fn compare(&self, a: &RenderItem<T>, b: &RenderItem<T>) -> Ordering {
        a.layer.cmp(&b.layer).then(a.stamp.cmp(&b.stamp))
    }
}

/// Stable sort, so items that compare equal keep their slot order.
pub fn sort_render_items<T>(items: &mut [RenderItem<T>], comparer: &dyn BatchComparer<T>) {
    items.sort_by(|a, b| comparer.compare(a, b));
}
