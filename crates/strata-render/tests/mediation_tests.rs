//! Accumulators and the mediator wired by hand over a bus, with no renderer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use strata_render::{
    Accumulator, Batch, GlyphBatchItem, LineBatchItem, MediatorState, MessageBus, MessageId,
    PullResponder, PushReceiver, RenderItem, RenderMediator, RenderStamp, ShapeBatchItem,
    Subscription, TextureBatchItem,
};

/// An accumulator that answers pulls and is flushed through the mediator
/// when full, the way a renderer would wire one.
struct WiredTextures {
    accumulator: Rc<Accumulator<TextureBatchItem>>,
    delivered: Rc<RefCell<Vec<Batch<TextureBatchItem>>>>,
    _subscriptions: Vec<Subscription>,
}

fn wire_textures(bus: &MessageBus, capacity: usize) -> WiredTextures {
    let accumulator = Rc::new(Accumulator::new(capacity));
    let delivered = Rc::new(RefCell::new(Vec::new()));

    let pull = bus
        .textures
        .items
        .subscribe(PullResponder::new(MessageId::TEXTURE_ITEMS, {
            let accumulator = Rc::downgrade(&accumulator);
            move || {
                accumulator
                    .upgrade()
                    .map(|acc| acc.rendered_items())
                    .unwrap_or_default()
            }
        }))
        .unwrap();

    let ready = bus.textures.ready.subscribe(PushReceiver::new(MessageId::TEXTURES_READY, {
        let delivered = delivered.clone();
        move |batch: &Batch<TextureBatchItem>| delivered.borrow_mut().push(batch.clone())
    }));

    let filled = accumulator.on_filled({
        let bus = bus.clone();
        let accumulator = Rc::downgrade(&accumulator);
        move |kind| {
            bus.filled.push(MessageId::BATCH_FILLED, &kind);
            if let Some(acc) = accumulator.upgrade() {
                acc.empty();
            }
        }
    });

    let emptied = bus.signals.subscribe(PushReceiver::new(MessageId::BATCHES_EMPTIED, {
        let accumulator = Rc::downgrade(&accumulator);
        move |_: &()| {
            if let Some(acc) = accumulator.upgrade() {
                acc.empty();
            }
        }
    }));

    WiredTextures {
        accumulator,
        delivered,
        _subscriptions: vec![pull, ready, filled, emptied],
    }
}

fn texture_item(layer: i32, stamp: u64) -> RenderItem<TextureBatchItem> {
    RenderItem::with_stamp(
        TextureBatchItem {
            texture_id: 1,
            ..Default::default()
        },
        layer,
        RenderStamp::from_raw(stamp),
    )
}

fn layers_and_stamps(batch: &Batch<TextureBatchItem>) -> Vec<(i32, u64)> {
    batch.iter().map(|i| (i.layer, i.stamp.get())).collect()
}

#[test]
fn test_layers_then_stamps_example() {
    let bus = MessageBus::new();
    let _mediator = RenderMediator::new(&bus);
    let wired = wire_textures(&bus, 16);

    wired.accumulator.add(texture_item(4, 10));
    wired.accumulator.add(texture_item(1, 11));
    wired.accumulator.add(texture_item(4, 12));
    bus.end_batch();

    let delivered = wired.delivered.borrow();
    assert_eq!(delivered.len(), 1);
    assert_eq!(layers_and_stamps(&delivered[0]), vec![(1, 11), (4, 10), (4, 12)]);
    assert!(wired.accumulator.is_empty());
}

#[test]
fn test_round_trip_counts() {
    const CAPACITY: usize = 5;

    for count in [0, 1, CAPACITY] {
        let bus = MessageBus::new();
        let _mediator = RenderMediator::new(&bus);
        let wired = wire_textures(&bus, CAPACITY);

        for stamp in 0..count as u64 {
            wired.accumulator.add(texture_item((stamp % 2) as i32, stamp));
        }
        bus.end_batch();

        let delivered = wired.delivered.borrow();
        let total: usize = delivered.iter().map(Vec::len).sum();
        assert_eq!(total, count);
        for batch in delivered.iter() {
            for pair in batch.windows(2) {
                assert!(
                    (pair[0].layer, pair[0].stamp) <= (pair[1].layer, pair[1].stamp),
                    "out of order for {count} items"
                );
            }
        }
    }
}

#[test]
fn test_full_accumulator_delivers_before_end() {
    let bus = MessageBus::new();
    let _mediator = RenderMediator::new(&bus);
    let wired = wire_textures(&bus, 2);

    wired.accumulator.add(texture_item(3, 1));
    assert!(wired.delivered.borrow().is_empty());

    wired.accumulator.add(texture_item(0, 2));
    assert_eq!(wired.delivered.borrow().len(), 1);
    assert_eq!(
        layers_and_stamps(&wired.delivered.borrow()[0]),
        vec![(0, 2), (3, 1)]
    );
    assert!(wired.accumulator.is_empty());

    wired.accumulator.add(texture_item(1, 3));
    bus.end_batch();

    let delivered = wired.delivered.borrow();
    assert_eq!(delivered.len(), 2);
    assert_eq!(layers_and_stamps(&delivered[1]), vec![(1, 3)]);
}

#[test]
fn test_missing_responders_still_push_empty_batches() {
    let bus = MessageBus::new();
    let _mediator = RenderMediator::new(&bus);
    let glyph_pushes = Rc::new(Cell::new(0));
    let shape_lengths = Rc::new(RefCell::new(Vec::new()));

    let _g = bus.glyphs.ready.subscribe(PushReceiver::new(MessageId::GLYPHS_READY, {
        let glyph_pushes = glyph_pushes.clone();
        move |_: &Batch<GlyphBatchItem>| glyph_pushes.set(glyph_pushes.get() + 1)
    }));
    let _s = bus.shapes.ready.subscribe(PushReceiver::new(MessageId::SHAPES_READY, {
        let shape_lengths = shape_lengths.clone();
        move |batch: &Batch<ShapeBatchItem>| shape_lengths.borrow_mut().push(batch.len())
    }));

    bus.end_batch();
    bus.end_batch();

    assert_eq!(glyph_pushes.get(), 2);
    assert_eq!(*shape_lengths.borrow(), vec![0, 0]);
}

#[test]
fn test_observer_sees_same_batch_as_drawer() {
    let bus = MessageBus::new();
    let _mediator = RenderMediator::new(&bus);
    let wired = wire_textures(&bus, 8);
    let observed = Rc::new(RefCell::new(Vec::new()));

    let _observer = bus.textures.ready.subscribe(PushReceiver::new(MessageId::TEXTURES_READY, {
        let observed = observed.clone();
        move |batch: &Batch<TextureBatchItem>| {
            observed
                .borrow_mut()
                .extend(batch.iter().map(|i| i.item.dest_rect.x))
        }
    }));

    for (x, layer) in [(10.0, 2), (20.0, -1), (30.0, 2)] {
        let mut item = texture_item(layer, 0);
        item.stamp = RenderStamp::next();
        item.item.dest_rect.x = x;
        wired.accumulator.add(item);
    }
    bus.end_batch();

    assert_eq!(*observed.borrow(), vec![20.0, 10.0, 30.0]);
    let drawn: Vec<_> = wired.delivered.borrow()[0]
        .iter()
        .map(|i| i.item.dest_rect.x)
        .collect();
    assert_eq!(drawn, *observed.borrow());
}

#[test]
fn test_mediator_is_mediating_only_during_delivery() {
    let bus = MessageBus::new();
    let mediator = Rc::new(RenderMediator::new(&bus));
    let states = Rc::new(RefCell::new(Vec::new()));

    let _probe = bus.lines.ready.subscribe(PushReceiver::new(MessageId::LINES_READY, {
        let states = states.clone();
        let mediator = Rc::downgrade(&mediator);
        move |_: &Batch<LineBatchItem>| {
            if let Some(mediator) = mediator.upgrade() {
                states.borrow_mut().push(mediator.state());
            }
        }
    }));

    assert_eq!(mediator.state(), MediatorState::Idle);
    mediator.mediate();

    assert_eq!(*states.borrow(), vec![MediatorState::Mediating]);
    assert_eq!(mediator.state(), MediatorState::Idle);
}
