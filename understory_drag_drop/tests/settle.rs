// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drop animation and its timeout.

use kurbo::{Point, Size};
use understory_drag_drop::{ContainerConfig, ContainerEvent, DragDropEvent, DragPhase, ItemEvent};

mod common;

use common::{Node, TestHost, context, list, mouse, start_drag};

fn dropped(events: &[DragDropEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, DragDropEvent::Container(ContainerEvent::Dropped(_))))
        .count()
}

fn released_with_animation() -> (
    understory_drag_drop::DragDrop<TestHost>,
    understory_drag_drop::ItemKey,
    Node,
) {
    let mut dd = context();
    dd.host_mut().transition_ms = 200.0;
    let (_, _, items) = list(
        &mut dd,
        Point::ZERO,
        Size::new(100.0, 50.0),
        3,
        ContainerConfig::default(),
    );
    let item = items[0].0;
    start_drag(&mut dd, item, 10.0, 10.0);
    dd.pointer_move(&mouse(10.0, 120.0, 20.0));
    let preview = *dd.item(item).unwrap().preview_element().unwrap();
    dd.drain_events();
    dd.pointer_up(&mouse(10.0, 120.0, 30.0));
    (dd, item, preview)
}

#[test]
fn drop_waits_for_preview_animation() {
    let (mut dd, item, preview) = released_with_animation();
    assert_eq!(
        dd.drain_events(),
        [DragDropEvent::Item(ItemEvent::Released { item })]
    );
    assert_eq!(dd.item(item).unwrap().phase(), DragPhase::Settling);
    assert!(dd.needs_animation_frame());
    assert_eq!(dd.host().watched, [preview]);
    // The preview heads for the placeholder, which sits 100px down.
    assert_eq!(dd.host().transform_of(preview), "translate3d(0px, 100px, 0)");

    dd.transition_ended(&preview, "opacity");
    assert_eq!(dropped(&dd.drain_events()), 0);

    dd.transition_ended(&preview, "transform");
    assert_eq!(dropped(&dd.drain_events()), 1);
    assert!(dd.host().watched.is_empty());
    assert!(!dd.needs_animation_frame());

    // The timeout no longer has anything to resolve.
    dd.on_animation_frame(10_000.0);
    assert!(dd.drain_events().is_empty());
}

#[test]
fn drop_resolves_on_timeout_without_transitionend() {
    let (mut dd, item, _) = released_with_animation();
    dd.drain_events();

    // Released at t = 30 with a 200ms transition: the deadline is 330.
    dd.on_animation_frame(329.0);
    assert_eq!(dropped(&dd.drain_events()), 0);
    dd.on_animation_frame(330.0);
    assert_eq!(dropped(&dd.drain_events()), 1);
    assert_eq!(dd.item(item).unwrap().phase(), DragPhase::Idle);
    assert!(dd.host().artifacts().is_empty());
}

#[test]
fn unmoved_release_skips_animation() {
    let mut dd = context();
    dd.host_mut().transition_ms = 200.0;
    let (_, _, items) = list(
        &mut dd,
        Point::ZERO,
        Size::new(100.0, 50.0),
        2,
        ContainerConfig::default(),
    );
    let item = items[0].0;
    start_drag(&mut dd, item, 10.0, 10.0);
    dd.pointer_up(&mouse(10.0, 20.0, 20.0));
    assert_eq!(dropped(&dd.drain_events()), 1);
    assert!(!dd.needs_animation_frame());
}
