// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer sequences, the hub's listener bookkeeping, and lifecycle.

use kurbo::{Point, Size};
use understory_drag_drop::{
    ContainerConfig, DragDropError, DragDropEvent, DragPhase, DragStartDelay, GlobalListener,
    ItemConfig, ItemEvent, LockAxis, PointerInput,
};

mod common;

use common::{context, list, mouse, start_drag};

const ROW: Size = Size::new(100.0, 50.0);

fn started(events: &[DragDropEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, DragDropEvent::Item(ItemEvent::Started { .. })))
        .count()
}

#[test]
fn drag_starts_only_past_threshold() {
    let mut dd = context();
    let (_, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    let item = items[0].0;

    dd.pointer_down(item, &mouse(10.0, 10.0, 0.0));
    dd.pointer_move(&mouse(14.0, 10.0, 5.0));
    assert_eq!(started(&dd.drain_events()), 0);
    assert_eq!(dd.item(item).unwrap().phase(), DragPhase::Armed);

    dd.pointer_move(&mouse(16.0, 10.0, 10.0));
    dd.pointer_move(&mouse(30.0, 10.0, 15.0));
    assert_eq!(started(&dd.drain_events()), 1);
    assert!(dd.item(item).unwrap().is_dragging());
}

#[test]
fn release_before_threshold_is_silent() {
    let mut dd = context();
    let (_, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    let item = items[0].0;

    dd.pointer_down(item, &mouse(10.0, 10.0, 0.0));
    assert!(dd.hub().is_dragging(item));
    dd.pointer_move(&mouse(12.0, 12.0, 5.0));
    dd.pointer_up(&mouse(12.0, 12.0, 10.0));

    assert!(dd.drain_events().is_empty());
    assert!(!dd.hub().is_dragging(item));
    assert_eq!(dd.item(item).unwrap().phase(), DragPhase::Idle);
    assert!(dd.host().artifacts().is_empty());
}

#[test]
fn hub_binds_listeners_while_active() {
    let mut dd = context();
    let (_, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    let item = items[0].0;
    assert!(dd.host().bound.contains_key(&GlobalListener::TouchMoveGuard));
    assert_eq!(dd.host().bound.len(), 1);

    dd.pointer_down(item, &mouse(10.0, 10.0, 0.0));
    for listener in [
        GlobalListener::MouseMove,
        GlobalListener::MouseUp,
        GlobalListener::Wheel,
        GlobalListener::Scroll,
        GlobalListener::SelectStart,
    ] {
        let options = dd.host().bound[&listener];
        assert!(options.capture && !options.passive, "{listener:?}");
    }
    assert!(!dd.host().bound.contains_key(&GlobalListener::TouchMove));
    assert!(!dd.host().native_interactions);
    assert!(dd.should_prevent_default());

    dd.pointer_up(&mouse(10.0, 10.0, 5.0));
    assert_eq!(dd.host().bound.len(), 1);
    assert!(dd.host().native_interactions);
    assert!(!dd.should_prevent_default());

    dd.pointer_down(item, &PointerInput::touch(Point::new(10.0, 10.0), 10.0));
    for listener in [
        GlobalListener::TouchMove,
        GlobalListener::TouchEnd,
        GlobalListener::TouchCancel,
    ] {
        assert!(dd.hub().is_bound(listener), "{listener:?}");
    }
    assert!(!dd.hub().is_bound(GlobalListener::MouseMove));
}

#[test]
fn touch_move_guard_follows_item_count() {
    let mut dd = context();
    let node = dd.host_mut().add_box(Point::ZERO, ROW);
    let a = dd.create_item(node, ItemConfig::default());
    let b = dd.create_item(node, ItemConfig::default());
    assert!(dd.hub().is_bound(GlobalListener::TouchMoveGuard));
    dd.dispose_item(a);
    assert!(dd.hub().is_bound(GlobalListener::TouchMoveGuard));
    dd.dispose_item(b);
    assert!(!dd.host().bound.contains_key(&GlobalListener::TouchMoveGuard));
    // Disposing twice is harmless.
    dd.dispose_item(b);
}

#[test]
fn press_guards() {
    let mut dd = context();
    let (container, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    let item = items[0].0;

    // Secondary button.
    let response = dd.pointer_down(item, &mouse(10.0, 10.0, 0.0).with_button(2));
    assert!(response.stop_propagation);
    assert!(!dd.hub().is_dragging(item));

    // Mouse emulated right after a touch.
    let touch = PointerInput::touch(Point::new(10.0, 10.0), 1000.0);
    dd.pointer_down(item, &touch);
    dd.pointer_up(&touch);
    dd.pointer_down(item, &mouse(10.0, 10.0, 1300.0));
    assert!(!dd.hub().is_dragging(item));
    dd.pointer_down(item, &mouse(10.0, 10.0, 1900.0));
    assert!(dd.hub().is_dragging(item));
    dd.pointer_up(&mouse(10.0, 10.0, 1950.0));

    // Disabled container.
    dd.container_mut(container).unwrap().set_disabled(true);
    let response = dd.pointer_down(item, &mouse(10.0, 10.0, 3000.0));
    assert!(!response.stop_propagation);
    assert!(!dd.hub().is_dragging(item));
    assert!(dd.is_item_disabled(item));
}

#[test]
fn natively_draggable_targets_are_default_prevented() {
    let mut dd = context();
    let (_, _, items) = list(&mut dd, Point::ZERO, ROW, 1, ContainerConfig::default());
    let (item, node) = items[0];
    dd.host_mut().set_draggable(node);
    let response = dd.pointer_down(item, &mouse(10.0, 10.0, 0.0).with_target(node));
    assert!(response.prevent_default);
    dd.pointer_up(&mouse(10.0, 10.0, 1.0));

    let response = dd.pointer_down(
        item,
        &PointerInput::touch(Point::new(10.0, 10.0), 2000.0).with_target(node),
    );
    assert!(!response.prevent_default);
}

#[test]
fn handles_restrict_where_a_drag_can_start() {
    let mut dd = context();
    let root = dd.host_mut().add_box(Point::ZERO, ROW);
    let handle = dd.host_mut().add_child(root, Size::new(10.0, 10.0));
    let elsewhere = dd.host_mut().add_box(Point::new(500.0, 500.0), ROW);
    let item = dd.create_item(root, ItemConfig::default().with_handle(handle));

    dd.pointer_down(item, &mouse(50.0, 40.0, 0.0).with_target(root));
    assert!(!dd.hub().is_dragging(item));
    dd.pointer_down(item, &mouse(50.0, 40.0, 0.0).with_target(elsewhere));
    assert!(!dd.hub().is_dragging(item));

    dd.item_mut(item).unwrap().set_handle_disabled(&handle, true);
    dd.pointer_down(item, &mouse(5.0, 5.0, 0.0).with_target(handle));
    assert!(!dd.hub().is_dragging(item));

    dd.item_mut(item).unwrap().set_handle_disabled(&handle, false);
    dd.pointer_down(item, &mouse(5.0, 5.0, 0.0).with_target(handle));
    assert!(dd.hub().is_dragging(item));
}

#[test]
fn moving_before_start_delay_cancels_sequence() {
    let mut dd = context();
    let node = dd.host_mut().add_box(Point::ZERO, ROW);
    let item = dd.create_item(
        node,
        ItemConfig::default().with_drag_start_delay(DragStartDelay {
            mouse: 500.0,
            touch: 500.0,
        }),
    );
    dd.pointer_down(item, &mouse(10.0, 10.0, 0.0));
    dd.pointer_move(&mouse(40.0, 10.0, 100.0));
    assert!(!dd.hub().is_dragging(item));
    assert_eq!(started(&dd.drain_events()), 0);

    dd.pointer_down(item, &mouse(10.0, 10.0, 1000.0));
    dd.pointer_move(&mouse(40.0, 10.0, 1600.0));
    assert_eq!(started(&dd.drain_events()), 1);
}

#[test]
fn duplicate_container_id_is_rejected() {
    let mut dd = context();
    let a = dd.host_mut().add_list(Point::ZERO, ROW, Default::default());
    let b = dd.host_mut().add_list(Point::new(0.0, 100.0), ROW, Default::default());
    let first = dd
        .create_container(a, ContainerConfig::default().with_id("drop-list-3"))
        .unwrap();
    let before = dd.host().children(dd.host().body);

    let err = dd
        .create_container(b, ContainerConfig::default().with_id("drop-list-3"))
        .unwrap_err();
    assert_eq!(
        err,
        DragDropError::DuplicateContainerId {
            id: "drop-list-3".into()
        }
    );
    assert_eq!(dd.container_by_id("drop-list-3"), Some(first));
    assert_eq!(dd.host().children(dd.host().body), before);

    let generated = dd.create_container(b, ContainerConfig::default()).unwrap();
    assert_eq!(dd.container(generated).unwrap().id(), "drop-list-0");
}

#[test]
fn item_in_two_lists_is_rejected() {
    let mut dd = context();
    let (left, _, items) = list(&mut dd, Point::ZERO, ROW, 1, ContainerConfig::default());
    let (right, _, _) = list(
        &mut dd,
        Point::new(200.0, 0.0),
        ROW,
        1,
        ContainerConfig::default(),
    );
    let item = items[0].0;
    assert_eq!(
        dd.set_container_items(right, &[item]),
        Err(DragDropError::ItemAlreadyAttached {
            item,
            container: left,
        })
    );
    dd.set_container_items(left, &[]).unwrap();
    dd.set_container_items(right, &[item]).unwrap();
    assert_eq!(dd.item(item).unwrap().container(), Some(right));
}

#[test]
fn disposing_mid_drag_cleans_up() {
    let mut dd = context();
    let (container, element, items) =
        list(&mut dd, Point::ZERO, ROW, 3, ContainerConfig::default());
    let (item, node) = items[0];
    start_drag(&mut dd, item, 10.0, 10.0);
    dd.pointer_move(&mouse(10.0, 120.0, 20.0));
    assert!(!dd.host().artifacts().is_empty());

    dd.dispose_item(item);
    assert!(dd.host().artifacts().is_empty());
    assert!(dd.hub().active_items().is_empty());
    assert!(!dd.host().bound.contains_key(&GlobalListener::MouseMove));
    assert!(dd.host().is_visible(node));
    assert_eq!(dd.host().children(element)[0], node);
    let c = dd.container(container).unwrap();
    assert!(!c.is_dragging());
    assert_eq!(c.items(), [items[1].0, items[2].0]);
    for (_, sibling) in &items[1..] {
        assert_eq!(dd.host().transform_of(*sibling), "");
    }
}

#[test]
fn disposing_container_twice_is_harmless() {
    let mut dd = context();
    let (container, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    start_drag(&mut dd, items[0].0, 10.0, 10.0);
    dd.dispose_container(container);
    dd.dispose_container(container);
    assert!(dd.container(container).is_none());
    assert!(dd.hub().active_items().is_empty());
    assert_eq!(dd.item(items[0].0).unwrap().container(), None);
    assert!(dd.host().artifacts().is_empty());
}

#[test]
fn axis_lock_pins_the_other_coordinate() {
    let mut dd = context();
    let node = dd.host_mut().add_box(Point::new(100.0, 100.0), ROW);
    let item = dd.create_item(node, ItemConfig::default().with_lock_axis(LockAxis::X));
    dd.pointer_down(item, &mouse(110.0, 110.0, 0.0));
    dd.pointer_move(&mouse(130.0, 110.0, 10.0));
    dd.pointer_move(&mouse(150.0, 170.0, 20.0));
    assert_eq!(dd.host().transform_of(node), "translate3d(40px, 0px, 0)");
}

#[test]
fn dispose_unbinds_everything() {
    let mut dd = context();
    let (_, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    start_drag(&mut dd, items[0].0, 10.0, 10.0);
    dd.dispose();
    assert!(dd.host().bound.is_empty());
    assert!(dd.host().native_interactions);
    assert!(dd.host().artifacts().is_empty());
    assert!(dd.item(items[0].0).is_none());
}

#[test]
fn keys_from_before_dispose_stay_stale() {
    let mut dd = context();
    let (container, _, items) = list(&mut dd, Point::ZERO, ROW, 2, ContainerConfig::default());
    dd.dispose();

    let (fresh_container, _, fresh) =
        list(&mut dd, Point::new(0.0, 200.0), ROW, 2, ContainerConfig::default());
    for ((old, _), (new, _)) in items.iter().zip(&fresh) {
        assert_ne!(old, new);
        assert!(dd.item(*old).is_none());
        assert!(dd.item(*new).is_some());
    }
    assert_ne!(container, fresh_container);
    assert!(dd.container(container).is_none());
}
