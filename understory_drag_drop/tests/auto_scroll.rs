// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scrolling while dragging.

use kurbo::{Point, Size, Vec2};
use understory_drag_drop::{ContainerConfig, LockAxis, ScrollTarget, VerticalScroll};

mod common;

use common::{context, list, mouse};

const ROW: Size = Size::new(100.0, 50.0);

/// A 100x200 scrolling viewport onto a 20-row list, far from the window edges.
fn scrolling_list(
    config: ContainerConfig<common::Node>,
) -> (
    understory_drag_drop::DragDrop<common::TestHost>,
    understory_drag_drop::ContainerKey,
    common::Node,
    understory_drag_drop::ItemKey,
) {
    let mut dd = context();
    let (container, element, items) = list(&mut dd, Point::new(500.0, 500.0), ROW, 20, config);
    // Shrink the list box to a 200px tall scroller over its 1000px of rows.
    dd.host_mut().resize(element, Size::new(100.0, 200.0));
    dd.host_mut()
        .make_scrollable(element, Size::new(100.0, 1000.0));
    (dd, container, element, items[1].0)
}

#[test]
fn top_edge_scrolls_only_when_scrolled_down() {
    let (mut dd, container, element, item) = scrolling_list(ContainerConfig::default());

    // Row 1 spans y 550..600.
    dd.pointer_down(item, &mouse(550.0, 560.0, 0.0));
    dd.pointer_move(&mouse(550.0, 570.0, 10.0));
    dd.pointer_move(&mouse(550.0, 502.0, 20.0));
    let scroller = dd.container(container).unwrap().auto_scroller();
    assert!(!scroller.is_running());
    assert!(!dd.needs_animation_frame());

    let target = ScrollTarget::Element(element);
    dd.host_mut().set_scroll_offset(&target, Vec2::new(0.0, 100.0));
    dd.scrolled(&target);
    dd.pointer_move(&mouse(550.0, 503.0, 30.0));
    let scroller = dd.container(container).unwrap().auto_scroller();
    assert!(scroller.is_running());
    assert_eq!(scroller.target(), Some(&target));
    assert_eq!(scroller.directions().0, VerticalScroll::Up);

    dd.on_animation_frame(40.0);
    assert_eq!(dd.host().scrolled, [(target.clone(), Vec2::new(0.0, -2.0))]);

    // Moving back to the middle stops scrolling.
    dd.pointer_move(&mouse(550.0, 600.0, 50.0));
    assert!(!dd.container(container).unwrap().auto_scroller().is_running());

    dd.pointer_up(&mouse(550.0, 600.0, 60.0));
    assert!(!dd.needs_animation_frame());
}

#[test]
fn bottom_edge_scrolls_down() {
    let (mut dd, container, element, item) = scrolling_list(ContainerConfig::default());
    dd.pointer_down(item, &mouse(550.0, 560.0, 0.0));
    dd.pointer_move(&mouse(550.0, 570.0, 10.0));
    dd.pointer_move(&mouse(550.0, 698.0, 20.0));
    let scroller = dd.container(container).unwrap().auto_scroller();
    assert_eq!(scroller.directions().0, VerticalScroll::Down);
    assert_eq!(scroller.target(), Some(&ScrollTarget::Element(element)));
    assert!(dd.needs_animation_frame());
}

#[test]
fn axis_locked_drag_still_reaches_the_edge() {
    let (mut dd, container, element, item) =
        scrolling_list(ContainerConfig::default().with_lock_axis(LockAxis::X));
    dd.pointer_down(item, &mouse(550.0, 560.0, 0.0));
    dd.pointer_move(&mouse(550.0, 570.0, 10.0));
    // The preview stays on the pickup row; the pointer is at the bottom edge.
    dd.pointer_move(&mouse(550.0, 698.0, 20.0));
    let scroller = dd.container(container).unwrap().auto_scroller();
    assert!(scroller.is_running());
    assert_eq!(scroller.directions().0, VerticalScroll::Down);
    assert_eq!(scroller.target(), Some(&ScrollTarget::Element(element)));
}

#[test]
fn disabled_auto_scroll_never_runs() {
    let (mut dd, container, _, item) =
        scrolling_list(ContainerConfig::default().with_auto_scroll_disabled(true));
    dd.pointer_down(item, &mouse(550.0, 560.0, 0.0));
    dd.pointer_move(&mouse(550.0, 570.0, 10.0));
    dd.pointer_move(&mouse(550.0, 698.0, 20.0));
    assert!(!dd.container(container).unwrap().auto_scroller().is_running());
}
