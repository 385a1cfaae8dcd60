// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_drop --heading-base-level=0

//! Understory Drag Drop: a pointer-driven drag, sort, and transfer engine.
//!
//! The engine turns raw pointer input over a page into drag gestures over UI
//! elements:
//!
//! - Free dragging of standalone items, which keep their accumulated offset.
//! - Sorting an item within an ordered list (a *container*) with animated
//!   displacement of its neighbors.
//! - Transferring an item between connected containers.
//! - Auto-scrolling the nearest scrollable ancestor (or the viewport) while
//!   the pointer is near an edge.
//! - A drop animation of the floating preview into its resting place.
//!
//! It never mutates the integrator's data. Instead it emits
//! [`ItemEvent`]s and [`ContainerEvent`]s with enough information
//! (item, containers, previous and current index) to update it, for example
//! with [`move_item_in_array`] and [`transfer_array_item`].
//!
//! ## Not a DOM binding
//!
//! Everything the engine needs from the page goes through the
//! [`DragDropHost`] trait: element rects, tree edits, inline transforms,
//! visibility, document listeners, and scrolling. A browser binding
//! implements it over real nodes; tests implement it over an in-memory tree.
//! The host forwards native events back into the engine:
//!
//! - `mousedown`/`touchstart` on an item root or handle to [`DragDrop::pointer_down`].
//! - Global move/up listeners to [`DragDrop::pointer_move`] and [`DragDrop::pointer_up`].
//! - The capturing scroll listener to [`DragDrop::scrolled`].
//! - `transitionend` on a settling preview to [`DragDrop::transition_ended`].
//! - An animation frame loop, while [`DragDrop::needs_animation_frame`], to
//!   [`DragDrop::on_animation_frame`].
//!
//! ## API overview
//!
//! - [`DragDrop`]: owning context for items, containers, groups and the host.
//! - [`DragItem`] / [`ItemKey`]: a draggable element and its handle.
//! - [`DropContainer`] / [`ContainerKey`]: an ordered list and its handle.
//! - [`ContainerGroup`] / [`GroupKey`]: mutually connected containers.
//! - [`PointerEventHub`]: registry and reference-counted global listener binding.
//! - [`DragDropEvent`]: everything queued for [`DragDrop::drain_events`].
//!
//! ## Example
//!
//! ```no_run
//! use understory_drag_drop::{
//!     ContainerConfig, ContainerEvent, DragDrop, DragDropConfig, DragDropEvent, DragDropHost,
//!     ItemConfig, PointerInput, move_item_in_array,
//! };
//! use kurbo::Point;
//!
//! fn wire<H: DragDropHost>(host: H, list: H::Element, rows: Vec<H::Element>) {
//!     let mut dd = DragDrop::new(host, DragDropConfig::default());
//!     let container = dd.create_container(list, ContainerConfig::default()).unwrap();
//!     let items: Vec<_> = rows
//!         .into_iter()
//!         .map(|row| dd.create_item(row, ItemConfig::default()))
//!         .collect();
//!     dd.set_container_items(container, &items).unwrap();
//!
//!     let mut data: Vec<&str> = vec!["a", "b", "c"];
//!     dd.pointer_down(items[0], &PointerInput::mouse(Point::new(5.0, 5.0), 0.0));
//!     dd.pointer_move(&PointerInput::mouse(Point::new(5.0, 20.0), 10.0));
//!     dd.pointer_move(&PointerInput::mouse(Point::new(5.0, 120.0), 20.0));
//!     dd.pointer_up(&PointerInput::mouse(Point::new(5.0, 120.0), 30.0));
//!
//!     for event in dd.drain_events() {
//!         if let DragDropEvent::Container(ContainerEvent::Dropped(drop)) = event {
//!             move_item_in_array(&mut data, drop.previous_index, drop.current_index);
//!         }
//!     }
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod array;
mod auto_scroll;
mod config;
mod container;
mod drag_drop;
mod error;
mod event;
mod geometry;
mod group;
mod host;
mod hub;
mod item;
mod transform;

pub use arena::{ContainerKey, GroupKey, ItemKey};
pub use array::{copy_array_item, move_item_in_array, transfer_array_item};
pub use auto_scroll::{
    AutoScroller, HorizontalScroll, VerticalScroll, horizontal_scroll_direction,
    scroll_directions, vertical_scroll_direction,
};
pub use config::{
    ContainerConfig, ContainerRef, Direction, DragDropConfig, DragStartDelay, EnterPredicate,
    ItemConfig, LockAxis, Orientation,
};
pub use container::{DropContainer, ItemPosition};
pub use drag_drop::DragDrop;
pub use error::DragDropError;
pub use event::{ContainerEvent, DragDropEvent, DropOutcome, ItemEvent};
pub use geometry::{AxisDirection, DirectionDelta, DirectionTracker, is_inside_rect, is_near_rect};
pub use group::ContainerGroup;
pub use host::{
    DragArtifact, DragDropHost, GlobalListener, InputResponse, ListenerOptions, PointerInput,
    PointerKind, ScrollMetrics, ScrollTarget,
};
pub use hub::PointerEventHub;
pub use item::{DragItem, DragPhase};
pub use transform::{parse_css_time_ms, transform_transition_ms, translate3d};
