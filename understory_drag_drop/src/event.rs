// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications emitted by the engine.
//!
//! Events are queued while the engine handles an input and drained by the
//! integrator with [`DragDrop::drain_events`](crate::DragDrop::drain_events).
//! Draining is the point where a host framework re-enters its rendering pass;
//! nothing inside the engine renders.

use kurbo::{Point, Vec2};

use crate::arena::{ContainerKey, ItemKey};
use crate::geometry::DirectionDelta;

/// Final result of a drag that ended inside a container.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DropOutcome {
    /// The dropped item.
    pub item: ItemKey,
    /// Container the item was dropped into.
    pub container: ContainerKey,
    /// Container the drag started in.
    pub previous_container: ContainerKey,
    /// Index in `previous_container` when the drag started.
    pub previous_index: usize,
    /// Index in `container` at the drop.
    pub current_index: usize,
    /// Whether the pointer was over `container` when released.
    pub is_pointer_over_container: bool,
    /// Total pointer travel from the pickup point.
    pub distance: Vec2,
}

/// Item-level notifications.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ItemEvent {
    /// The pointer crossed the start threshold.
    Started {
        /// The item.
        item: ItemKey,
    },
    /// The pointer was released after the drag started.
    Released {
        /// The item.
        item: ItemKey,
    },
    /// A move was processed while dragging.
    Moved {
        /// The item.
        item: ItemKey,
        /// Constrained pointer position.
        pointer: Point,
        /// Direction with hysteresis applied.
        delta: DirectionDelta,
        /// Pointer travel from the pickup point.
        distance: Vec2,
    },
    /// The item moved into a container.
    Entered {
        /// The item.
        item: ItemKey,
        /// The container entered.
        container: ContainerKey,
        /// The item's index in the container after entering.
        current_index: usize,
    },
    /// The item moved out of a container.
    Exited {
        /// The item.
        item: ItemKey,
        /// The container left.
        container: ContainerKey,
    },
    /// The drag finished.
    Ended {
        /// The item.
        item: ItemKey,
        /// Pointer travel from the pickup point.
        distance: Vec2,
    },
    /// The item was dropped into a container.
    Dropped(DropOutcome),
}

/// Container-level notifications.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ContainerEvent {
    /// The container is about to start receiving a drag.
    BeforeStarted {
        /// The container.
        container: ContainerKey,
    },
    /// An item moved into the container.
    Entered {
        /// The container.
        container: ContainerKey,
        /// The item.
        item: ItemKey,
        /// The item's index after entering.
        current_index: usize,
    },
    /// An item moved out of the container.
    Exited {
        /// The container.
        container: ContainerKey,
        /// The item.
        item: ItemKey,
    },
    /// The dragged item moved to a new index.
    ///
    /// Indices use the same move semantics as
    /// [`move_item_in_array`](crate::move_item_in_array).
    Sorted {
        /// The container.
        container: ContainerKey,
        /// The item.
        item: ItemKey,
        /// Index before the move.
        previous_index: usize,
        /// Index after the move.
        current_index: usize,
    },
    /// An item was dropped into the container.
    Dropped(DropOutcome),
}

/// Any notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragDropEvent {
    /// Item-level notification.
    Item(ItemEvent),
    /// Container-level notification.
    Container(ContainerEvent),
}

impl From<ItemEvent> for DragDropEvent {
    fn from(event: ItemEvent) -> Self {
        Self::Item(event)
    }
}

impl From<ContainerEvent> for DragDropEvent {
    fn from(event: ContainerEvent) -> Self {
        Self::Container(event)
    }
}
