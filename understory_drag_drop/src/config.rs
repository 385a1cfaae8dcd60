// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine, item, and container configuration.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use crate::arena::{ContainerKey, GroupKey};
use crate::container::DropContainer;
use crate::item::DragItem;

/// Engine-wide tuning shared by every item and container of a [`DragDrop`](crate::DragDrop).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragDropConfig {
    /// Manhattan distance in pixels the pointer must travel from the pickup
    /// point before a drag starts.
    pub drag_start_threshold: f64,
    /// Distance in pixels the pointer must travel on an axis, measured from
    /// the last recorded direction change, before that axis may flip direction.
    pub pointer_direction_change_threshold: f64,
    /// Pixels scrolled per animation frame while auto-scrolling.
    pub auto_scroll_step: f64,
    /// Fraction of a container's size used as the band around it in which
    /// sorting stays active.
    pub drop_proximity: f64,
    /// Fraction of a scroller's size used as the edge band that triggers
    /// auto-scrolling.
    pub scroll_proximity: f64,
    /// Window in milliseconds after a touch during which mouse events are
    /// treated as browser-emulated and ignored.
    pub synthetic_mouse_ignore_ms: f64,
    /// Multiplier applied to the preview's transition time to get the
    /// watchdog timeout for the drop animation.
    pub settle_timeout_factor: f64,
}

impl Default for DragDropConfig {
    fn default() -> Self {
        Self {
            drag_start_threshold: 5.0,
            pointer_direction_change_threshold: 5.0,
            auto_scroll_step: 2.0,
            drop_proximity: 0.05,
            scroll_proximity: 0.05,
            synthetic_mouse_ignore_ms: 800.0,
            settle_timeout_factor: 1.5,
        }
    }
}

impl DragDropConfig {
    /// Sets [`drag_start_threshold`](Self::drag_start_threshold).
    #[must_use]
    pub fn with_drag_start_threshold(mut self, px: f64) -> Self {
        self.drag_start_threshold = px;
        self
    }

    /// Sets [`pointer_direction_change_threshold`](Self::pointer_direction_change_threshold).
    #[must_use]
    pub fn with_pointer_direction_change_threshold(mut self, px: f64) -> Self {
        self.pointer_direction_change_threshold = px;
        self
    }

    /// Sets [`auto_scroll_step`](Self::auto_scroll_step).
    #[must_use]
    pub fn with_auto_scroll_step(mut self, px: f64) -> Self {
        self.auto_scroll_step = px;
        self
    }
}

/// Axis a drag may be locked to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LockAxis {
    /// Only horizontal movement; the vertical position stays at the pickup point.
    X,
    /// Only vertical movement; the horizontal position stays at the pickup point.
    Y,
}

/// Layout direction of a container's items.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow top to bottom.
    #[default]
    Vertical,
    /// Items flow along the inline axis.
    Horizontal,
}

/// Text direction, used only to flip reported indices of horizontal lists.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// Per-pointer-kind delay before a drag may start.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragStartDelay {
    /// Delay in milliseconds for mouse sequences.
    pub mouse: f64,
    /// Delay in milliseconds for touch sequences.
    pub touch: f64,
}

/// Construction-time options for a [`DragItem`].
#[derive(Clone, Debug)]
pub struct ItemConfig<E> {
    /// Lock movement to one axis. Overrides the container's lock.
    pub lock_axis: Option<LockAxis>,
    /// Ignore pointer-down while set.
    pub disabled: bool,
    /// Delay before the drag may start.
    pub drag_start_delay: DragStartDelay,
    /// Element whose rect the dragged element must stay inside.
    pub boundary: Option<E>,
    /// Custom preview content; the root element is cloned when absent.
    pub preview_template: Option<E>,
    /// Custom placeholder content; the root element is cloned when absent.
    pub placeholder_template: Option<E>,
    /// Drag handles. When non-empty, only pointer-down inside a handle arms the item.
    pub handles: SmallVec<[E; 1]>,
}

impl<E> Default for ItemConfig<E> {
    fn default() -> Self {
        Self {
            lock_axis: None,
            disabled: false,
            drag_start_delay: DragStartDelay::default(),
            boundary: None,
            preview_template: None,
            placeholder_template: None,
            handles: SmallVec::new(),
        }
    }
}

impl<E> ItemConfig<E> {
    /// Sets [`lock_axis`](Self::lock_axis).
    #[must_use]
    pub fn with_lock_axis(mut self, axis: LockAxis) -> Self {
        self.lock_axis = Some(axis);
        self
    }

    /// Adds a drag handle.
    #[must_use]
    pub fn with_handle(mut self, handle: E) -> Self {
        self.handles.push(handle);
        self
    }

    /// Sets [`boundary`](Self::boundary).
    #[must_use]
    pub fn with_boundary(mut self, boundary: E) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Sets [`drag_start_delay`](Self::drag_start_delay).
    #[must_use]
    pub fn with_drag_start_delay(mut self, delay: DragStartDelay) -> Self {
        self.drag_start_delay = delay;
        self
    }

    /// Sets [`preview_template`](Self::preview_template).
    #[must_use]
    pub fn with_preview_template(mut self, template: E) -> Self {
        self.preview_template = Some(template);
        self
    }

    /// Sets [`placeholder_template`](Self::placeholder_template).
    #[must_use]
    pub fn with_placeholder_template(mut self, template: E) -> Self {
        self.placeholder_template = Some(template);
        self
    }
}

/// Reference to a connected container, resolved when a drag starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerRef {
    /// A container handle.
    Key(ContainerKey),
    /// A container id, looked up through the hub.
    Id(String),
}

impl From<ContainerKey> for ContainerRef {
    fn from(key: ContainerKey) -> Self {
        Self::Key(key)
    }
}

impl From<&str> for ContainerRef {
    fn from(id: &str) -> Self {
        Self::Id(id.into())
    }
}

/// Veto for items entering a container.
///
/// Evaluated on every candidate check while the pointer is over the
/// container, so predicates with changing answers ("container is full") are
/// honored on the next move.
pub struct EnterPredicate<E>(Box<dyn Fn(&DragItem<E>, &DropContainer<E>) -> bool>);

impl<E> EnterPredicate<E> {
    /// Wrap a predicate closure.
    pub fn new(predicate: impl Fn(&DragItem<E>, &DropContainer<E>) -> bool + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub(crate) fn allows(&self, item: &DragItem<E>, container: &DropContainer<E>) -> bool {
        (self.0)(item, container)
    }
}

impl<E> fmt::Debug for EnterPredicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnterPredicate(..)")
    }
}

/// Construction-time options for a [`DropContainer`].
#[derive(Debug)]
pub struct ContainerConfig<E> {
    /// Unique id. Generated when absent.
    pub id: Option<String>,
    /// Item flow direction.
    pub orientation: Orientation,
    /// Text direction.
    pub direction: Direction,
    /// Ignore pointer-down on the container's items while set.
    pub disabled: bool,
    /// Keep item order fixed while dragging.
    pub sorting_disabled: bool,
    /// Never auto-scroll this container or its ancestors.
    pub auto_scroll_disabled: bool,
    /// Lock movement of the container's items to one axis.
    pub lock_axis: Option<LockAxis>,
    /// Veto for incoming items. Everything is accepted when absent.
    pub enter_predicate: Option<EnterPredicate<E>>,
    /// Containers items may be transferred into.
    pub connected_to: Vec<ContainerRef>,
    /// Scrollable ancestors, nearest first, eligible for auto-scroll.
    pub scrollable_parents: Vec<E>,
    /// Group this container joins.
    pub group: Option<GroupKey>,
}

impl<E> Default for ContainerConfig<E> {
    fn default() -> Self {
        Self {
            id: None,
            orientation: Orientation::Vertical,
            direction: Direction::Ltr,
            disabled: false,
            sorting_disabled: false,
            auto_scroll_disabled: false,
            lock_axis: None,
            enter_predicate: None,
            connected_to: Vec::new(),
            scrollable_parents: Vec::new(),
            group: None,
        }
    }
}

impl<E> ContainerConfig<E> {
    /// Sets [`id`](Self::id).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets [`orientation`](Self::orientation).
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets [`direction`](Self::direction).
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets [`sorting_disabled`](Self::sorting_disabled).
    #[must_use]
    pub fn with_sorting_disabled(mut self, disabled: bool) -> Self {
        self.sorting_disabled = disabled;
        self
    }

    /// Sets [`auto_scroll_disabled`](Self::auto_scroll_disabled).
    #[must_use]
    pub fn with_auto_scroll_disabled(mut self, disabled: bool) -> Self {
        self.auto_scroll_disabled = disabled;
        self
    }

    /// Sets [`lock_axis`](Self::lock_axis).
    #[must_use]
    pub fn with_lock_axis(mut self, axis: LockAxis) -> Self {
        self.lock_axis = Some(axis);
        self
    }

    /// Sets [`enter_predicate`](Self::enter_predicate).
    #[must_use]
    pub fn with_enter_predicate(
        mut self,
        predicate: impl Fn(&DragItem<E>, &DropContainer<E>) -> bool + 'static,
    ) -> Self {
        self.enter_predicate = Some(EnterPredicate::new(predicate));
        self
    }

    /// Adds a connected container.
    #[must_use]
    pub fn connected_to(mut self, target: impl Into<ContainerRef>) -> Self {
        self.connected_to.push(target.into());
        self
    }

    /// Adds a scrollable ancestor.
    #[must_use]
    pub fn with_scrollable_parent(mut self, parent: E) -> Self {
        self.scrollable_parents.push(parent);
        self
    }

    /// Sets [`group`](Self::group).
    #[must_use]
    pub fn in_group(mut self, group: GroupKey) -> Self {
        self.group = Some(group);
        self
    }
}
