// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop containers: ordered lists that sort a dragged item among their own
//! items and accept items transferred from connected containers.
//!
//! When a drag starts (or an item enters), the container snapshots the rect of
//! every participating item, sorted by leading edge. Sorting never re-measures:
//! each swap shifts the cached rects by the same amounts it writes into the
//! elements' transforms, so the cache stays in step with what is on screen even
//! while CSS transitions are still running.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use tracing::{debug, trace};

use crate::array::move_item_in_array;
use crate::arena::{ContainerKey, GroupKey, ItemKey};
use crate::auto_scroll::{AutoScroller, HorizontalScroll, VerticalScroll, scroll_directions};
use crate::config::{ContainerConfig, ContainerRef, Direction, EnterPredicate, LockAxis, Orientation};
use crate::drag_drop::DragDrop;
use crate::event::{ContainerEvent, DropOutcome};
use crate::geometry::{AxisDirection, DirectionDelta, floor_rect, is_inside_rect, is_near_rect};
use crate::host::{DragDropHost, ScrollTarget};
use crate::transform::translate3d;

/// Cached geometry of one participating item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ItemPosition {
    /// The item.
    pub item: ItemKey,
    /// Accumulated translation along the container's axis since the drag
    /// started.
    pub offset: f64,
    /// Client rect, shifted in step with `offset` and with scrolling.
    pub rect: Rect,
}

/// Cached scroll offset (and rect, for elements) of a node that may scroll
/// the container's items.
#[derive(Clone, Debug)]
pub(crate) struct ParentPosition<E> {
    pub(crate) target: ScrollTarget<E>,
    pub(crate) scroll: Vec2,
    pub(crate) rect: Option<Rect>,
}

/// The item most recently swapped with, and the pointer direction on the
/// container's axis at the time. Moving on over the same item in the same
/// direction never swaps again, which stops oscillation between neighbors of
/// different sizes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct PreviousSwap {
    item: Option<ItemKey>,
    delta: AxisDirection,
}

/// An ordered list of draggable items.
#[derive(Debug)]
pub struct DropContainer<E> {
    pub(crate) key: ContainerKey,
    pub(crate) id: String,
    pub(crate) element: E,
    pub(crate) orientation: Orientation,
    pub(crate) direction: Direction,
    pub(crate) disabled: bool,
    pub(crate) sorting_disabled: bool,
    pub(crate) auto_scroll_disabled: bool,
    pub(crate) lock_axis: Option<LockAxis>,
    pub(crate) enter_predicate: Option<EnterPredicate<E>>,
    pub(crate) connected_to: Vec<ContainerRef>,
    pub(crate) scrollable_parents: Vec<E>,
    pub(crate) group: Option<GroupKey>,
    /// Declared items, in the integrator's order.
    pub(crate) items: Vec<ItemKey>,

    pub(crate) is_dragging: bool,
    pub(crate) active_items: Vec<ItemKey>,
    pub(crate) positions: Vec<ItemPosition>,
    pub(crate) client_rect: Option<Rect>,
    pub(crate) parent_positions: Vec<ParentPosition<E>>,
    pub(crate) siblings: Vec<ContainerKey>,
    pub(crate) receiving_from: Vec<ContainerKey>,
    previous_swap: PreviousSwap,
    pub(crate) scroller: AutoScroller<E>,
}

impl<E: Clone + PartialEq> DropContainer<E> {
    pub(crate) fn new(key: ContainerKey, id: String, element: E, config: ContainerConfig<E>) -> Self {
        Self {
            key,
            id,
            element,
            orientation: config.orientation,
            direction: config.direction,
            disabled: config.disabled,
            sorting_disabled: config.sorting_disabled,
            auto_scroll_disabled: config.auto_scroll_disabled,
            lock_axis: config.lock_axis,
            enter_predicate: config.enter_predicate,
            connected_to: config.connected_to,
            scrollable_parents: config.scrollable_parents,
            group: config.group,
            items: Vec::new(),
            is_dragging: false,
            active_items: Vec::new(),
            positions: Vec::new(),
            client_rect: None,
            parent_positions: Vec::new(),
            siblings: Vec::new(),
            receiving_from: Vec::new(),
            previous_swap: PreviousSwap::default(),
            scroller: AutoScroller::default(),
        }
    }

    /// The container's handle.
    pub fn key(&self) -> ContainerKey {
        self.key
    }

    /// The container's unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The list element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Declared items in order.
    pub fn items(&self) -> &[ItemKey] {
        &self.items
    }

    /// Item flow direction.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Text direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` if pointer-down on the container's items is ignored.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the container.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Returns `true` if the item order is fixed while dragging.
    pub fn is_sorting_disabled(&self) -> bool {
        self.sorting_disabled
    }

    /// Fix or release the item order.
    pub fn set_sorting_disabled(&mut self, disabled: bool) {
        self.sorting_disabled = disabled;
    }

    /// Returns `true` if auto-scrolling is off for this container.
    pub fn is_auto_scroll_disabled(&self) -> bool {
        self.auto_scroll_disabled
    }

    /// Turn auto-scrolling off or on.
    pub fn set_auto_scroll_disabled(&mut self, disabled: bool) {
        self.auto_scroll_disabled = disabled;
        if disabled {
            self.scroller.stop();
        }
    }

    /// Axis lock applied to the container's items.
    pub fn lock_axis(&self) -> Option<LockAxis> {
        self.lock_axis
    }

    /// Replace the enter predicate.
    pub fn set_enter_predicate(&mut self, predicate: Option<EnterPredicate<E>>) {
        self.enter_predicate = predicate;
    }

    /// Connected containers as configured.
    pub fn connected_to(&self) -> &[ContainerRef] {
        &self.connected_to
    }

    /// Replace the connected containers. Takes effect on the next drag.
    pub fn set_connected_to(&mut self, targets: Vec<ContainerRef>) {
        self.connected_to = targets;
    }

    /// The group this container belongs to.
    pub fn group(&self) -> Option<GroupKey> {
        self.group
    }

    /// Returns `true` while a drag is sorting inside this container.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Returns `true` while a connected container has an active drag that
    /// may be transferred here.
    pub fn is_receiving(&self) -> bool {
        !self.receiving_from.is_empty()
    }

    /// Cached item geometry, in current visual order.
    pub fn item_positions(&self) -> &[ItemPosition] {
        &self.positions
    }

    /// The container's cached client rect.
    pub fn client_rect(&self) -> Option<Rect> {
        self.client_rect
    }

    /// Auto-scroll state.
    pub fn auto_scroller(&self) -> &AutoScroller<E> {
        &self.scroller
    }

    fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Report a cache index the way the integrator sees the list.
    fn external_index(&self, index: usize) -> usize {
        if self.is_horizontal() && self.direction == Direction::Rtl {
            self.positions.len().saturating_sub(1 + index)
        } else {
            index
        }
    }

    fn leading_edge(&self, rect: Rect) -> f64 {
        if self.is_horizontal() { rect.x0 } else { rect.y0 }
    }

    fn trailing_edge(&self, rect: Rect) -> f64 {
        if self.is_horizontal() { rect.x1 } else { rect.y1 }
    }

    fn extent(&self, rect: Rect) -> f64 {
        if self.is_horizontal() {
            rect.width()
        } else {
            rect.height()
        }
    }

    fn axis_delta(&self, delta: DirectionDelta) -> AxisDirection {
        if self.is_horizontal() { delta.x } else { delta.y }
    }

    /// Index in `positions` the pointer is over.
    ///
    /// The dragged item itself only matches when it is alone. With `delta`,
    /// the last swapped item is skipped while the pointer keeps moving in the
    /// direction of that swap.
    fn index_from_pointer(&self, item: ItemKey, point: Point, delta: Option<DirectionDelta>) -> Option<usize> {
        let horizontal = self.is_horizontal();
        self.positions.iter().position(|position| {
            if position.item == item {
                return self.positions.len() < 2;
            }
            if let Some(delta) = delta
                && self.previous_swap.item == Some(position.item)
                && self.previous_swap.delta == self.axis_delta(delta)
            {
                return false;
            }
            // Half-open, so a shared edge belongs to the later item.
            let rect = floor_rect(position.rect);
            if horizontal {
                point.x >= rect.x0 && point.x < rect.x1
            } else {
                point.y >= rect.y0 && point.y < rect.y1
            }
        })
    }

    /// How far the dragged item moves when swapping from `current` to `new`.
    fn item_offset(&self, current: Rect, new: Rect, delta: f64) -> f64 {
        let mut offset = self.leading_edge(new) - self.leading_edge(current);
        if delta < 0.0 {
            offset += self.extent(new) - self.extent(current);
        }
        offset
    }

    /// How far every item between the old and new index moves.
    ///
    /// The dragged item's size plus the gap to its immediate neighbor on the
    /// side being vacated, so margins between items are preserved.
    fn sibling_offset(&self, current_index: usize, delta: f64) -> f64 {
        let current = self.positions[current_index].rect;
        let immediate = if delta < 0.0 {
            self.positions.get(current_index + 1)
        } else {
            current_index
                .checked_sub(1)
                .and_then(|i| self.positions.get(i))
        };
        let mut offset = self.extent(current) * delta;
        if let Some(immediate) = immediate {
            if delta < 0.0 {
                offset -= self.leading_edge(immediate.rect) - self.trailing_edge(current);
            } else {
                offset += self.leading_edge(current) - self.trailing_edge(immediate.rect);
            }
        }
        offset
    }
}

impl<H: DragDropHost> DragDrop<H> {
    /// The index of `item` in `container`.
    ///
    /// Outside a drag this is the declared index. During a drag it is the
    /// visual index, mirrored for right-to-left horizontal lists.
    pub fn get_item_index(&self, container: ContainerKey, item: ItemKey) -> Option<usize> {
        let c = self.containers.get(container)?;
        if !c.is_dragging {
            return c.items.iter().position(|k| *k == item);
        }
        let index = c.positions.iter().position(|p| p.item == item)?;
        Some(c.external_index(index))
    }

    /// Returns `true` while a connected container has an active drag that
    /// may be transferred into `container`.
    pub fn is_receiving(&self, container: ContainerKey) -> bool {
        self.containers
            .get(container)
            .is_some_and(DropContainer::is_receiving)
    }

    /// Returns `true` if `point` is inside `container`'s cached rect.
    pub fn is_over_container(&self, container: ContainerKey, point: Point) -> bool {
        self.can_return_item(container, point)
    }

    pub(crate) fn container_start(&mut self, key: ContainerKey) {
        self.emit(ContainerEvent::BeforeStarted { container: key });
        let Some(c) = self.containers.get(key) else {
            return;
        };
        let mut active = c.items.clone();
        if c.is_dragging {
            // Keep an item that is mid-transfer into this container.
            active.extend(
                c.active_items
                    .iter()
                    .copied()
                    .filter(|k| !c.items.contains(k) && self.hub.is_dragging(*k)),
            );
        }
        let siblings = self.resolve_siblings(key);
        if let Some(c) = self.containers.get_mut(key) {
            c.is_dragging = true;
            c.active_items = active;
            c.siblings = siblings.clone();
        }
        self.cache_item_positions(key);
        self.cache_parent_positions(key);
        for sibling in siblings {
            self.start_receiving(sibling, key);
        }
        trace!(?key, "container started");
    }

    /// Connected containers plus group members, minus `key` itself.
    fn resolve_siblings(&self, key: ContainerKey) -> Vec<ContainerKey> {
        let Some(c) = self.containers.get(key) else {
            return Vec::new();
        };
        let mut siblings = Vec::new();
        let connected = c.connected_to.iter().filter_map(|target| match target {
            ContainerRef::Key(k) => Some(*k),
            ContainerRef::Id(id) => self.hub.container(id),
        });
        let grouped = c
            .group
            .and_then(|g| self.groups.get(g))
            .map(|g| g.members.clone())
            .unwrap_or_default();
        for sibling in connected.chain(grouped) {
            if sibling != key && self.containers.contains(sibling) && !siblings.contains(&sibling) {
                siblings.push(sibling);
            }
        }
        siblings
    }

    fn start_receiving(&mut self, key: ContainerKey, from: ContainerKey) {
        let Some(c) = self.containers.get_mut(key) else {
            return;
        };
        if c.receiving_from.contains(&from) {
            return;
        }
        c.receiving_from.push(from);
        self.cache_parent_positions(key);
    }

    fn stop_receiving(&mut self, key: ContainerKey, from: ContainerKey) {
        if let Some(c) = self.containers.get_mut(key) {
            c.receiving_from.retain(|k| *k != from);
        }
    }

    fn cache_item_positions(&mut self, key: ContainerKey) {
        let Some(c) = self.containers.get(key) else {
            return;
        };
        let mut positions: Vec<ItemPosition> = c
            .active_items
            .iter()
            .filter_map(|&item| {
                let i = self.items.get(item)?;
                let element = match i.placeholder.as_ref() {
                    Some(placeholder) if self.hub.is_dragging(item) => placeholder,
                    _ => &i.root,
                };
                Some(ItemPosition {
                    item,
                    offset: 0.0,
                    rect: self.host.client_rect(element),
                })
            })
            .collect();
        positions.sort_by(|a, b| c.leading_edge(a.rect).total_cmp(&c.leading_edge(b.rect)));
        if let Some(c) = self.containers.get_mut(key) {
            c.positions = positions;
        }
    }

    /// Snapshot the container's rect and the scroll offset of every node that
    /// can scroll it: the container element, its declared scrollable
    /// ancestors, then the viewport.
    pub(crate) fn cache_parent_positions(&mut self, key: ContainerKey) {
        let Some(c) = self.containers.get(key) else {
            return;
        };
        let mut targets = vec![ScrollTarget::Element(c.element.clone())];
        for parent in &c.scrollable_parents {
            let target = ScrollTarget::Element(parent.clone());
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets.push(ScrollTarget::Viewport);
        let parent_positions = targets
            .into_iter()
            .map(|target| ParentPosition {
                scroll: self.host.scroll_metrics(&target).offset,
                rect: match &target {
                    ScrollTarget::Element(element) => Some(self.host.client_rect(element)),
                    ScrollTarget::Viewport => None,
                },
                target,
            })
            .collect::<Vec<_>>();
        let client_rect = self.host.client_rect(&c.element);
        if let Some(c) = self.containers.get_mut(key) {
            c.parent_positions = parent_positions;
            c.client_rect = Some(client_rect);
        }
    }

    /// Update the cached geometry of a dragging container after `target`
    /// scrolled. Returns the shift applied, or `None` if `target` is not one
    /// of the container's cached scroll nodes.
    pub(crate) fn container_handle_scroll(
        &mut self,
        key: ContainerKey,
        target: &ScrollTarget<H::Element>,
    ) -> Option<Vec2> {
        let offset = self.host.scroll_metrics(target).offset;
        let c = self.containers.get_mut(key)?;
        let index = c.parent_positions.iter().position(|p| p.target == *target)?;
        let difference = c.parent_positions[index].scroll - offset;
        c.parent_positions[index].scroll = offset;
        for (i, position) in c.parent_positions.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            let inside = match (target, &position.target) {
                (ScrollTarget::Viewport, _) => true,
                (ScrollTarget::Element(scrolled), ScrollTarget::Element(node)) => {
                    self.host.contains(scrolled, node)
                }
                (ScrollTarget::Element(_), ScrollTarget::Viewport) => false,
            };
            if inside && let Some(rect) = position.rect.as_mut() {
                *rect = *rect + difference;
            }
        }
        c.client_rect = c.parent_positions.first().and_then(|p| p.rect);
        for position in &mut c.positions {
            position.rect = position.rect + difference;
        }
        trace!(?key, ?difference, "adjusted cached geometry for scroll");
        Some(difference)
    }

    /// Move `item` into `container` at the index under the pointer.
    pub(crate) fn container_enter(&mut self, key: ContainerKey, item: ItemKey, point: Point) {
        self.container_start(key);
        let Some(c) = self.containers.get(key) else {
            return;
        };
        let Some(i) = self.items.get(item) else {
            return;
        };
        let Some(placeholder) = i.placeholder.clone() else {
            return;
        };
        let returning_index = (c.sorting_disabled && i.initial_container == Some(key))
            .then_some(i.initial_index);
        let new_index = returning_index.or_else(|| c.index_from_pointer(item, point, None));

        let mut active = c.active_items.clone();
        let current_index = active.iter().position(|k| *k == item);
        let mut reference = new_index.and_then(|n| active.get(n)).copied();
        if reference == Some(item) {
            reference = new_index.and_then(|n| active.get(n + 1)).copied();
        }
        if let Some(current_index) = current_index {
            active.remove(current_index);
        }
        let reference = reference
            .filter(|r| !self.hub.is_dragging(*r))
            .and_then(|r| self.items.get(r))
            .map(|r| r.root.clone());
        let container_element = c.element.clone();
        match (reference, new_index) {
            (Some(reference), Some(new_index)) => {
                let parent = self.host.parent(&reference).unwrap_or(container_element);
                self.host.insert_before(&parent, &placeholder, Some(&reference));
                active.insert(new_index.min(active.len()), item);
            }
            _ => {
                self.host.insert_before(&container_element, &placeholder, None);
                active.push(item);
            }
        }
        self.host.set_transform(&placeholder, "");
        if let Some(c) = self.containers.get_mut(key) {
            c.active_items = active;
        }
        self.cache_item_positions(key);
        let current_index = self.get_item_index(key, item).unwrap_or(0);
        self.emit(ContainerEvent::Entered {
            container: key,
            item,
            current_index,
        });
    }

    /// Let go of `item` after it moved to another container.
    pub(crate) fn container_exit(&mut self, key: ContainerKey, item: ItemKey) {
        self.container_reset(key);
        self.emit(ContainerEvent::Exited {
            container: key,
            item,
        });
    }

    pub(crate) fn container_drop(&mut self, key: ContainerKey, outcome: DropOutcome) {
        self.container_reset(key);
        self.emit(ContainerEvent::Dropped(outcome));
    }

    /// Clear every transient transform and cache and stop scrolling.
    pub(crate) fn container_reset(&mut self, key: ContainerKey) {
        let Some(c) = self.containers.get_mut(key) else {
            return;
        };
        let was_dragging = core::mem::replace(&mut c.is_dragging, false);
        let active = core::mem::take(&mut c.active_items);
        // The sibling list outlives the drag so the item can keep moving on.
        let siblings = c.siblings.clone();
        c.positions.clear();
        c.previous_swap = PreviousSwap::default();
        c.scroller.stop();
        for item in active {
            if let Some(i) = self.items.get(item) {
                self.host.set_transform(&i.root, "");
            }
        }
        for sibling in siblings {
            self.stop_receiving(sibling, key);
        }
        if was_dragging {
            trace!(?key, "container reset");
        }
    }

    /// The first sibling of `container` that can take `item` at `point`.
    pub(crate) fn sibling_container_from_position(
        &self,
        container: ContainerKey,
        item: ItemKey,
        point: Point,
    ) -> Option<ContainerKey> {
        let c = self.containers.get(container)?;
        c.siblings
            .iter()
            .copied()
            .find(|sibling| self.can_receive(*sibling, item, point))
    }

    fn can_receive(&self, key: ContainerKey, item: ItemKey, point: Point) -> bool {
        let Some(c) = self.containers.get(key) else {
            return false;
        };
        let Some(rect) = c.client_rect else {
            return false;
        };
        if !is_inside_rect(rect, point) {
            return false;
        }
        if let Some(predicate) = c.enter_predicate.as_ref() {
            let Some(i) = self.items.get(item) else {
                return false;
            };
            if !predicate.allows(i, c) {
                return false;
            }
        }
        // The rect may be covered by something else, so confirm the topmost
        // element at the pointer actually belongs to this container.
        match self.host.element_from_point(&c.element, point) {
            Some(element) => element == c.element || self.host.contains(&c.element, &element),
            None => false,
        }
    }

    /// Whether `point` is over `container`, so an item may go back to it.
    pub(crate) fn can_return_item(&self, container: ContainerKey, point: Point) -> bool {
        self.containers
            .get(container)
            .and_then(|c| c.client_rect)
            .is_some_and(|rect| is_inside_rect(rect, point))
    }

    /// Move `item` to the index under the pointer, shifting every item in
    /// between.
    pub(crate) fn container_sort_item(
        &mut self,
        key: ContainerKey,
        item: ItemKey,
        point: Point,
        delta: DirectionDelta,
    ) {
        let proximity = self.config.drop_proximity;
        let Some(c) = self.containers.get(key) else {
            return;
        };
        if c.sorting_disabled
            || !c
                .client_rect
                .is_some_and(|rect| is_near_rect(rect, proximity, point))
        {
            return;
        }
        let Some(new_index) = c.index_from_pointer(item, point, Some(delta)) else {
            return;
        };
        let Some(current_index) = c.positions.iter().position(|p| p.item == item) else {
            return;
        };
        if new_index == current_index {
            return;
        }
        let horizontal = c.is_horizontal();
        let sign = if current_index > new_index { 1.0 } else { -1.0 };
        let item_offset = c.item_offset(
            c.positions[current_index].rect,
            c.positions[new_index].rect,
            sign,
        );
        let sibling_offset = c.sibling_offset(current_index, sign);
        let swap = PreviousSwap {
            item: Some(c.positions[new_index].item),
            delta: c.axis_delta(delta),
        };
        let previous_order: Vec<ItemKey> = c.positions.iter().map(|p| p.item).collect();

        let Some(c) = self.containers.get_mut(key) else {
            return;
        };
        c.previous_swap = swap;
        move_item_in_array(&mut c.positions, current_index, new_index);
        let previous_index = c.external_index(current_index);
        let current = c.external_index(new_index);

        for (index, position) in c.positions.iter_mut().enumerate() {
            if previous_order[index] == position.item {
                continue;
            }
            let is_dragged = position.item == item;
            let offset = if is_dragged { item_offset } else { sibling_offset };
            let Some(i) = self.items.get(position.item) else {
                continue;
            };
            let element = if is_dragged {
                i.placeholder.as_ref().unwrap_or(&i.root)
            } else {
                &i.root
            };
            position.offset += offset;
            let (transform, shift) = if horizontal {
                (Vec2::new(position.offset, 0.0), Vec2::new(offset, 0.0))
            } else {
                (Vec2::new(0.0, position.offset), Vec2::new(0.0, offset))
            };
            self.host.set_transform(element, &translate3d(transform));
            position.rect = position.rect + shift;
        }
        self.emit(ContainerEvent::Sorted {
            container: key,
            item,
            previous_index,
            current_index: current,
        });
        debug!(?key, ?item, previous_index, current_index = current, "sorted");
    }

    /// Resolve which node should auto-scroll for `point` and hand the
    /// decision to the container's scroller.
    pub(crate) fn start_scrolling_if_necessary(&mut self, key: ContainerKey, point: Point) {
        let drop_proximity = self.config.drop_proximity;
        let scroll_proximity = self.config.scroll_proximity;
        let Some(c) = self.containers.get(key) else {
            return;
        };
        if c.auto_scroll_disabled {
            return;
        }
        let mut decision = None;
        for position in &c.parent_positions {
            let (ScrollTarget::Element(_), Some(rect)) = (&position.target, position.rect) else {
                continue;
            };
            if !is_near_rect(rect, drop_proximity, point) {
                continue;
            }
            let metrics = self.host.scroll_metrics(&position.target);
            let (vertical, horizontal) = scroll_directions(metrics, rect, scroll_proximity, point);
            if vertical != VerticalScroll::None || horizontal != HorizontalScroll::None {
                decision = Some((position.target.clone(), vertical, horizontal));
                break;
            }
        }
        let (target, vertical, horizontal) = decision.unwrap_or_else(|| {
            let viewport = Rect::from_origin_size(Point::ZERO, self.host.viewport_size());
            let metrics = self.host.scroll_metrics(&ScrollTarget::Viewport);
            let (vertical, horizontal) =
                scroll_directions(metrics, viewport, scroll_proximity, point);
            (ScrollTarget::Viewport, vertical, horizontal)
        });
        if let Some(c) = self.containers.get_mut(key)
            && c.scroller.update(target, vertical, horizontal)
        {
            debug!(?key, ?vertical, ?horizontal, "auto-scroll changed");
        }
    }

    pub(crate) fn stop_scrolling(&mut self, key: ContainerKey) {
        if let Some(c) = self.containers.get_mut(key) {
            c.scroller.stop();
        }
    }
}
