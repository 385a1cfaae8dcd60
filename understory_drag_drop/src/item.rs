// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draggable items and the per-item pointer state machine.
//!
//! An item moves through [`DragPhase`]s:
//!
//! - `Idle` until a qualifying pointer-down arms it.
//! - `Armed` until the pointer travels past the start threshold (or is
//!   released first, which ends the sequence without any notification).
//! - `Dragging` until release.
//! - `Settling` while the preview animates into the placeholder's rect.
//!
//! Items attached to a container are moved through the tree by a preview and
//! a placeholder. Standalone items are translated in place and remember their
//! accumulated offset across drags.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;
use tracing::debug;

use crate::arena::{ContainerKey, ItemKey};
use crate::config::{DragStartDelay, ItemConfig, LockAxis};
use crate::drag_drop::DragDrop;
use crate::event::{DropOutcome, ItemEvent};
use crate::geometry::{DirectionTracker, clamp_to_boundary};
use crate::host::{DragArtifact, DragDropHost, InputResponse, PointerInput, PointerKind, ScrollTarget};
use crate::transform::translate3d;

/// Where an item is in its drag sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Not involved in a drag.
    #[default]
    Idle,
    /// Pointer is down but has not travelled past the start threshold.
    Armed,
    /// Dragging.
    Dragging,
    /// Released; the preview is animating into place.
    Settling,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Settle {
    pub(crate) deadline: f64,
    pub(crate) pointer: Point,
}

/// A draggable element.
#[derive(Debug)]
pub struct DragItem<E> {
    pub(crate) key: ItemKey,
    pub(crate) root: E,
    pub(crate) lock_axis: Option<LockAxis>,
    pub(crate) disabled: bool,
    pub(crate) drag_start_delay: DragStartDelay,
    pub(crate) boundary: Option<E>,
    pub(crate) preview_template: Option<E>,
    pub(crate) placeholder_template: Option<E>,
    pub(crate) handles: SmallVec<[E; 1]>,
    pub(crate) disabled_handles: SmallVec<[E; 1]>,

    pub(crate) phase: DragPhase,
    pub(crate) pointer_kind: PointerKind,
    pub(crate) pickup_in_element: Vec2,
    pub(crate) pickup_on_page: Point,
    pub(crate) last_pointer: Point,
    pub(crate) direction: DirectionTracker,
    pub(crate) has_moved: bool,
    pub(crate) drag_start_time: f64,
    pub(crate) last_touch_time: Option<f64>,
    pub(crate) viewport_scroll: Vec2,
    pub(crate) boundary_rect: Option<Rect>,
    pub(crate) drag_size: Size,

    pub(crate) passive_transform: Vec2,
    pub(crate) active_transform: Vec2,

    pub(crate) preview: Option<E>,
    pub(crate) placeholder: Option<E>,
    pub(crate) next_sibling: Option<E>,
    pub(crate) container: Option<ContainerKey>,
    pub(crate) initial_container: Option<ContainerKey>,
    pub(crate) initial_index: usize,
    pub(crate) settle: Option<Settle>,
}

impl<E: Clone + PartialEq> DragItem<E> {
    pub(crate) fn new(key: ItemKey, root: E, config: ItemConfig<E>) -> Self {
        Self {
            key,
            root,
            lock_axis: config.lock_axis,
            disabled: config.disabled,
            drag_start_delay: config.drag_start_delay,
            boundary: config.boundary,
            preview_template: config.preview_template,
            placeholder_template: config.placeholder_template,
            handles: config.handles,
            disabled_handles: SmallVec::new(),
            phase: DragPhase::Idle,
            pointer_kind: PointerKind::Mouse,
            pickup_in_element: Vec2::ZERO,
            pickup_on_page: Point::ZERO,
            last_pointer: Point::ZERO,
            direction: DirectionTracker::default(),
            has_moved: false,
            drag_start_time: 0.0,
            last_touch_time: None,
            viewport_scroll: Vec2::ZERO,
            boundary_rect: None,
            drag_size: Size::ZERO,
            passive_transform: Vec2::ZERO,
            active_transform: Vec2::ZERO,
            preview: None,
            placeholder: None,
            next_sibling: None,
            container: None,
            initial_container: None,
            initial_index: 0,
            settle: None,
        }
    }

    /// The item's handle. Use it to map the item back to its data.
    pub fn key(&self) -> ItemKey {
        self.key
    }

    /// The element being dragged.
    pub fn root_element(&self) -> &E {
        &self.root
    }

    /// The placeholder left in the list while dragging.
    pub fn placeholder_element(&self) -> Option<&E> {
        self.placeholder.as_ref()
    }

    /// The floating preview while dragging or settling.
    pub fn preview_element(&self) -> Option<&E> {
        self.preview.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Returns `true` between crossing the start threshold and release.
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// The container the item currently belongs to.
    ///
    /// While dragging this is the container the item is hovering; otherwise
    /// it is the container that lists the item.
    pub fn container(&self) -> Option<ContainerKey> {
        self.container
    }

    /// The container the current drag started in.
    pub fn initial_container(&self) -> Option<ContainerKey> {
        self.initial_container
    }

    /// Returns `true` if the item's own disabled flag is set.
    ///
    /// A disabled container or group also blocks the item; see
    /// [`DragDrop::is_item_disabled`].
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable the item.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Axis lock, if any.
    pub fn lock_axis(&self) -> Option<LockAxis> {
        self.lock_axis
    }

    /// Change the axis lock.
    pub fn set_lock_axis(&mut self, axis: Option<LockAxis>) {
        self.lock_axis = axis;
    }

    /// Drag handles.
    pub fn handles(&self) -> &[E] {
        &self.handles
    }

    /// Add a drag handle.
    pub fn add_handle(&mut self, handle: E) {
        if !self.handles.contains(&handle) {
            self.handles.push(handle);
        }
    }

    /// Remove a drag handle.
    pub fn remove_handle(&mut self, handle: &E) {
        self.handles.retain(|h| h != handle);
        self.disabled_handles.retain(|h| h != handle);
    }

    /// Stop (or resume) arming through `handle`.
    pub fn set_handle_disabled(&mut self, handle: &E, disabled: bool) {
        if disabled {
            if !self.disabled_handles.contains(handle) {
                self.disabled_handles.push(handle.clone());
            }
        } else {
            self.disabled_handles.retain(|h| h != handle);
        }
    }

    /// Pointer travel since pickup, at the last processed move.
    pub fn distance(&self) -> Vec2 {
        self.last_pointer - self.pickup_on_page
    }
}

impl<H: DragDropHost> DragDrop<H> {
    /// Returns `true` if `item`, its container, or its container's group is
    /// disabled.
    pub fn is_item_disabled(&self, item: ItemKey) -> bool {
        let Some(i) = self.items.get(item) else {
            return true;
        };
        if i.disabled {
            return true;
        }
        let Some(container) = i.container.and_then(|c| self.containers.get(c)) else {
            return false;
        };
        container.disabled
            || container
                .group
                .and_then(|g| self.groups.get(g))
                .is_some_and(|g| g.disabled)
    }

    /// Handle pointer-down on an item's root element or one of its handles.
    ///
    /// Arms the item if the press qualifies. The returned response tells the
    /// host whether to stop propagation (so nested draggables don't also arm)
    /// and whether to prevent the default action (so native image/link
    /// dragging doesn't take over).
    pub fn pointer_down(&mut self, key: ItemKey, input: &PointerInput<H::Element>) -> InputResponse {
        if self.is_item_disabled(key) {
            return InputResponse::default();
        }
        let Some(item) = self.items.get(key) else {
            return InputResponse::default();
        };
        if !item.handles.is_empty() {
            let Some(target) = input.target.as_ref() else {
                return InputResponse::default();
            };
            let in_enabled_handle = item.handles.iter().any(|h| {
                !item.disabled_handles.contains(h) && self.host.contains(h, target)
            });
            if !in_enabled_handle {
                return InputResponse::default();
            }
        }

        let response = InputResponse {
            stop_propagation: true,
            prevent_default: input.kind == PointerKind::Mouse
                && input
                    .target
                    .as_ref()
                    .is_some_and(|t| self.host.is_natively_draggable(t)),
        };

        let synthetic = input.kind == PointerKind::Mouse
            && item.last_touch_time.is_some_and(|t| {
                input.timestamp - t < self.config.synthetic_mouse_ignore_ms
            });
        if item.phase != DragPhase::Idle
            || self.hub.is_dragging(key)
            || (input.kind == PointerKind::Mouse && input.button != 0)
            || synthetic
        {
            return response;
        }

        let root_rect = self.host.client_rect(&item.root);
        let boundary_rect = item.boundary.as_ref().map(|b| self.host.client_rect(b));
        let viewport_scroll = self.host.scroll_metrics(&ScrollTarget::Viewport).offset;
        let position = input.position;

        let Some(item) = self.items.get_mut(key) else {
            return response;
        };
        item.phase = DragPhase::Armed;
        item.pointer_kind = input.kind;
        item.has_moved = false;
        item.pickup_in_element = if item.preview_template.is_some() {
            Vec2::ZERO
        } else {
            position - root_rect.origin()
        };
        item.pickup_on_page = position;
        item.last_pointer = position;
        item.direction = DirectionTracker::new(position);
        item.drag_start_time = input.timestamp;
        item.viewport_scroll = viewport_scroll;
        item.boundary_rect = boundary_rect;
        item.drag_size = root_rect.size();
        item.active_transform = item.passive_transform;
        item.initial_container = item.container;
        if input.kind == PointerKind::Touch {
            item.last_touch_time = Some(input.timestamp);
        }
        self.hub.start_dragging(&mut self.host, key, input.kind);
        debug!(?key, kind = ?input.kind, "armed");
        response
    }

    /// Returns `true` if the native event should be default-prevented.
    pub(crate) fn item_pointer_move(&mut self, key: ItemKey, input: &PointerInput<H::Element>) -> bool {
        let Some(item) = self.items.get(key) else {
            return false;
        };
        match item.phase {
            DragPhase::Armed => {
                let travel = input.position - item.pickup_on_page;
                if travel.x.abs() + travel.y.abs() <= self.config.drag_start_threshold {
                    return false;
                }
                let delay = match item.pointer_kind {
                    PointerKind::Mouse => item.drag_start_delay.mouse,
                    PointerKind::Touch => item.drag_start_delay.touch,
                };
                if input.timestamp < item.drag_start_time + delay {
                    // Moved too early: treat it as a scroll or tap, not a drag.
                    self.end_drag_sequence(key, input);
                    return false;
                }
                // Another drag is sorting in, or transferring into, the container.
                let container_busy = item
                    .container
                    .and_then(|c| self.containers.get(c))
                    .is_some_and(|c| c.is_dragging || c.is_receiving());
                if !container_busy {
                    self.start_drag_sequence(key, input);
                }
                true
            }
            DragPhase::Dragging => {
                let constrained = self.constrained_pointer_position(key, input.position);
                let threshold = self.config.pointer_direction_change_threshold;
                let Some(item) = self.items.get_mut(key) else {
                    return false;
                };
                item.has_moved = true;
                item.last_pointer = input.position;
                let delta = item.direction.update(constrained, threshold);
                let distance = constrained - item.pickup_on_page;
                if item.container.is_some() {
                    self.update_active_container(key, constrained, input.position);
                } else {
                    item.active_transform = constrained - item.pickup_on_page + item.passive_transform;
                    self.host
                        .set_transform(&item.root, &translate3d(item.active_transform));
                }
                self.emit(ItemEvent::Moved {
                    item: key,
                    pointer: constrained,
                    delta,
                    distance,
                });
                true
            }
            DragPhase::Idle | DragPhase::Settling => false,
        }
    }

    fn start_drag_sequence(&mut self, key: ItemKey, input: &PointerInput<H::Element>) {
        let initial_index = self
            .items
            .get(key)
            .and_then(|i| i.container)
            .and_then(|c| self.get_item_index(c, key))
            .unwrap_or(0);
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        item.phase = DragPhase::Dragging;
        item.initial_index = initial_index;
        if input.kind == PointerKind::Touch {
            item.last_touch_time = Some(input.timestamp);
        }
        self.emit(ItemEvent::Started { item: key });
        debug!(?key, "drag started");

        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        let Some(container) = item.container else {
            return;
        };
        let root = item.root.clone();
        item.next_sibling = self.host.next_sibling(&root);
        let root_rect = self.host.client_rect(&root);
        let preview =
            self.host
                .create_artifact(&root, item.preview_template.as_ref(), DragArtifact::Preview);
        self.host.set_size(&preview, root_rect.size());
        self.host
            .set_transform(&preview, &translate3d(root_rect.origin().to_vec2()));
        let placeholder = self.host.create_artifact(
            &root,
            item.placeholder_template.as_ref(),
            DragArtifact::Placeholder,
        );
        item.preview = Some(preview.clone());
        item.placeholder = Some(placeholder.clone());

        self.host.set_visible(&root, false);
        if let Some(parent) = self.host.parent(&root) {
            self.host.insert_before(&parent, &placeholder, Some(&root));
        }
        self.host.append_to_body(&root);
        self.host.append_to_body(&preview);
        self.container_start(container);
    }

    /// Apply axis locks and the boundary to a raw pointer position.
    pub(crate) fn constrained_pointer_position(&self, key: ItemKey, point: Point) -> Point {
        let Some(item) = self.items.get(key) else {
            return point;
        };
        let container_lock = item
            .container
            .and_then(|c| self.containers.get(c))
            .and_then(|c| c.lock_axis);
        let mut point = point;
        match item.lock_axis.or(container_lock) {
            Some(LockAxis::X) => point.y = item.pickup_on_page.y,
            Some(LockAxis::Y) => point.x = item.pickup_on_page.x,
            None => {}
        }
        if let Some(boundary) = item.boundary_rect {
            point = clamp_to_boundary(point, item.pickup_in_element, item.drag_size, boundary);
        }
        point
    }

    /// Re-run the active-container update from the last known pointer
    /// position, after geometry changed underneath a still pointer.
    pub(crate) fn sort_from_last_pointer(&mut self, key: ItemKey) {
        let Some(item) = self.items.get(key) else {
            return;
        };
        if item.phase != DragPhase::Dragging || item.container.is_none() {
            return;
        }
        let raw = item.last_pointer;
        let point = self.constrained_pointer_position(key, raw);
        self.update_active_container(key, point, raw);
    }

    /// `point` is the constrained pointer position; `raw` is where the
    /// pointer really is, which drives auto-scrolling.
    fn update_active_container(&mut self, key: ItemKey, point: Point, raw: Point) {
        let Some(item) = self.items.get(key) else {
            return;
        };
        let (Some(initial), Some(current)) = (item.initial_container, item.container) else {
            return;
        };
        let mut target = self.sibling_container_from_position(initial, key, point);
        if target.is_none() && current != initial && self.can_return_item(initial, point) {
            target = Some(initial);
        }
        if let Some(target) = target
            && target != current
        {
            self.emit(ItemEvent::Exited {
                item: key,
                container: current,
            });
            self.container_exit(current, key);
            if let Some(item) = self.items.get_mut(key) {
                item.container = Some(target);
            }
            self.container_enter(target, key, point);
            let current_index = self.get_item_index(target, key).unwrap_or(0);
            self.emit(ItemEvent::Entered {
                item: key,
                container: target,
                current_index,
            });
            debug!(?key, from = ?current, to = ?target, "transferred");
        }

        let Some(item) = self.items.get(key) else {
            return;
        };
        let Some(current) = item.container else {
            return;
        };
        let delta = item.direction.delta();
        self.start_scrolling_if_necessary(current, raw);
        self.container_sort_item(current, key, point, delta);
        if let Some(item) = self.items.get(key)
            && let Some(preview) = item.preview.as_ref()
        {
            self.host
                .set_transform(preview, &translate3d(point - item.pickup_in_element.to_point()));
        }
    }

    /// Adjust a standalone drag for a viewport scroll so the element stays
    /// under the pointer.
    pub(crate) fn compensate_viewport_scroll(&mut self, key: ItemKey) {
        let offset = self.host.scroll_metrics(&ScrollTarget::Viewport).offset;
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        let difference = item.viewport_scroll - offset;
        if difference == Vec2::ZERO {
            return;
        }
        item.viewport_scroll = offset;
        item.pickup_on_page += difference;
        if let Some(boundary) = item.boundary_rect.as_mut() {
            *boundary = *boundary + difference;
        }
        if item.phase == DragPhase::Dragging && item.container.is_none() {
            item.active_transform -= difference;
            self.host
                .set_transform(&item.root, &translate3d(item.active_transform));
        }
    }

    pub(crate) fn end_drag_sequence(&mut self, key: ItemKey, input: &PointerInput<H::Element>) {
        if !self.hub.is_dragging(key) {
            return;
        }
        self.hub.stop_dragging(&mut self.host, key);
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        if input.kind == PointerKind::Touch {
            item.last_touch_time = Some(input.timestamp);
        }
        if item.phase != DragPhase::Dragging {
            // Released before the threshold: nothing started, nothing to report.
            item.phase = DragPhase::Idle;
            return;
        }
        let pointer = input.position;
        self.emit(ItemEvent::Released { item: key });

        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        let Some(container) = item.container else {
            item.passive_transform = item.active_transform;
            item.phase = DragPhase::Idle;
            let distance = pointer - item.pickup_on_page;
            self.emit(ItemEvent::Ended {
                item: key,
                distance,
            });
            debug!(?key, "free drag ended");
            return;
        };
        self.stop_scrolling(container);

        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        let (Some(preview), Some(placeholder)) = (item.preview.clone(), item.placeholder.clone())
        else {
            self.finish_drop(key, pointer);
            return;
        };
        if !item.has_moved {
            self.finish_drop(key, pointer);
            return;
        }
        let target = self.host.client_rect(&placeholder);
        self.host.set_animating(&preview, true);
        self.host
            .set_transform(&preview, &translate3d(target.origin().to_vec2()));
        let duration = self.host.transition_duration_ms(&preview);
        if duration <= 0.0 {
            self.finish_drop(key, pointer);
            return;
        }
        item.phase = DragPhase::Settling;
        item.settle = Some(Settle {
            deadline: input.timestamp + duration * self.config.settle_timeout_factor,
            pointer,
        });
        self.host.watch_transition_end(&preview, true);
        debug!(?key, duration, "settling");
    }

    /// Finish a drop animation. Runs at most once per drag: whichever of
    /// `transitionend` and the timeout comes first consumes the settle state.
    pub(crate) fn resolve_settle(&mut self, key: ItemKey) {
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        let Some(settle) = item.settle.take() else {
            return;
        };
        if let Some(preview) = item.preview.as_ref() {
            self.host.watch_transition_end(preview, false);
        }
        self.finish_drop(key, settle.pointer);
    }

    /// Put the real element back, drop the artifacts and report the drop.
    fn finish_drop(&mut self, key: ItemKey, pointer: Point) {
        self.cleanup_artifacts(key);
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        item.phase = DragPhase::Idle;
        let (Some(container), Some(initial)) = (item.container, item.initial_container) else {
            return;
        };
        let distance = pointer - item.pickup_on_page;
        let previous_index = item.initial_index;
        let current_index = self.get_item_index(container, key).unwrap_or(0);
        let is_pointer_over_container = self.can_return_item(container, pointer);
        let outcome = DropOutcome {
            item: key,
            container,
            previous_container: initial,
            previous_index,
            current_index,
            is_pointer_over_container,
            distance,
        };
        self.emit(ItemEvent::Ended {
            item: key,
            distance,
        });
        self.emit(ItemEvent::Dropped(outcome));
        self.container_drop(container, outcome);
        if let Some(item) = self.items.get_mut(key) {
            item.container = Some(initial);
        }
        debug!(?key, ?container, current_index, "dropped");
    }

    fn cleanup_artifacts(&mut self, key: ItemKey) {
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        let root = item.root.clone();
        let fallback_parent = item
            .initial_container
            .and_then(|c| self.containers.get(c))
            .map(|c| c.element.clone());
        if let Some(placeholder) = item.placeholder.take() {
            self.host.set_visible(&root, true);
            let sibling_parent = item
                .next_sibling
                .as_ref()
                .and_then(|s| self.host.parent(s).map(|p| (p, s.clone())));
            match sibling_parent {
                Some((parent, sibling)) => self.host.insert_before(&parent, &root, Some(&sibling)),
                None => {
                    if let Some(parent) = fallback_parent {
                        self.host.insert_before(&parent, &root, None);
                    }
                }
            }
            self.host.remove(&placeholder);
        }
        if let Some(preview) = item.preview.take() {
            self.host.remove(&preview);
        }
        item.next_sibling = None;
    }

    /// Stop any drag involving `key` without notifications.
    pub(crate) fn abort_drag(&mut self, key: ItemKey) {
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        if item.phase == DragPhase::Idle {
            self.hub.stop_dragging(&mut self.host, key);
            return;
        }
        if item.settle.take().is_some()
            && let Some(preview) = item.preview.as_ref()
        {
            self.host.watch_transition_end(preview, false);
        }
        let current = item.container;
        let initial = item.initial_container;
        self.hub.stop_dragging(&mut self.host, key);
        if let Some(current) = current {
            self.container_reset(current);
        }
        self.cleanup_artifacts(key);
        if let Some(item) = self.items.get_mut(key) {
            item.phase = DragPhase::Idle;
            item.container = initial;
        }
        debug!(?key, "drag aborted");
    }
}
