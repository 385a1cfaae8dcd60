// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning context: lifecycle of items, containers and groups, and the
//! entry points for host input.

use alloc::format;
use alloc::vec::Vec;

use kurbo::Vec2;
use tracing::{debug, trace, warn};

use crate::arena::{Arena, ContainerKey, GroupKey, ItemKey};
use crate::config::{ContainerConfig, DragDropConfig, ItemConfig};
use crate::container::DropContainer;
use crate::error::DragDropError;
use crate::event::DragDropEvent;
use crate::group::ContainerGroup;
use crate::host::{DragDropHost, InputResponse, PointerInput, ScrollTarget};
use crate::hub::PointerEventHub;
use crate::item::{DragItem, DragPhase};

/// Owns every item, container and group of one page, plus the host.
///
/// All state lives here; items and containers only hold keys to each other.
/// Every entry point is synchronous and runs to completion, queuing events
/// that the integrator collects with [`drain_events`](Self::drain_events).
#[derive(Debug)]
pub struct DragDrop<H: DragDropHost> {
    pub(crate) host: H,
    pub(crate) config: DragDropConfig,
    pub(crate) hub: PointerEventHub,
    pub(crate) items: Arena<ItemKey, DragItem<H::Element>>,
    pub(crate) containers: Arena<ContainerKey, DropContainer<H::Element>>,
    pub(crate) groups: Arena<GroupKey, ContainerGroup>,
    pub(crate) events: Vec<DragDropEvent>,
    next_container_id: u32,
}

impl<H: DragDropHost> DragDrop<H> {
    /// Create an empty context driving `host`.
    pub fn new(host: H, config: DragDropConfig) -> Self {
        Self {
            host,
            config,
            hub: PointerEventHub::default(),
            items: Arena::default(),
            containers: Arena::default(),
            groups: Arena::default(),
            events: Vec::new(),
            next_container_id: 0,
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Engine-wide configuration.
    pub fn config(&self) -> &DragDropConfig {
        &self.config
    }

    /// The pointer event hub.
    pub fn hub(&self) -> &PointerEventHub {
        &self.hub
    }

    /// Look up an item.
    pub fn item(&self, key: ItemKey) -> Option<&DragItem<H::Element>> {
        self.items.get(key)
    }

    /// Look up an item for reconfiguration.
    pub fn item_mut(&mut self, key: ItemKey) -> Option<&mut DragItem<H::Element>> {
        self.items.get_mut(key)
    }

    /// Look up a container.
    pub fn container(&self, key: ContainerKey) -> Option<&DropContainer<H::Element>> {
        self.containers.get(key)
    }

    /// Look up a container for reconfiguration.
    pub fn container_mut(&mut self, key: ContainerKey) -> Option<&mut DropContainer<H::Element>> {
        self.containers.get_mut(key)
    }

    /// Look up a container by its id.
    pub fn container_by_id(&self, id: &str) -> Option<ContainerKey> {
        self.hub.container(id)
    }

    /// Look up a group.
    pub fn group(&self, key: GroupKey) -> Option<&ContainerGroup> {
        self.groups.get(key)
    }

    /// Look up a group for reconfiguration.
    pub fn group_mut(&mut self, key: GroupKey) -> Option<&mut ContainerGroup> {
        self.groups.get_mut(key)
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<DragDropEvent> {
        core::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: impl Into<DragDropEvent>) {
        let event = event.into();
        trace!(?event, "queued");
        self.events.push(event);
    }

    /// Make `root` draggable.
    pub fn create_item(&mut self, root: H::Element, config: ItemConfig<H::Element>) -> ItemKey {
        let key = self.items.next_key();
        self.items.insert(DragItem::new(key, root, config));
        self.hub.register_item(&mut self.host, key);
        debug!(?key, "created drag item");
        key
    }

    /// Destroy an item.
    ///
    /// A drag in progress is stopped without events and any preview or
    /// placeholder is removed from the tree. Unknown keys are ignored.
    pub fn dispose_item(&mut self, key: ItemKey) {
        if !self.items.contains(key) {
            return;
        }
        self.abort_drag(key);
        for container in self.containers.keys() {
            if let Some(c) = self.containers.get_mut(container) {
                c.items.retain(|k| *k != key);
                c.active_items.retain(|k| *k != key);
                c.positions.retain(|p| p.item != key);
            }
        }
        self.hub.remove_item(&mut self.host, key);
        self.items.remove(key);
        debug!(?key, "disposed drag item");
    }

    /// Make `element` a drop container.
    ///
    /// Fails without touching the tree if the id is already taken. Containers
    /// without an id get a generated `drop-list-{n}` one.
    pub fn create_container(
        &mut self,
        element: H::Element,
        config: ContainerConfig<H::Element>,
    ) -> Result<ContainerKey, DragDropError> {
        if let Some(group) = config.group
            && !self.groups.contains(group)
        {
            return Err(DragDropError::UnknownGroup(group));
        }
        let id = match config.id.clone() {
            Some(id) => id,
            None => loop {
                let candidate = format!("drop-list-{}", self.next_container_id);
                self.next_container_id += 1;
                if self.hub.container(&candidate).is_none() {
                    break candidate;
                }
            },
        };
        let key = self.containers.next_key();
        self.hub.register_container(key, &id)?;
        let group = config.group;
        self.containers
            .insert(DropContainer::new(key, id, element, config));
        if let Some(group) = group.and_then(|g| self.groups.get_mut(g)) {
            group.join(key);
        }
        debug!(?key, "created drop container");
        Ok(key)
    }

    /// Destroy a container.
    ///
    /// Drags running through it are stopped and its items become standalone.
    /// Idempotent.
    pub fn dispose_container(&mut self, key: ContainerKey) {
        let Some(container) = self.containers.get(key) else {
            return;
        };
        let group = container.group;
        let declared = container.items.clone();
        for item in self.items.keys() {
            let involved = self
                .items
                .get(item)
                .is_some_and(|i| i.phase != DragPhase::Idle && (i.container == Some(key) || i.initial_container == Some(key)));
            if involved {
                self.abort_drag(item);
            }
        }
        self.container_reset(key);
        for other in self.containers.keys() {
            if let Some(c) = self.containers.get_mut(other) {
                c.receiving_from.retain(|k| *k != key);
            }
        }
        for item in declared {
            if let Some(i) = self.items.get_mut(item)
                && i.container == Some(key)
            {
                i.container = None;
                i.initial_container = None;
            }
        }
        if let Some(group) = group.and_then(|g| self.groups.get_mut(g)) {
            group.leave(key);
        }
        self.hub.remove_container(key);
        self.containers.remove(key);
        debug!(?key, "disposed drop container");
    }

    /// Replace a container's item list.
    ///
    /// Items dropped from the list become standalone. Fails if an item is
    /// listed by another container; remove it from that list first.
    pub fn set_container_items(
        &mut self,
        container: ContainerKey,
        items: &[ItemKey],
    ) -> Result<(), DragDropError> {
        let Some(c) = self.containers.get(container) else {
            return Err(DragDropError::UnknownContainer(container));
        };
        let previous = c.items.clone();
        for &item in items {
            let Some(i) = self.items.get(item) else {
                return Err(DragDropError::UnknownItem(item));
            };
            if let Some(other) = i.container
                && other != container
                && self
                    .containers
                    .get(other)
                    .is_some_and(|o| o.items.contains(&item))
            {
                warn!(?item, ?other, "item is already listed by another container");
                return Err(DragDropError::ItemAlreadyAttached {
                    item,
                    container: other,
                });
            }
        }
        for item in previous {
            if items.contains(&item) {
                continue;
            }
            if let Some(i) = self.items.get_mut(item)
                && i.phase == DragPhase::Idle
                && i.container == Some(container)
            {
                i.container = None;
                i.initial_container = None;
            }
        }
        for &item in items {
            if let Some(i) = self.items.get_mut(item)
                && i.phase == DragPhase::Idle
            {
                i.container = Some(container);
                i.initial_container = Some(container);
            }
        }
        if let Some(c) = self.containers.get_mut(container) {
            c.items = items.to_vec();
        }
        Ok(())
    }

    /// Create an empty group.
    pub fn create_group(&mut self) -> GroupKey {
        let key = self.groups.next_key();
        self.groups.insert(ContainerGroup {
            key: Some(key),
            ..ContainerGroup::default()
        })
    }

    /// Destroy a group; its members keep their own connections. Idempotent.
    pub fn dispose_group(&mut self, key: GroupKey) {
        let Some(group) = self.groups.remove(key) else {
            return;
        };
        for member in group.members {
            if let Some(c) = self.containers.get_mut(member) {
                c.group = None;
            }
        }
    }

    /// Move a container into `group`, or out of any group.
    pub fn set_container_group(
        &mut self,
        container: ContainerKey,
        group: Option<GroupKey>,
    ) -> Result<(), DragDropError> {
        if let Some(group) = group
            && !self.groups.contains(group)
        {
            return Err(DragDropError::UnknownGroup(group));
        }
        let Some(c) = self.containers.get_mut(container) else {
            return Err(DragDropError::UnknownContainer(container));
        };
        let previous = core::mem::replace(&mut c.group, group);
        if let Some(previous) = previous.and_then(|g| self.groups.get_mut(g)) {
            previous.leave(container);
        }
        if let Some(group) = group.and_then(|g| self.groups.get_mut(g)) {
            group.join(container);
        }
        Ok(())
    }

    /// Forward a move received by a global listener to every active item.
    pub fn pointer_move(&mut self, input: &PointerInput<H::Element>) -> InputResponse {
        let mut response = InputResponse::default();
        for item in self.hub.active_items().to_vec() {
            if self.item_pointer_move(item, input) {
                response.prevent_default = true;
            }
        }
        response
    }

    /// Forward a release received by a global listener to every active item.
    pub fn pointer_up(&mut self, input: &PointerInput<H::Element>) {
        for item in self.hub.active_items().to_vec() {
            self.end_drag_sequence(item, input);
        }
    }

    /// Whether guarded `wheel`, `selectstart` and `touchmove` events should be
    /// default-prevented right now.
    pub fn should_prevent_default(&self) -> bool {
        self.hub.should_prevent_default()
    }

    /// Report a scroll received by the capturing scroll listener.
    pub fn scrolled(&mut self, target: &ScrollTarget<H::Element>) {
        let mut resort = Vec::new();
        for container in self.containers.keys() {
            let Some(c) = self.containers.get(container) else {
                continue;
            };
            if c.is_dragging {
                if self.container_handle_scroll(container, target).is_some()
                    && let Some(c) = self.containers.get(container)
                {
                    resort.extend(
                        c.positions
                            .iter()
                            .map(|p| p.item)
                            .filter(|item| self.hub.is_dragging(*item)),
                    );
                }
            } else if c.is_receiving() {
                self.cache_parent_positions(container);
            }
        }
        for item in resort {
            self.sort_from_last_pointer(item);
        }
        if *target == ScrollTarget::Viewport {
            for item in self.hub.active_items().to_vec() {
                self.compensate_viewport_scroll(item);
            }
        }
    }

    /// Report a `transitionend` for `element`.
    ///
    /// Only `transform` transitions on a settling preview are considered.
    pub fn transition_ended(&mut self, element: &H::Element, property: &str) {
        if property != "transform" {
            return;
        }
        let settled = self.items.keys().into_iter().find(|k| {
            self.items.get(*k).is_some_and(|i| {
                i.phase == DragPhase::Settling && i.preview.as_ref() == Some(element)
            })
        });
        if let Some(item) = settled {
            self.resolve_settle(item);
        }
    }

    /// Advance per-frame work: auto-scroll ticks and drop animation timeouts.
    ///
    /// `now` is in milliseconds on the clock used for
    /// [`PointerInput::timestamp`].
    pub fn on_animation_frame(&mut self, now: f64) {
        let step = self.config.auto_scroll_step;
        for c in self.containers.values() {
            if c.scroller.is_running() {
                c.scroller.tick(&mut self.host, step);
            }
        }
        for item in self.items.keys() {
            let expired = self.items.get(item).is_some_and(|i| {
                i.phase == DragPhase::Settling && i.settle.is_some_and(|s| now >= s.deadline)
            });
            if expired {
                debug!(?item, "drop animation timed out");
                self.resolve_settle(item);
            }
        }
    }

    /// Returns `true` while [`on_animation_frame`](Self::on_animation_frame)
    /// has work to do.
    pub fn needs_animation_frame(&self) -> bool {
        self.containers.values().any(|c| c.scroller.is_running())
            || self.items.values().any(|i| i.phase == DragPhase::Settling)
    }

    /// The translation applied to a standalone item.
    pub fn free_drag_position(&self, item: ItemKey) -> Option<Vec2> {
        self.items.get(item).map(|i| i.passive_transform)
    }

    /// Move a standalone item to `position` (relative to where it is laid out).
    pub fn set_free_drag_position(&mut self, item: ItemKey, position: Vec2) {
        let Some(i) = self.items.get_mut(item) else {
            return;
        };
        i.passive_transform = position;
        if i.phase == DragPhase::Idle && i.container.is_none() {
            i.active_transform = position;
            self.host
                .set_transform(&i.root, &crate::transform::translate3d(position));
        }
    }

    /// Clear a standalone item's accumulated translation.
    pub fn reset_item(&mut self, item: ItemKey) {
        let Some(i) = self.items.get_mut(item) else {
            return;
        };
        i.passive_transform = Vec2::ZERO;
        i.active_transform = Vec2::ZERO;
        self.host.set_transform(&i.root, "");
    }

    /// Tear everything down: stop every drag, forget every item, container
    /// and group, and unbind every listener.
    pub fn dispose(&mut self) {
        for item in self.items.keys() {
            self.abort_drag(item);
        }
        for container in self.containers.keys() {
            self.container_reset(container);
        }
        self.hub.clear(&mut self.host);
        self.items.clear();
        self.containers.clear();
        self.groups.clear();
        self.events.clear();
    }
}
