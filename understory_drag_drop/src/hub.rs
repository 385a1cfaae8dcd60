// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer event hub: the single owner of document-level listeners.
//!
//! The hub tracks every live item and container and the set of items that are
//! currently between pointer-down and pointer-up ("active"). Global listeners
//! are bound if and only if the active set is non-empty; moves and releases
//! received through them are fanned out to every active item by
//! [`DragDrop`](crate::DragDrop).
//!
//! Exactly one item is active in a natural drag sequence, but the hub does not
//! enforce that. Keeping to a single active item is the caller's job.
//!
//! ## Minimal example
//!
//! The hub is normally driven by [`DragDrop`](crate::DragDrop); it can be
//! queried through [`DragDrop::hub`](crate::DragDrop::hub).
//!
//! ```
//! use understory_drag_drop::PointerEventHub;
//!
//! let hub = PointerEventHub::default();
//! assert!(!hub.should_prevent_default());
//! assert!(hub.active_items().is_empty());
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::arena::{ContainerKey, ItemKey};
use crate::error::DragDropError;
use crate::host::{DragDropHost, GlobalListener, ListenerOptions, PointerKind};

/// Registry of items and containers plus reference-counted listener binding.
#[derive(Debug, Default)]
pub struct PointerEventHub {
    items: HashSet<ItemKey>,
    containers: Vec<(ContainerKey, String)>,
    active: Vec<ItemKey>,
    listeners: BTreeMap<GlobalListener, ListenerOptions>,
    guard_bound: bool,
}

impl PointerEventHub {
    /// Track `item`. The first tracked item binds the persistent touch-move guard.
    pub fn register_item<H: DragDropHost>(&mut self, host: &mut H, item: ItemKey) {
        if self.items.insert(item) && !self.guard_bound {
            host.bind_listener(
                GlobalListener::TouchMoveGuard,
                ListenerOptions::ACTIVE_CAPTURING,
            );
            self.guard_bound = true;
        }
    }

    /// Stop tracking `item`, ending its drag if active. Removing the last
    /// item unbinds the touch-move guard.
    pub fn remove_item<H: DragDropHost>(&mut self, host: &mut H, item: ItemKey) {
        self.items.remove(&item);
        self.stop_dragging(host, item);
        if self.items.is_empty() && self.guard_bound {
            host.unbind_listener(GlobalListener::TouchMoveGuard);
            self.guard_bound = false;
        }
    }

    /// Returns `true` if `item` is tracked.
    pub fn has_item(&self, item: ItemKey) -> bool {
        self.items.contains(&item)
    }

    /// Track a container under `id`.
    ///
    /// Fails if a different container already uses `id`. Registering the same
    /// container twice is a no-op.
    pub fn register_container(&mut self, key: ContainerKey, id: &str) -> Result<(), DragDropError> {
        if self.containers.iter().any(|(k, _)| *k == key) {
            return Ok(());
        }
        if self.container(id).is_some() {
            warn!(id, "duplicate drop container id");
            return Err(DragDropError::DuplicateContainerId { id: id.into() });
        }
        self.containers.push((key, id.into()));
        Ok(())
    }

    /// Stop tracking a container. Idempotent.
    pub fn remove_container(&mut self, key: ContainerKey) {
        self.containers.retain(|(k, _)| *k != key);
    }

    /// Look up a tracked container by id.
    pub fn container(&self, id: &str) -> Option<ContainerKey> {
        self.containers
            .iter()
            .find(|(_, registered)| registered == id)
            .map(|(key, _)| *key)
    }

    /// Mark `item` as active.
    ///
    /// The first active item disables native drag/selection on the body and
    /// binds the move/up pair for `kind`, the capturing scroll listener, the
    /// `selectstart` suppressor and, for mouse sequences, the `wheel`
    /// suppressor. All are non-passive so `preventDefault` is honored.
    /// Calling this for an item that is already active is a no-op.
    pub fn start_dragging<H: DragDropHost>(&mut self, host: &mut H, item: ItemKey, kind: PointerKind) {
        if self.active.contains(&item) {
            return;
        }
        self.active.push(item);
        if self.active.len() != 1 {
            return;
        }
        host.set_native_interactions(false);
        let active = ListenerOptions::ACTIVE_CAPTURING;
        match kind {
            PointerKind::Touch => {
                self.listeners.insert(GlobalListener::TouchMove, active);
                self.listeners.insert(GlobalListener::TouchEnd, active);
                self.listeners.insert(GlobalListener::TouchCancel, active);
            }
            PointerKind::Mouse => {
                self.listeners.insert(GlobalListener::MouseMove, active);
                self.listeners.insert(GlobalListener::MouseUp, active);
                self.listeners.insert(GlobalListener::Wheel, active);
            }
        }
        self.listeners.insert(GlobalListener::Scroll, active);
        self.listeners.insert(GlobalListener::SelectStart, active);
        for (listener, options) in &self.listeners {
            host.bind_listener(*listener, *options);
        }
        debug!(?item, ?kind, listeners = self.listeners.len(), "bound global drag listeners");
    }

    /// Mark `item` as inactive. The last inactive item unbinds every global
    /// drag listener and restores native interactions. No-op for inactive items.
    pub fn stop_dragging<H: DragDropHost>(&mut self, host: &mut H, item: ItemKey) {
        let Some(position) = self.active.iter().position(|k| *k == item) else {
            return;
        };
        self.active.remove(position);
        if self.active.is_empty() {
            self.clear_listeners(host);
        }
    }

    /// Returns `true` while `item` is between pointer-down and pointer-up.
    pub fn is_dragging(&self, item: ItemKey) -> bool {
        self.active.contains(&item)
    }

    /// Active items in activation order.
    pub fn active_items(&self) -> &[ItemKey] {
        &self.active
    }

    /// Whether a `wheel`, `selectstart` or guarded `touchmove` event should
    /// be default-prevented right now.
    pub fn should_prevent_default(&self) -> bool {
        !self.active.is_empty()
    }

    /// Returns `true` if `listener` is currently bound.
    pub fn is_bound(&self, listener: GlobalListener) -> bool {
        match listener {
            GlobalListener::TouchMoveGuard => self.guard_bound,
            other => self.listeners.contains_key(&other),
        }
    }

    fn clear_listeners<H: DragDropHost>(&mut self, host: &mut H) {
        if self.listeners.is_empty() {
            return;
        }
        for listener in core::mem::take(&mut self.listeners).into_keys() {
            host.unbind_listener(listener);
        }
        host.set_native_interactions(true);
        debug!("unbound global drag listeners");
    }

    /// Forget every item and container and unbind everything.
    pub(crate) fn clear<H: DragDropHost>(&mut self, host: &mut H) {
        self.active.clear();
        self.clear_listeners(host);
        self.items.clear();
        self.containers.clear();
        if self.guard_bound {
            host.unbind_listener(GlobalListener::TouchMoveGuard);
            self.guard_bound = false;
        }
    }
}
