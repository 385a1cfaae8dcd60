// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container groups: every member is connected to every other member.

use alloc::vec::Vec;

use crate::arena::{ContainerKey, GroupKey};

/// A set of mutually connected containers.
///
/// Membership is managed through
/// [`DragDrop::set_container_group`](crate::DragDrop::set_container_group) or
/// [`ContainerConfig::in_group`](crate::ContainerConfig::in_group). Disabling a
/// group disables pointer-down on the items of all of its members.
#[derive(Clone, Debug, Default)]
pub struct ContainerGroup {
    pub(crate) key: Option<GroupKey>,
    pub(crate) members: Vec<ContainerKey>,
    pub(crate) disabled: bool,
}

impl ContainerGroup {
    /// The group's handle.
    pub fn key(&self) -> Option<GroupKey> {
        self.key
    }

    /// Member containers in join order.
    pub fn members(&self) -> &[ContainerKey] {
        &self.members
    }

    /// Returns `true` if the group is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable every member.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub(crate) fn join(&mut self, container: ContainerKey) {
        if !self.members.contains(&container) {
            self.members.push(container);
        }
    }

    pub(crate) fn leave(&mut self, container: ContainerKey) {
        self.members.retain(|k| *k != container);
    }
}
