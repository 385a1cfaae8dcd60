// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Only setup operations fail. Per-event entry points (pointer, scroll,
//! animation frame) treat every rejected decision as a silent no-op.

use alloc::string::String;
use core::fmt;

use crate::arena::{ContainerKey, GroupKey, ItemKey};

/// Error returned by configuration operations on [`DragDrop`](crate::DragDrop).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragDropError {
    /// A container with this id is already registered.
    DuplicateContainerId {
        /// The conflicting id.
        id: String,
    },
    /// The item is already in another container's item list.
    ItemAlreadyAttached {
        /// The item.
        item: ItemKey,
        /// The container that currently lists it.
        container: ContainerKey,
    },
    /// The item handle is stale or belongs to another context.
    UnknownItem(ItemKey),
    /// The container handle is stale or belongs to another context.
    UnknownContainer(ContainerKey),
    /// The group handle is stale or belongs to another context.
    UnknownGroup(GroupKey),
}

impl fmt::Display for DragDropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateContainerId { id } => {
                write!(f, "drop container with id {id:?} has already been registered")
            }
            Self::ItemAlreadyAttached { item, container } => {
                write!(f, "{item:?} is already attached to {container:?}")
            }
            Self::UnknownItem(key) => write!(f, "unknown drag item {key:?}"),
            Self::UnknownContainer(key) => write!(f, "unknown drop container {key:?}"),
            Self::UnknownGroup(key) => write!(f, "unknown container group {key:?}"),
        }
    }
}

impl core::error::Error for DragDropError {}
