// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_drop_web --heading-base-level=0

//! Browser binding for the Understory drag drop engine.
//!
//! This crate provides a `DragDropHost` implementation over real DOM nodes and a
//! small driver that owns the engine and wires it to the page when targeting
//! `wasm32`:
//!
//! - `mousedown`/`touchstart` listeners on every item root.
//! - The document-level listeners the engine asks for while a drag is active.
//! - `transitionend` listeners on settling previews.
//! - A `requestAnimationFrame` loop that only runs while the engine has
//!   per-frame work (auto-scroll or a pending drop animation).
//!
//! # Usage
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn wire(
//!     list: web_sys::Element,
//!     rows: &[web_sys::Element],
//! ) -> Result<understory_drag_drop_web::WebDragDrop, wasm_bindgen::JsValue> {
//!     use understory_drag_drop::{
//!         ContainerConfig, ContainerEvent, DragDropConfig, DragDropEvent, ItemConfig,
//!     };
//!
//!     let dd = understory_drag_drop_web::WebDragDrop::new(DragDropConfig::default())?;
//!     let items: Vec<_> = rows
//!         .iter()
//!         .map(|row| dd.create_item(row.clone(), ItemConfig::default()))
//!         .collect();
//!     dd.with_engine(|engine| {
//!         let container = engine.create_container(list, ContainerConfig::default())?;
//!         engine.set_container_items(container, &items)
//!     })
//!     .map_err(|err| wasm_bindgen::JsValue::from_str(&err.to_string()))?;
//!     dd.set_event_handler(|_, event| {
//!         if let DragDropEvent::Container(ContainerEvent::Dropped(outcome)) = event {
//!             // Reorder the application's rows here.
//!             let _ = outcome;
//!         }
//!     });
//!     Ok(dd)
//! }
//! ```
//!
//! Notes:
//! - Items must be created through `WebDragDrop::create_item` so their
//!   press listeners are installed; everything else goes through
//!   `WebDragDrop::with_engine`.
//! - The host tracks element siblings, so text nodes between items are not
//!   considered when restoring an item's position after a drop.
//! - Previews are styled `position: fixed` with `pointer-events: none` and
//!   receive the [`PREVIEW_CLASS`] class; placeholders receive
//!   [`PLACEHOLDER_CLASS`] and animating elements [`ANIMATING_CLASS`].

#![no_std]

extern crate alloc;

use understory_drag_drop::GlobalListener;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebDragDrop, WebHost};

/// Class added to every drag preview.
pub const PREVIEW_CLASS: &str = "understory-drag-preview";

/// Class added to every placeholder.
pub const PLACEHOLDER_CLASS: &str = "understory-drag-placeholder";

/// Class present on an element while its transform transitions.
pub const ANIMATING_CLASS: &str = "understory-drag-animating";

/// How the driver handles a document-level listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListenerRoute {
    /// Forwarded to `DragDrop::pointer_move`.
    Move,
    /// Forwarded to `DragDrop::pointer_up`.
    Release,
    /// Forwarded to `DragDrop::scrolled`.
    Scroll,
    /// Default-prevented while `DragDrop::should_prevent_default` holds.
    Guard,
}

/// The DOM event type a [`GlobalListener`] listens for.
pub fn event_type(listener: GlobalListener) -> &'static str {
    match listener {
        GlobalListener::MouseMove => "mousemove",
        GlobalListener::MouseUp => "mouseup",
        GlobalListener::TouchMove | GlobalListener::TouchMoveGuard => "touchmove",
        GlobalListener::TouchEnd => "touchend",
        GlobalListener::TouchCancel => "touchcancel",
        GlobalListener::Scroll => "scroll",
        GlobalListener::SelectStart => "selectstart",
        GlobalListener::Wheel => "wheel",
    }
}

/// Where events from a [`GlobalListener`] go.
pub fn listener_route(listener: GlobalListener) -> ListenerRoute {
    match listener {
        GlobalListener::MouseMove | GlobalListener::TouchMove => ListenerRoute::Move,
        GlobalListener::MouseUp | GlobalListener::TouchEnd | GlobalListener::TouchCancel => {
            ListenerRoute::Release
        }
        GlobalListener::Scroll => ListenerRoute::Scroll,
        GlobalListener::SelectStart | GlobalListener::Wheel | GlobalListener::TouchMoveGuard => {
            ListenerRoute::Guard
        }
    }
}
