// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host surface the engine drives: element geometry, tree edits, styles,
//! global listeners, and scrolling.
//!
//! The engine never touches a DOM directly. Everything it needs from the page
//! is expressed through [`DragDropHost`], which a browser binding implements
//! over real nodes and tests implement over an in-memory tree.

use kurbo::{Point, Rect, Size, Vec2};

/// Kind of pointer that produced an input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse (or pen reported through mouse events).
    Mouse,
    /// Touch.
    Touch,
}

/// A pointer event, already reduced to what the engine needs.
///
/// `position` is in viewport (client) coordinates. `timestamp` is in
/// milliseconds on the same clock as [`DragDrop::on_animation_frame`].
///
/// [`DragDrop::on_animation_frame`]: crate::DragDrop::on_animation_frame
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput<E> {
    /// Mouse or touch.
    pub kind: PointerKind,
    /// Pointer position in client coordinates.
    pub position: Point,
    /// Mouse button; `0` is the primary button. Ignored for touch.
    pub button: i16,
    /// The element the event was dispatched to, if any.
    pub target: Option<E>,
    /// Event time in milliseconds.
    pub timestamp: f64,
}

impl<E> PointerInput<E> {
    /// A primary-button mouse input with no target.
    pub fn mouse(position: Point, timestamp: f64) -> Self {
        Self {
            kind: PointerKind::Mouse,
            position,
            button: 0,
            target: None,
            timestamp,
        }
    }

    /// A touch input with no target.
    pub fn touch(position: Point, timestamp: f64) -> Self {
        Self {
            kind: PointerKind::Touch,
            position,
            button: 0,
            target: None,
            timestamp,
        }
    }

    /// Sets the event target.
    #[must_use]
    pub fn with_target(mut self, target: E) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the mouse button.
    #[must_use]
    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }
}

/// What the host should do with the native event after the engine handled it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputResponse {
    /// Call `stopPropagation` on the native event.
    pub stop_propagation: bool,
    /// Call `preventDefault` on the native event.
    pub prevent_default: bool,
}

/// Document-level listeners the hub asks the host to bind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalListener {
    /// `mousemove`, forwarded to [`DragDrop::pointer_move`](crate::DragDrop::pointer_move).
    MouseMove,
    /// `mouseup`, forwarded to [`DragDrop::pointer_up`](crate::DragDrop::pointer_up).
    MouseUp,
    /// `touchmove` while dragging, forwarded to [`DragDrop::pointer_move`](crate::DragDrop::pointer_move).
    TouchMove,
    /// `touchend`, forwarded to [`DragDrop::pointer_up`](crate::DragDrop::pointer_up).
    TouchEnd,
    /// `touchcancel`, forwarded to [`DragDrop::pointer_up`](crate::DragDrop::pointer_up).
    TouchCancel,
    /// Capturing `scroll`, forwarded to [`DragDrop::scrolled`](crate::DragDrop::scrolled).
    Scroll,
    /// `selectstart`, default-prevented while dragging.
    SelectStart,
    /// `wheel`, default-prevented while dragging.
    Wheel,
    /// The persistent capturing `touchmove` bound while any item is registered.
    ///
    /// It only calls `preventDefault` when [`DragDrop::should_prevent_default`]
    /// is `true`. Some browsers ignore `preventDefault` from a capturing
    /// `touchmove` listener added mid-gesture, so this one is bound up front.
    ///
    /// [`DragDrop::should_prevent_default`]: crate::DragDrop::should_prevent_default
    TouchMoveGuard,
}

/// Options passed to `addEventListener`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Listen during the capture phase.
    pub capture: bool,
    /// Declare the listener passive. The hub always binds non-passive
    /// listeners so that `preventDefault` is honored.
    pub passive: bool,
}

impl ListenerOptions {
    /// Capturing, non-passive.
    pub const ACTIVE_CAPTURING: Self = Self {
        capture: true,
        passive: false,
    };
}

/// A scrollable node: either the viewport (document) or an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollTarget<E> {
    /// The window/document scroller.
    Viewport,
    /// A scrollable element.
    Element(E),
}

/// Scroll state of a [`ScrollTarget`].
///
/// Mirrors `scrollTop`/`scrollLeft`, `scrollWidth`/`scrollHeight` and
/// `clientWidth`/`clientHeight`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset (`scrollLeft`, `scrollTop`).
    pub offset: Vec2,
    /// Full scrollable content size.
    pub scroll_size: Size,
    /// Visible client size.
    pub client_size: Size,
}

/// Transient elements created for the duration of a drag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragArtifact {
    /// The floating element following the pointer.
    Preview,
    /// The stand-in left in the list while the real element is hidden.
    Placeholder,
}

/// Everything the engine needs from the page.
///
/// Implementations are expected to be cheap to call; most methods run on every
/// processed pointer move.
pub trait DragDropHost {
    /// Handle to a node. Cloning must not clone the node itself.
    type Element: Clone + PartialEq + core::fmt::Debug;

    /// The element's bounding rect in client coordinates, including any
    /// transform currently applied.
    fn client_rect(&self, element: &Self::Element) -> Rect;

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    /// The top-most element at `point`.
    ///
    /// Drag previews must not be hit; browsers get this from
    /// `pointer-events: none` on the preview.
    ///
    /// When `scope` lives inside a shadow root, the lookup must be resolved
    /// through that shadow root so shadow-internal elements are returned.
    fn element_from_point(&self, scope: &Self::Element, point: Point) -> Option<Self::Element>;

    /// Returns `true` if the browser would start a native HTML drag from
    /// `element` (for example an `<img>` or `draggable="true"`).
    fn is_natively_draggable(&self, element: &Self::Element) -> bool;

    /// The node following `element` in its parent, if any.
    fn next_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// The parent of `element`, if attached.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Insert `node` into `parent` before `reference`, or append when
    /// `reference` is `None`. Moves `node` if it is already attached.
    fn insert_before(
        &mut self,
        parent: &Self::Element,
        node: &Self::Element,
        reference: Option<&Self::Element>,
    );

    /// Append `node` to the document body. Moves it if already attached.
    fn append_to_body(&mut self, node: &Self::Element);

    /// Detach `node` from the tree.
    fn remove(&mut self, node: &Self::Element);

    /// Create a preview or placeholder element.
    ///
    /// When `template` is provided, the host instantiates it; otherwise it
    /// deep-clones `source`, stripping its `id` attribute.
    fn create_artifact(
        &mut self,
        source: &Self::Element,
        template: Option<&Self::Element>,
        kind: DragArtifact,
    ) -> Self::Element;

    /// Set the inline `transform`. An empty string clears it.
    fn set_transform(&mut self, element: &Self::Element, transform: &str);

    /// Show or hide (`display: none`) the element.
    fn set_visible(&mut self, element: &Self::Element, visible: bool);

    /// Fix the preview's size to the source element's size.
    fn set_size(&mut self, element: &Self::Element, size: Size);

    /// Mark the preview as animating into its resting place.
    fn set_animating(&mut self, element: &Self::Element, animating: bool);

    /// The element's computed `transform` transition time (duration plus
    /// delay) in milliseconds. Zero when `transform` is not transitioned.
    fn transition_duration_ms(&self, element: &Self::Element) -> f64;

    /// Start or stop reporting `transitionend` for `element` through
    /// [`DragDrop::transition_ended`](crate::DragDrop::transition_ended).
    fn watch_transition_end(&mut self, element: &Self::Element, watch: bool);

    /// Enable or disable native drag and text selection on the body.
    fn set_native_interactions(&mut self, enabled: bool);

    /// Bind a document-level listener.
    fn bind_listener(&mut self, listener: GlobalListener, options: ListenerOptions);

    /// Unbind a document-level listener previously bound with
    /// [`bind_listener`](Self::bind_listener).
    fn unbind_listener(&mut self, listener: GlobalListener);

    /// The viewport size.
    fn viewport_size(&self) -> Size;

    /// Scroll state of `target`.
    fn scroll_metrics(&self, target: &ScrollTarget<Self::Element>) -> ScrollMetrics;

    /// Scroll `target` by `delta`.
    fn scroll_by(&mut self, target: &ScrollTarget<Self::Element>, delta: Vec2);
}
