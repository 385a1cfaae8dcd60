// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::{boxed::Box, collections::BTreeMap, rc::Rc, rc::Weak, vec::Vec};
use core::cell::{Cell, RefCell};
use core::fmt;
use core::mem;

use js_sys::Function;
use kurbo::{Point, Rect, Size, Vec2};
use tracing::{debug, warn};
use understory_drag_drop::{
    DragArtifact, DragDrop, DragDropConfig, DragDropEvent, DragDropHost, GlobalListener,
    InputResponse, ItemConfig, ItemKey, ListenerOptions, PointerInput, ScrollMetrics,
    ScrollTarget, transform_transition_ms,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, CssStyleDeclaration, Document, Element, Event, HtmlElement,
    MouseEvent, ShadowRoot, TouchEvent, TransitionEvent, Window,
};

use crate::{
    ANIMATING_CLASS, ListenerRoute, PLACEHOLDER_CLASS, PREVIEW_CLASS, event_type, listener_route,
};

/// Work the host cannot do synchronously because it needs the driver's
/// closures.
#[derive(Clone, Debug)]
enum HostRequest {
    Bind(GlobalListener, ListenerOptions),
    Unbind(GlobalListener),
    Watch(Element),
    Unwatch(Element),
}

fn style(element: &Element) -> Option<CssStyleDeclaration> {
    element.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

fn set_style(element: &Element, property: &str, value: Option<&str>) {
    let Some(style) = style(element) else {
        return;
    };
    let result = match value {
        Some(value) => style.set_property(property, value),
        None => style.remove_property(property).map(drop),
    };
    if let Err(err) = result {
        warn!(?err, property, "style update failed");
    }
}

fn callback<T: ?Sized>(closure: &Closure<T>) -> &Function {
    closure.as_ref().unchecked_ref()
}

fn px(value: i32) -> f64 {
    f64::from(value)
}

/// [`DragDropHost`] over the live DOM.
pub struct WebHost {
    window: Window,
    document: Document,
    body: HtmlElement,
    // Detached element handed out if cloning an artifact source fails.
    spare: Element,
    requests: Vec<HostRequest>,
}

impl fmt::Debug for WebHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHost")
            .field("pending_requests", &self.requests.len())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    /// A host over the current window's document.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global window exists")?;
        let document = window.document().ok_or("window has no document")?;
        let body = document.body().ok_or("document has no body")?;
        let spare = document.create_element("div")?;
        Ok(Self {
            window,
            document,
            body,
            spare,
            requests: Vec::new(),
        })
    }

    /// The window this host reads from.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The document this host edits.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl DragDropHost for WebHost {
    type Element = Element;

    fn client_rect(&self, element: &Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::from_origin_size(
            Point::new(rect.x(), rect.y()),
            Size::new(rect.width(), rect.height()),
        )
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "elementFromPoint takes single-precision coordinates"
    )]
    fn element_from_point(&self, scope: &Element, point: Point) -> Option<Element> {
        let (x, y) = (point.x as f32, point.y as f32);
        match scope.get_root_node().dyn_into::<ShadowRoot>() {
            Ok(shadow) => shadow.element_from_point(x, y),
            Err(_) => self.document.element_from_point(x, y),
        }
    }

    fn is_natively_draggable(&self, element: &Element) -> bool {
        element
            .dyn_ref::<HtmlElement>()
            .is_some_and(HtmlElement::draggable)
    }

    fn next_sibling(&self, element: &Element) -> Option<Element> {
        element.next_element_sibling()
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn insert_before(&mut self, parent: &Element, node: &Element, reference: Option<&Element>) {
        if let Err(err) = parent.insert_before(node, reference.map(AsRef::as_ref)) {
            warn!(?err, "insertBefore failed");
        }
    }

    fn append_to_body(&mut self, node: &Element) {
        if let Err(err) = self.body.append_child(node) {
            warn!(?err, "appending to body failed");
        }
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn create_artifact(
        &mut self,
        source: &Element,
        template: Option<&Element>,
        kind: DragArtifact,
    ) -> Element {
        let element = match template.unwrap_or(source).clone_node_with_deep(true) {
            Ok(node) => node.unchecked_into::<Element>(),
            Err(err) => {
                warn!(?err, ?kind, "cloning drag artifact failed");
                self.spare.clone()
            }
        };
        if let Err(err) = element.remove_attribute("id") {
            warn!(?err, "removing artifact id failed");
        }
        let class = match kind {
            DragArtifact::Preview => {
                set_style(&element, "position", Some("fixed"));
                set_style(&element, "top", Some("0"));
                set_style(&element, "left", Some("0"));
                set_style(&element, "margin", Some("0"));
                set_style(&element, "pointer-events", Some("none"));
                set_style(&element, "z-index", Some("1000"));
                PREVIEW_CLASS
            }
            DragArtifact::Placeholder => PLACEHOLDER_CLASS,
        };
        if let Err(err) = element.class_list().add_1(class) {
            warn!(?err, class, "adding artifact class failed");
        }
        element
    }

    fn set_transform(&mut self, element: &Element, transform: &str) {
        let value = (!transform.is_empty()).then_some(transform);
        set_style(element, "transform", value);
    }

    fn set_visible(&mut self, element: &Element, visible: bool) {
        set_style(element, "display", (!visible).then_some("none"));
    }

    fn set_size(&mut self, element: &Element, size: Size) {
        set_style(element, "width", Some(&alloc::format!("{}px", size.width)));
        set_style(element, "height", Some(&alloc::format!("{}px", size.height)));
    }

    fn set_animating(&mut self, element: &Element, animating: bool) {
        let classes = element.class_list();
        let result = if animating {
            classes.add_1(ANIMATING_CLASS)
        } else {
            classes.remove_1(ANIMATING_CLASS)
        };
        if let Err(err) = result {
            warn!(?err, "toggling animating class failed");
        }
    }

    fn transition_duration_ms(&self, element: &Element) -> f64 {
        let Ok(Some(computed)) = self.window.get_computed_style(element) else {
            return 0.0;
        };
        let read = |property: &str| computed.get_property_value(property).unwrap_or_default();
        transform_transition_ms(
            &read("transition-property"),
            &read("transition-duration"),
            &read("transition-delay"),
        )
    }

    fn watch_transition_end(&mut self, element: &Element, watch: bool) {
        self.requests.push(if watch {
            HostRequest::Watch(element.clone())
        } else {
            HostRequest::Unwatch(element.clone())
        });
    }

    fn set_native_interactions(&mut self, enabled: bool) {
        let body: &Element = self.body.as_ref();
        let (none, transparent) = if enabled {
            (None, None)
        } else {
            (Some("none"), Some("transparent"))
        };
        set_style(body, "user-select", none);
        set_style(body, "-webkit-user-drag", none);
        set_style(body, "touch-action", none);
        set_style(body, "-webkit-tap-highlight-color", transparent);
    }

    fn bind_listener(&mut self, listener: GlobalListener, options: ListenerOptions) {
        self.requests.push(HostRequest::Bind(listener, options));
    }

    fn unbind_listener(&mut self, listener: GlobalListener) {
        self.requests.push(HostRequest::Unbind(listener));
    }

    fn viewport_size(&self) -> Size {
        let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());
        Size::new(
            read(self.window.inner_width()).unwrap_or(0.0),
            read(self.window.inner_height()).unwrap_or(0.0),
        )
    }

    fn scroll_metrics(&self, target: &ScrollTarget<Element>) -> ScrollMetrics {
        match target {
            ScrollTarget::Viewport => {
                let offset = Vec2::new(
                    self.window.scroll_x().unwrap_or(0.0),
                    self.window.scroll_y().unwrap_or(0.0),
                );
                let Some(root) = self.document.document_element() else {
                    return ScrollMetrics {
                        offset,
                        ..ScrollMetrics::default()
                    };
                };
                ScrollMetrics {
                    offset,
                    scroll_size: Size::new(px(root.scroll_width()), px(root.scroll_height())),
                    client_size: Size::new(px(root.client_width()), px(root.client_height())),
                }
            }
            ScrollTarget::Element(element) => ScrollMetrics {
                offset: Vec2::new(px(element.scroll_left()), px(element.scroll_top())),
                scroll_size: Size::new(px(element.scroll_width()), px(element.scroll_height())),
                client_size: Size::new(px(element.client_width()), px(element.client_height())),
            },
        }
    }

    fn scroll_by(&mut self, target: &ScrollTarget<Element>, delta: Vec2) {
        match target {
            ScrollTarget::Viewport => self.window.scroll_by_with_x_and_y(delta.x, delta.y),
            ScrollTarget::Element(element) => element.scroll_by_with_x_and_y(delta.x, delta.y),
        }
    }
}

/// Read a mouse or touch event into engine input.
fn pointer_input(event: &Event) -> Option<PointerInput<Element>> {
    let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
    let mut input = if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        PointerInput::mouse(
            Point::new(px(mouse.client_x()), px(mouse.client_y())),
            event.time_stamp(),
        )
        .with_button(mouse.button())
    } else {
        let touches = event.dyn_ref::<TouchEvent>()?;
        let touch = touches
            .touches()
            .get(0)
            .or_else(|| touches.changed_touches().get(0))?;
        PointerInput::touch(
            Point::new(px(touch.client_x()), px(touch.client_y())),
            event.time_stamp(),
        )
    };
    input.target = target;
    Some(input)
}

fn apply_response(event: &Event, response: InputResponse) {
    if response.stop_propagation {
        event.stop_propagation();
    }
    if response.prevent_default {
        event.prevent_default();
    }
}

type EventClosure = Closure<dyn FnMut(Event)>;
type EventHandler = Box<dyn FnMut(&mut DragDrop<WebHost>, DragDropEvent)>;

struct GlobalBinding {
    closure: EventClosure,
    capture: bool,
}

struct ItemBinding {
    root: Element,
    mouse_down: EventClosure,
    touch_start: EventClosure,
}

impl ItemBinding {
    fn detach(&self) {
        for (kind, closure) in [
            ("mousedown", &self.mouse_down),
            ("touchstart", &self.touch_start),
        ] {
            if let Err(err) = self
                .root
                .remove_event_listener_with_callback_and_bool(kind, callback(closure), false)
            {
                warn!(?err, kind, "removing item listener failed");
            }
        }
    }
}

struct Shared {
    this: Weak<Self>,
    engine: RefCell<DragDrop<WebHost>>,
    window: Window,
    document: Document,
    handler: RefCell<Option<EventHandler>>,
    globals: RefCell<BTreeMap<GlobalListener, GlobalBinding>>,
    items: RefCell<BTreeMap<ItemKey, ItemBinding>>,
    watched: RefCell<Vec<Element>>,
    transition_end: EventClosure,
    frame: Closure<dyn FnMut(f64)>,
    frame_request: Cell<Option<i32>>,
}

impl Shared {
    fn global_closure(weak: Weak<Self>, listener: GlobalListener) -> EventClosure {
        Closure::new(move |event: Event| {
            if let Some(shared) = weak.upgrade() {
                shared.on_global(listener, &event);
            }
        })
    }

    fn on_global(&self, listener: GlobalListener, event: &Event) {
        match listener_route(listener) {
            ListenerRoute::Move => {
                let Some(input) = pointer_input(event) else {
                    return;
                };
                let response = self.engine.borrow_mut().pointer_move(&input);
                apply_response(event, response);
            }
            ListenerRoute::Release => {
                let Some(input) = pointer_input(event) else {
                    return;
                };
                self.engine.borrow_mut().pointer_up(&input);
            }
            ListenerRoute::Scroll => {
                let target = match event.target().and_then(|t| t.dyn_into::<Element>().ok()) {
                    Some(element) => ScrollTarget::Element(element),
                    None => ScrollTarget::Viewport,
                };
                self.engine.borrow_mut().scrolled(&target);
            }
            ListenerRoute::Guard => {
                if self.engine.borrow().should_prevent_default() {
                    event.prevent_default();
                }
                return;
            }
        }
        self.flush();
    }

    fn on_pointer_down(&self, item: ItemKey, event: &Event) {
        let Some(input) = pointer_input(event) else {
            return;
        };
        let response = self.engine.borrow_mut().pointer_down(item, &input);
        apply_response(event, response);
        self.flush();
    }

    fn on_transition_end(&self, event: &Event) {
        let Some(transition) = event.dyn_ref::<TransitionEvent>() else {
            return;
        };
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        self.engine
            .borrow_mut()
            .transition_ended(&target, &transition.property_name());
        self.flush();
    }

    fn on_frame(&self, now: f64) {
        self.frame_request.set(None);
        self.engine.borrow_mut().on_animation_frame(now);
        self.flush();
    }

    /// Apply queued host requests, deliver events, and keep the frame loop
    /// alive while the engine needs it.
    fn flush(&self) {
        loop {
            let (requests, events) = {
                let mut engine = self.engine.borrow_mut();
                let requests = mem::take(&mut engine.host_mut().requests);
                (requests, engine.drain_events())
            };
            if requests.is_empty() && events.is_empty() {
                break;
            }
            for request in requests {
                self.apply(request);
            }
            if let Some(handler) = self.handler.borrow_mut().as_mut() {
                let mut engine = self.engine.borrow_mut();
                for event in events {
                    handler(&mut engine, event);
                }
            }
        }
        self.forget_disposed_items();
        self.schedule_frame();
    }

    fn apply(&self, request: HostRequest) {
        match request {
            HostRequest::Bind(listener, options) => self.bind(listener, options),
            HostRequest::Unbind(listener) => self.unbind(listener),
            HostRequest::Watch(element) => {
                let added = element.add_event_listener_with_callback(
                    "transitionend",
                    callback(&self.transition_end),
                );
                match added {
                    Ok(()) => self.watched.borrow_mut().push(element),
                    Err(err) => warn!(?err, "watching transitionend failed"),
                }
            }
            HostRequest::Unwatch(element) => {
                self.watched.borrow_mut().retain(|e| *e != element);
                self.stop_watching(&element);
            }
        }
    }

    fn bind(&self, listener: GlobalListener, options: ListenerOptions) {
        let mut globals = self.globals.borrow_mut();
        if globals.contains_key(&listener) {
            return;
        }
        let closure = Self::global_closure(self.this.clone(), listener);
        let dom_options = AddEventListenerOptions::new();
        dom_options.set_capture(options.capture);
        dom_options.set_passive(options.passive);
        let added = self
            .document
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_type(listener),
                callback(&closure),
                &dom_options,
            );
        if let Err(err) = added {
            warn!(?err, ?listener, "binding document listener failed");
            return;
        }
        debug!(?listener, "bound document listener");
        globals.insert(
            listener,
            GlobalBinding {
                closure,
                capture: options.capture,
            },
        );
    }

    fn unbind(&self, listener: GlobalListener) {
        let Some(binding) = self.globals.borrow_mut().remove(&listener) else {
            return;
        };
        let removed = self.document.remove_event_listener_with_callback_and_bool(
            event_type(listener),
            callback(&binding.closure),
            binding.capture,
        );
        if let Err(err) = removed {
            warn!(?err, ?listener, "unbinding document listener failed");
        }
    }

    fn stop_watching(&self, element: &Element) {
        let removed = element.remove_event_listener_with_callback(
            "transitionend",
            callback(&self.transition_end),
        );
        if let Err(err) = removed {
            warn!(?err, "unwatching transitionend failed");
        }
    }

    fn forget_disposed_items(&self) {
        let engine = self.engine.borrow();
        self.items.borrow_mut().retain(|key, binding| {
            let alive = engine.item(*key).is_some();
            if !alive {
                binding.detach();
            }
            alive
        });
    }

    fn schedule_frame(&self) {
        if self.frame_request.get().is_some() || !self.engine.borrow().needs_animation_frame() {
            return;
        }
        match self
            .window
            .request_animation_frame(callback(&self.frame))
        {
            Ok(id) => self.frame_request.set(Some(id)),
            Err(err) => warn!(?err, "requestAnimationFrame failed"),
        }
    }
}

/// Owns a [`DragDrop`] over a [`WebHost`] and keeps the page's listeners in
/// sync with it.
///
/// Dropping the driver disposes the engine and detaches every listener it
/// installed.
pub struct WebDragDrop {
    shared: Rc<Shared>,
}

impl fmt::Debug for WebDragDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDragDrop")
            .field("items", &self.shared.items.borrow().len())
            .field("document_listeners", &self.shared.globals.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WebDragDrop {
    /// A driver over the current window's document.
    pub fn new(config: DragDropConfig) -> Result<Self, JsValue> {
        let host = WebHost::new()?;
        let window = host.window.clone();
        let document = host.document.clone();
        let shared = Rc::new_cyclic(|this: &Weak<Shared>| {
            let on_transition = this.clone();
            let on_frame = this.clone();
            Shared {
                this: this.clone(),
                engine: RefCell::new(DragDrop::new(host, config)),
                window,
                document,
                handler: RefCell::new(None),
                globals: RefCell::new(BTreeMap::new()),
                items: RefCell::new(BTreeMap::new()),
                watched: RefCell::new(Vec::new()),
                transition_end: Closure::new(move |event: Event| {
                    if let Some(shared) = on_transition.upgrade() {
                        shared.on_transition_end(&event);
                    }
                }),
                frame: Closure::new(move |now: f64| {
                    if let Some(shared) = on_frame.upgrade() {
                        shared.on_frame(now);
                    }
                }),
                frame_request: Cell::new(None),
            }
        });
        Ok(Self { shared })
    }

    /// Make `root` draggable and install its press listeners.
    pub fn create_item(&self, root: Element, config: ItemConfig<Element>) -> ItemKey {
        let key = self.shared.engine.borrow_mut().create_item(root.clone(), config);
        let press = |kind: &'static str| -> EventClosure {
            let weak = self.shared.this.clone();
            let closure = Closure::new(move |event: Event| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_pointer_down(key, &event);
                }
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(kind == "touchstart");
            let added = root.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback(&closure),
                &options,
            );
            if let Err(err) = added {
                warn!(?err, kind, "binding item listener failed");
            }
            closure
        };
        let binding = ItemBinding {
            mouse_down: press("mousedown"),
            touch_start: press("touchstart"),
            root,
        };
        self.shared.items.borrow_mut().insert(key, binding);
        self.shared.flush();
        key
    }

    /// Dispose an item and detach its press listeners.
    pub fn dispose_item(&self, key: ItemKey) {
        self.shared.engine.borrow_mut().dispose_item(key);
        self.shared.flush();
    }

    /// Run `f` against the engine, then apply whatever it asked of the page.
    ///
    /// Items disposed inside `f` lose their press listeners. Items created
    /// inside `f` get none; use [`create_item`](Self::create_item) instead.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut DragDrop<WebHost>) -> R) -> R {
        let result = f(&mut self.shared.engine.borrow_mut());
        self.shared.flush();
        result
    }

    /// Deliver engine events to `handler` as they are produced.
    ///
    /// The handler receives the engine so it can react to a drop, for
    /// example by handing the container its reordered items.
    pub fn set_event_handler(
        &self,
        handler: impl FnMut(&mut DragDrop<WebHost>, DragDropEvent) + 'static,
    ) {
        *self.shared.handler.borrow_mut() = Some(Box::new(handler));
    }
}

impl Drop for WebDragDrop {
    fn drop(&mut self) {
        let shared = &self.shared;
        if let Some(id) = shared.frame_request.take()
            && let Err(err) = shared.window.cancel_animation_frame(id)
        {
            warn!(?err, "cancelAnimationFrame failed");
        }
        shared.handler.borrow_mut().take();
        shared.engine.borrow_mut().dispose();
        shared.flush();
        for element in mem::take(&mut *shared.watched.borrow_mut()) {
            shared.stop_watching(&element);
        }
        let listeners: Vec<_> = shared.globals.borrow().keys().copied().collect();
        for listener in listeners {
            shared.unbind(listener);
        }
        for binding in mem::take(&mut *shared.items.borrow_mut()).values() {
            binding.detach();
        }
    }
}
