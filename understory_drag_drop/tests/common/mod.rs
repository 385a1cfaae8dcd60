// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`DragDropHost`] for integration tests.
//!
//! Nodes live in a flat table. A node marked as a flow container stacks its
//! visible children along its axis, starting at its own origin minus its
//! scroll offset. Inline transforms written by the engine are parsed back
//! and applied on top of the laid out position, so `client_rect` reports what
//! a browser would.

#![allow(
    dead_code,
    missing_docs,
    unreachable_pub,
    reason = "Integration-test helper module; each test binary uses a different subset."
)]

use std::collections::BTreeMap;

use kurbo::{Point, Rect, Size, Vec2};
use understory_drag_drop::{
    ContainerConfig, ContainerKey, DragArtifact, DragDrop, DragDropConfig, DragDropEvent,
    DragDropHost, GlobalListener, ItemConfig, ItemKey, ListenerOptions, Orientation,
    PointerInput, ScrollMetrics, ScrollTarget,
};

pub type Node = u32;

#[derive(Clone, Debug, Default)]
struct NodeData {
    parent: Option<Node>,
    children: Vec<Node>,
    size: Size,
    origin: Option<Point>,
    flow: Option<Orientation>,
    visible: bool,
    transform: String,
    artifact: Option<DragArtifact>,
    scroll: Option<ScrollMetrics>,
    draggable: bool,
    animating: bool,
}

#[derive(Debug)]
pub struct TestHost {
    nodes: Vec<NodeData>,
    pub body: Node,
    pub viewport: Size,
    pub viewport_scroll: ScrollMetrics,
    pub bound: BTreeMap<GlobalListener, ListenerOptions>,
    pub native_interactions: bool,
    pub transition_ms: f64,
    pub watched: Vec<Node>,
    pub scrolled: Vec<(ScrollTarget<Node>, Vec2)>,
}

impl TestHost {
    pub fn new(viewport: Size) -> Self {
        let body = NodeData {
            origin: Some(Point::ZERO),
            size: viewport,
            visible: true,
            ..NodeData::default()
        };
        Self {
            nodes: vec![body],
            body: 0,
            viewport,
            viewport_scroll: ScrollMetrics {
                offset: Vec2::ZERO,
                scroll_size: viewport,
                client_size: viewport,
            },
            bound: BTreeMap::new(),
            native_interactions: true,
            transition_ms: 0.0,
            watched: Vec::new(),
            scrolled: Vec::new(),
        }
    }

    fn push(&mut self, data: NodeData) -> Node {
        let node = Node::try_from(self.nodes.len()).expect("test trees stay small");
        self.nodes.push(data);
        node
    }

    fn data(&self, node: Node) -> &NodeData {
        &self.nodes[node as usize]
    }

    fn data_mut(&mut self, node: Node) -> &mut NodeData {
        &mut self.nodes[node as usize]
    }

    /// A flow container placed at `origin` in the body.
    pub fn add_list(&mut self, origin: Point, size: Size, orientation: Orientation) -> Node {
        let node = self.push(NodeData {
            size,
            origin: Some(origin),
            flow: Some(orientation),
            visible: true,
            ..NodeData::default()
        });
        self.attach(self.body, node, None);
        node
    }

    /// A plain box at `origin` in the body.
    pub fn add_box(&mut self, origin: Point, size: Size) -> Node {
        let node = self.push(NodeData {
            size,
            origin: Some(origin),
            visible: true,
            ..NodeData::default()
        });
        self.attach(self.body, node, None);
        node
    }

    /// A child of `parent`, laid out by it when it is a flow container.
    pub fn add_child(&mut self, parent: Node, size: Size) -> Node {
        let node = self.push(NodeData {
            size,
            visible: true,
            ..NodeData::default()
        });
        self.attach(parent, node, None);
        node
    }

    /// Make `node` scrollable with the given content size.
    pub fn make_scrollable(&mut self, node: Node, scroll_size: Size) {
        let client_size = self.data(node).size;
        self.data_mut(node).scroll = Some(ScrollMetrics {
            offset: Vec2::ZERO,
            scroll_size,
            client_size,
        });
    }

    /// Simulate the user scrolling `target` to `offset`.
    pub fn set_scroll_offset(&mut self, target: &ScrollTarget<Node>, offset: Vec2) {
        match target {
            ScrollTarget::Viewport => self.viewport_scroll.offset = offset,
            ScrollTarget::Element(node) => {
                if let Some(scroll) = self.data_mut(*node).scroll.as_mut() {
                    scroll.offset = offset;
                }
            }
        }
    }

    pub fn resize(&mut self, node: Node, size: Size) {
        self.data_mut(node).size = size;
    }

    pub fn set_draggable(&mut self, node: Node) {
        self.data_mut(node).draggable = true;
    }

    pub fn children(&self, node: Node) -> Vec<Node> {
        self.data(node).children.clone()
    }

    pub fn transform_of(&self, node: Node) -> &str {
        &self.data(node).transform
    }

    pub fn is_visible(&self, node: Node) -> bool {
        self.data(node).visible
    }

    pub fn is_attached(&self, node: Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.body {
                return true;
            }
            current = self.data(n).parent;
        }
        false
    }

    pub fn artifacts(&self) -> Vec<(Node, DragArtifact)> {
        (0..self.nodes.len())
            .filter_map(|i| {
                let node = Node::try_from(i).ok()?;
                let kind = self.data(node).artifact?;
                self.is_attached(node).then_some((node, kind))
            })
            .collect()
    }

    fn detach(&mut self, node: Node) {
        if let Some(parent) = self.data_mut(node).parent.take() {
            self.data_mut(parent).children.retain(|c| *c != node);
        }
    }

    fn attach(&mut self, parent: Node, node: Node, reference: Option<Node>) {
        self.detach(node);
        let children = &mut self.data_mut(parent).children;
        let index = reference
            .and_then(|r| children.iter().position(|c| *c == r))
            .unwrap_or(children.len());
        children.insert(index, node);
        self.data_mut(node).parent = Some(parent);
    }

    fn parsed_transform(&self, node: Node) -> Vec2 {
        let css = &self.data(node).transform;
        let Some(inner) = css
            .strip_prefix("translate3d(")
            .and_then(|s| s.strip_suffix(')'))
        else {
            return Vec2::ZERO;
        };
        let mut parts = inner
            .split(',')
            .map(|p| p.trim().trim_end_matches("px").parse::<f64>().unwrap_or(0.0));
        let x = parts.next().unwrap_or(0.0);
        let y = parts.next().unwrap_or(0.0);
        Vec2::new(x, y)
    }

    /// Where `node` is laid out, before its own transform.
    fn layout_origin(&self, node: Node) -> Point {
        let data = self.data(node);
        if data.artifact == Some(DragArtifact::Preview) {
            // Previews are fixed at the viewport origin and positioned by transform.
            return Point::ZERO;
        }
        let Some(parent) = data.parent else {
            return data.origin.unwrap_or_default() - self.viewport_scroll.offset;
        };
        let parent_data = self.data(parent);
        let Some(flow) = parent_data.flow else {
            return data.origin.unwrap_or_default() - self.viewport_scroll.offset;
        };
        let parent_origin = self.layout_origin(parent) + self.parsed_transform(parent);
        let scroll = parent_data.scroll.map(|s| s.offset).unwrap_or_default();
        let mut position = parent_origin - scroll;
        for sibling in &parent_data.children {
            if *sibling == node {
                break;
            }
            let sibling_data = self.data(*sibling);
            if !sibling_data.visible {
                continue;
            }
            match flow {
                Orientation::Vertical => position.y += sibling_data.size.height,
                Orientation::Horizontal => position.x += sibling_data.size.width,
            }
        }
        position
    }

    fn hit_test(&self, node: Node, point: Point, hit: &mut Option<Node>) {
        let data = self.data(node);
        if !data.visible || data.artifact == Some(DragArtifact::Preview) {
            return;
        }
        if node != self.body && self.client_rect(&node).contains(point) {
            *hit = Some(node);
        }
        for child in &data.children {
            self.hit_test(*child, point, hit);
        }
    }
}

impl DragDropHost for TestHost {
    type Element = Node;

    fn client_rect(&self, element: &Node) -> Rect {
        let data = self.data(*element);
        if !data.visible {
            return Rect::ZERO;
        }
        let origin = self.layout_origin(*element) + self.parsed_transform(*element);
        Rect::from_origin_size(origin, data.size)
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        let mut current = Some(*node);
        while let Some(n) = current {
            if n == *ancestor {
                return true;
            }
            current = self.data(n).parent;
        }
        false
    }

    fn element_from_point(&self, _scope: &Node, point: Point) -> Option<Node> {
        let mut hit = None;
        self.hit_test(self.body, point, &mut hit);
        hit
    }

    fn is_natively_draggable(&self, element: &Node) -> bool {
        self.data(*element).draggable
    }

    fn next_sibling(&self, element: &Node) -> Option<Node> {
        let parent = self.data(*element).parent?;
        let children = &self.data(parent).children;
        let index = children.iter().position(|c| c == element)?;
        children.get(index + 1).copied()
    }

    fn parent(&self, element: &Node) -> Option<Node> {
        self.data(*element).parent
    }

    fn insert_before(&mut self, parent: &Node, node: &Node, reference: Option<&Node>) {
        self.attach(*parent, *node, reference.copied());
    }

    fn append_to_body(&mut self, node: &Node) {
        self.attach(self.body, *node, None);
    }

    fn remove(&mut self, node: &Node) {
        self.detach(*node);
    }

    fn create_artifact(&mut self, source: &Node, template: Option<&Node>, kind: DragArtifact) -> Node {
        let size = match template {
            Some(template) => self.data(*template).size,
            None => self.client_rect(source).size(),
        };
        self.push(NodeData {
            size,
            visible: true,
            artifact: Some(kind),
            ..NodeData::default()
        })
    }

    fn set_transform(&mut self, element: &Node, transform: &str) {
        self.data_mut(*element).transform = transform.into();
    }

    fn set_visible(&mut self, element: &Node, visible: bool) {
        self.data_mut(*element).visible = visible;
    }

    fn set_size(&mut self, element: &Node, size: Size) {
        self.data_mut(*element).size = size;
    }

    fn set_animating(&mut self, element: &Node, animating: bool) {
        self.data_mut(*element).animating = animating;
    }

    fn transition_duration_ms(&self, element: &Node) -> f64 {
        if self.data(*element).animating {
            self.transition_ms
        } else {
            0.0
        }
    }

    fn watch_transition_end(&mut self, element: &Node, watch: bool) {
        if watch {
            self.watched.push(*element);
        } else {
            self.watched.retain(|n| n != element);
        }
    }

    fn set_native_interactions(&mut self, enabled: bool) {
        self.native_interactions = enabled;
    }

    fn bind_listener(&mut self, listener: GlobalListener, options: ListenerOptions) {
        self.bound.insert(listener, options);
    }

    fn unbind_listener(&mut self, listener: GlobalListener) {
        self.bound.remove(&listener);
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn scroll_metrics(&self, target: &ScrollTarget<Node>) -> ScrollMetrics {
        match target {
            ScrollTarget::Viewport => self.viewport_scroll,
            ScrollTarget::Element(node) => {
                let data = self.data(*node);
                data.scroll.unwrap_or(ScrollMetrics {
                    offset: Vec2::ZERO,
                    scroll_size: data.size,
                    client_size: data.size,
                })
            }
        }
    }

    fn scroll_by(&mut self, target: &ScrollTarget<Node>, delta: Vec2) {
        self.scrolled.push((target.clone(), delta));
        let metrics = match target {
            ScrollTarget::Viewport => Some(&mut self.viewport_scroll),
            ScrollTarget::Element(node) => self.data_mut(*node).scroll.as_mut(),
        };
        if let Some(metrics) = metrics {
            let max_x = (metrics.scroll_size.width - metrics.client_size.width).max(0.0);
            let max_y = (metrics.scroll_size.height - metrics.client_size.height).max(0.0);
            metrics.offset = Vec2::new(
                (metrics.offset.x + delta.x).clamp(0.0, max_x),
                (metrics.offset.y + delta.y).clamp(0.0, max_y),
            );
        }
    }
}

/// A context over a fresh host with a large viewport.
pub fn context() -> DragDrop<TestHost> {
    DragDrop::new(
        TestHost::new(Size::new(2000.0, 2000.0)),
        DragDropConfig::default(),
    )
}

/// A list at `origin` with `count` rows of `row` size, registered as a
/// container with its rows as items.
pub fn list(
    dd: &mut DragDrop<TestHost>,
    origin: Point,
    row: Size,
    count: usize,
    config: ContainerConfig<Node>,
) -> (ContainerKey, Node, Vec<(ItemKey, Node)>) {
    let orientation = config.orientation;
    let size = match orientation {
        Orientation::Vertical => Size::new(row.width, row.height * count as f64),
        Orientation::Horizontal => Size::new(row.width * count as f64, row.height),
    };
    let element = dd.host_mut().add_list(origin, size, orientation);
    let container = dd
        .create_container(element, config)
        .expect("container ids are unique in tests");
    let mut items = Vec::new();
    for _ in 0..count {
        let node = dd.host_mut().add_child(element, row);
        let key = dd.create_item(node, ItemConfig::default());
        items.push((key, node));
    }
    let keys: Vec<ItemKey> = items.iter().map(|(k, _)| *k).collect();
    dd.set_container_items(container, &keys)
        .expect("fresh items are unattached");
    (container, element, items)
}

pub fn mouse(x: f64, y: f64, t: f64) -> PointerInput<Node> {
    PointerInput::mouse(Point::new(x, y), t)
}

/// Press on `item` at `(x, y)` and move far enough to start dragging.
pub fn start_drag(dd: &mut DragDrop<TestHost>, item: ItemKey, x: f64, y: f64) {
    dd.pointer_down(item, &mouse(x, y, 0.0));
    dd.pointer_move(&mouse(x, y + 10.0, 10.0));
}

pub fn drain(dd: &mut DragDrop<TestHost>) -> Vec<DragDropEvent> {
    dd.drain_events()
}
