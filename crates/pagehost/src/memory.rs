use crate::dom::{
    ClassName, Dom, ElementId, NodeId, PointerId, ScrollBehavior, Selector, SelectorKind, TagName,
    Window,
};
use crate::timer::{Scheduler, TimerId, VirtualClock};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Description of an element to append with [`MemoryDom::append`].
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: TagName,
    id: Option<ElementId>,
    classes: Vec<ClassName>,
    attributes: Vec<(String, String)>,
    text: String,
    width: f64,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: TagName::from(tag),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: String::new(),
            width: 0.0,
        }
    }

    pub fn id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<ClassName>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: TagName,
    id: Option<ElementId>,
    classes: Vec<ClassName>,
    attributes: BTreeMap<String, String>,
    text: String,
    style: BTreeMap<String, String>,
    width: f64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn from_spec(spec: ElementSpec, parent: Option<NodeId>) -> Self {
        Self {
            tag: spec.tag,
            id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes.into_iter().collect(),
            text: spec.text,
            style: BTreeMap::new(),
            width: spec.width,
            parent,
            children: Vec::new(),
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector.kind() {
            SelectorKind::Class(c) => self.classes.iter().any(|k| k.as_str() == c),
            SelectorKind::Id(id) => self.id.as_ref().is_some_and(|i| i.as_str() == id),
            SelectorKind::Tag(t) => self.tag.eq_ignore_ascii_case(t),
        }
    }
}

/// The last programmatic scroll a behavior asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// In-memory document. Scrolling is applied immediately; the requested
/// behavior is only recorded, since animation belongs to a real host.
#[derive(Debug)]
pub struct MemoryDom<S = VirtualClock> {
    nodes: Vec<Node>,
    scroll_y: f64,
    last_scroll: Option<ScrollRequest>,
    scroll_dirty: bool,
    focused: Option<NodeId>,
    captures: HashMap<PointerId, NodeId>,
    timers: S,
}

impl MemoryDom<VirtualClock> {
    pub fn new() -> Self {
        Self::with_timers(VirtualClock::new())
    }
}

impl Default for MemoryDom<VirtualClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> MemoryDom<S> {
    pub fn with_timers(timers: S) -> Self {
        Self {
            nodes: vec![Node::from_spec(ElementSpec::new("body"), None)],
            scroll_y: 0.0,
            last_scroll: None,
            scroll_dirty: false,
            focused: None,
            captures: HashMap::new(),
            timers,
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    pub fn timers(&self) -> &S {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut S {
        &mut self.timers
    }

    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> Result<NodeId, HostError> {
        if self.node(parent).is_none() {
            return Err(HostError::UnknownNode(parent));
        }
        Ok(self.push_child(parent, spec))
    }

    pub fn set_width(&mut self, node: NodeId, width: f64) {
        if let Some(n) = self.node_mut(node) {
            n.width = width;
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    pub fn focus(&mut self, node: NodeId) {
        if self.node(node).is_some() {
            self.focused = Some(node);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn pointer_capture(&self, pointer: PointerId) -> Option<NodeId> {
        self.captures.get(&pointer).copied()
    }

    /// Sets the scroll offset as user scrolling would.
    pub fn set_scroll_y(&mut self, y: f64) {
        let y = y.max(0.0);
        if y != self.scroll_y {
            self.scroll_dirty = true;
        }
        self.scroll_y = y;
    }

    pub fn last_scroll_request(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    /// Whether the offset changed since the last call; a host fires a scroll
    /// event exactly when this is true.
    pub fn take_scroll_change(&mut self) -> bool {
        std::mem::take(&mut self.scroll_dirty)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn push_child(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::from_spec(spec, Some(parent)));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.body(), node)
    }
}

impl<S> Dom for MemoryDom<S> {
    fn query(&self, scope: Option<NodeId>, selector: &Selector) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn query_all(&self, scope: Option<NodeId>, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope.unwrap_or(self.body()))
            .into_iter()
            .filter(|&id| self.node(id).is_some_and(|n| n.matches(selector)))
            .collect()
    }

    fn element_by_id(&self, id: &ElementId) -> Option<NodeId> {
        self.query(None, &Selector::new(format!("#{id}")))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(n) = self.node(node) else {
            return String::new();
        };
        std::iter::once(n.text.as_str())
            .chain(
                self.descendants(node)
                    .into_iter()
                    .filter_map(|id| self.node(id))
                    .map(|d| d.text.as_str()),
            )
            .collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn create_element(&mut self, parent: NodeId, tag: &TagName) -> NodeId {
        self.push_child(parent, ElementSpec::new(tag.as_str()))
    }

    fn clear_children(&mut self, node: NodeId) {
        let Some(n) = self.node_mut(node) else {
            return;
        };
        for child in std::mem::take(&mut n.children) {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
        if self.focused.is_some_and(|f| !self.is_attached(f)) {
            self.focused = None;
        }
    }

    fn toggle_class(&mut self, node: NodeId, class: &ClassName, force: bool) {
        let Some(n) = self.node_mut(node) else {
            return;
        };
        let present = n.classes.iter().any(|c| c == class);
        match (present, force) {
            (false, true) => n.classes.push(class.clone()),
            (true, false) => n.classes.retain(|c| c != class),
            _ => {}
        }
    }

    fn has_class(&self, node: NodeId, class: &ClassName) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.style.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)?.style.get(property).cloned()
    }

    fn bounding_width(&self, node: NodeId) -> f64 {
        self.node(node).map(|n| n.width).unwrap_or_default()
    }

    fn set_pointer_capture(&mut self, node: NodeId, pointer: PointerId) {
        if self.node(node).is_some() {
            self.captures.insert(pointer, node);
        }
    }

    fn release_pointer_capture(&mut self, node: NodeId, pointer: PointerId) {
        if self.captures.get(&pointer) == Some(&node) {
            self.captures.remove(&pointer);
        }
    }
}

impl<S> Window for MemoryDom<S> {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.last_scroll = Some(ScrollRequest { top, behavior });
        self.set_scroll_y(top);
    }
}

impl<S: Scheduler> Scheduler for MemoryDom<S> {
    fn set_interval(&mut self, period: Duration) -> TimerId {
        self.timers.set_interval(period)
    }

    fn clear_interval(&mut self, id: TimerId) {
        self.timers.clear_interval(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MemoryDom, NodeId, Vec<NodeId>) {
        let mut dom = MemoryDom::new();
        let list = dom
            .append(dom.body(), ElementSpec::new("ul").class("list"))
            .unwrap();
        let items = ["Rust", "Go", "Zig"]
            .iter()
            .map(|t| {
                let li = dom
                    .append(list, ElementSpec::new("li").class("item").width(120.0))
                    .unwrap();
                dom.append(li, ElementSpec::new("span").text(t)).unwrap();
                li
            })
            .collect();
        (dom, list, items)
    }

    #[test]
    fn test_query_in_document_order() {
        let (dom, list, items) = sample();
        assert_eq!(dom.query(None, &Selector::from(".list")), Some(list));
        assert_eq!(dom.query_all(Some(list), &Selector::from(".item")), items);
        let span = dom.query(Some(items[1]), &Selector::from("SPAN")).unwrap();
        assert_eq!(dom.text_content(span), "Go");
        assert_eq!(dom.query(None, &Selector::from(".missing")), None);
    }

    #[test]
    fn test_text_content_includes_descendants() {
        let (dom, list, _) = sample();
        assert_eq!(dom.text_content(list), "RustGoZig");
    }

    #[test]
    fn test_contains_is_inclusive() {
        let (dom, list, items) = sample();
        assert!(dom.contains(list, list));
        assert!(dom.contains(list, items[2]));
        assert!(!dom.contains(items[0], list));
    }

    #[test]
    fn test_clear_children_detaches_subtree() {
        let (mut dom, list, items) = sample();
        dom.focus(items[0]);
        dom.clear_children(list);

        assert!(dom.children(list).is_empty());
        assert!(dom.query_all(None, &Selector::from(".item")).is_empty());
        assert_eq!(dom.focused(), None);
    }

    #[test]
    fn test_toggle_class_force() {
        let (mut dom, list, _) = sample();
        let active = ClassName::from("is-active");
        dom.toggle_class(list, &active, true);
        dom.toggle_class(list, &active, true);
        assert!(dom.has_class(list, &active));
        dom.toggle_class(list, &active, false);
        assert!(!dom.has_class(list, &active));
    }

    #[test]
    fn test_element_by_id() {
        let mut dom = MemoryDom::new();
        let btn = dom
            .append(dom.body(), ElementSpec::new("button").id("toTop"))
            .unwrap();
        assert_eq!(dom.element_by_id(&ElementId::from("toTop")), Some(btn));
        assert_eq!(dom.element_by_id(&ElementId::from("nope")), None);
    }

    #[test]
    fn test_append_to_unknown_parent_fails() {
        let mut dom = MemoryDom::new();
        assert!(matches!(
            dom.append(NodeId(42), ElementSpec::new("div")),
            Err(HostError::UnknownNode(NodeId(42)))
        ));
    }

    #[test]
    fn test_scroll_to_records_request() {
        let mut dom = MemoryDom::new();
        dom.set_scroll_y(800.0);
        assert!(dom.take_scroll_change());
        assert!(!dom.take_scroll_change());

        dom.scroll_to(0.0, ScrollBehavior::Smooth);
        assert_eq!(dom.scroll_y(), 0.0);
        assert!(dom.take_scroll_change());
        assert_eq!(
            dom.last_scroll_request(),
            Some(ScrollRequest {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn test_pointer_capture_release_only_by_owner() {
        let (mut dom, list, items) = sample();
        let pointer = PointerId(1);
        dom.set_pointer_capture(list, pointer);
        dom.release_pointer_capture(items[0], pointer);
        assert_eq!(dom.pointer_capture(pointer), Some(list));
        dom.release_pointer_capture(list, pointer);
        assert_eq!(dom.pointer_capture(pointer), None);
    }
}
