use crate::timer::Scheduler;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumString};

/// Handle to an element owned by a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
#[display("#{_0}")]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct PointerId(pub i32);

/// A single simple selector: `.class`, `#id` or a bare tag name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Selector(String);

crate::impl_string_newtype!(Selector);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind<'a> {
    Class(&'a str),
    Id(&'a str),
    Tag(&'a str),
}

impl Selector {
    pub fn kind(&self) -> SelectorKind<'_> {
        let s = self.0.trim();
        if let Some(class) = s.strip_prefix('.') {
            SelectorKind::Class(class)
        } else if let Some(id) = s.strip_prefix('#') {
            SelectorKind::Id(id)
        } else {
            SelectorKind::Tag(s)
        }
    }

    /// The class a `.class` selector matches, used when building documents
    /// that must satisfy a configured selector.
    pub fn class_name(&self) -> Option<ClassName> {
        match self.kind() {
            SelectorKind::Class(c) if !c.is_empty() => Some(ClassName::new(c)),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ClassName(String);

crate::impl_string_newtype!(ClassName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ElementId(String);

crate::impl_string_newtype!(ElementId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct TagName(String);

crate::impl_string_newtype!(TagName);

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Instant,
    Smooth,
}

/// Element access a page behavior needs. Operations on unknown nodes are
/// no-ops (or return empty values) rather than errors.
pub trait Dom {
    /// First match in document order below `scope` (or the whole document).
    fn query(&self, scope: Option<NodeId>, selector: &Selector) -> Option<NodeId>;
    fn query_all(&self, scope: Option<NodeId>, selector: &Selector) -> Vec<NodeId>;
    fn element_by_id(&self, id: &ElementId) -> Option<NodeId>;
    /// Inclusive: a node contains itself.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
    fn text_content(&self, node: NodeId) -> String;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    /// Creates an element and appends it as the last child of `parent`.
    fn create_element(&mut self, parent: NodeId, tag: &TagName) -> NodeId;
    fn clear_children(&mut self, node: NodeId);
    fn toggle_class(&mut self, node: NodeId, class: &ClassName, force: bool);
    fn has_class(&self, node: NodeId, class: &ClassName) -> bool;
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);
    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    fn bounding_width(&self, node: NodeId) -> f64;
    fn set_pointer_capture(&mut self, node: NodeId, pointer: PointerId);
    fn release_pointer_capture(&mut self, node: NodeId, pointer: PointerId);
}

pub trait Window {
    fn scroll_y(&self) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

pub trait Host: Dom + Window + Scheduler {}

impl<T: Dom + Window + Scheduler> Host for T {}
