use std::fmt;

use tracing::warn;

use crate::core::document::{Document, Element, NodeId, NodeSnapshot};

/// Outcome of looking something up that is allowed to be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<T> {
    Found(T),
    NotFound,
}

impl<T> Resolution<T> {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

/// A required element that a page could not find inside its container.
///
/// Returned from `PageController::mount` to abort initialization silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Missing {
    pub what: String,
}

impl Missing {
    #[must_use]
    pub fn element(what: impl Into<String>) -> Self {
        Self { what: what.into() }
    }
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required element `{}`", self.what)
    }
}

pub type Mounted = Result<(), Missing>;

/// Mutable view of a document restricted to one page container subtree.
///
/// Every query searches only below the root, and every mutation checks that
/// its target lies inside the subtree. Out-of-subtree mutations are refused
/// and logged; they never reach the document.
pub struct Sandbox<'a> {
    document: &'a mut Document,
    root: NodeId,
}

impl<'a> Sandbox<'a> {
    pub(crate) fn new(document: &'a mut Document, root: NodeId) -> Self {
        Self { document, root }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.document.is_within(node, self.root)
    }

    fn guard(&self, node: NodeId, op: &'static str) -> bool {
        if self.contains(node) {
            return true;
        }
        warn!(
            op,
            node = node.index(),
            root = self.root.index(),
            "refusing sandbox mutation outside page container"
        );
        false
    }

    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        if !self.contains(node) {
            return None;
        }
        self.document.element(node)
    }

    #[must_use]
    pub fn find_id(&self, id: &str) -> Option<NodeId> {
        self.document.descendants(self.root).into_iter().find(|node| {
            self.document
                .element(*node)
                .and_then(|element| element.id.as_deref())
                .is_some_and(|candidate| candidate == id)
        })
    }

    pub fn require_id(&self, id: &str) -> Result<NodeId, Missing> {
        self.find_id(id)
            .ok_or_else(|| Missing::element(format!("#{id}")))
    }

    /// All nodes carrying `class` below (and including) `scope`, in document order.
    #[must_use]
    pub fn find_class_in(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        if !self.contains(scope) {
            return Vec::new();
        }
        self.document
            .descendants(scope)
            .into_iter()
            .filter(|node| {
                self.document
                    .element(*node)
                    .is_some_and(|element| element.has_class(class))
            })
            .collect()
    }

    #[must_use]
    pub fn find_class(&self, class: &str) -> Vec<NodeId> {
        self.find_class_in(self.root, class)
    }

    #[must_use]
    pub fn first_class_in(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.find_class_in(scope, class).into_iter().next()
    }

    /// Like [`Self::find_class`] but treats an empty result as missing.
    pub fn require_class(&self, class: &str) -> Result<Vec<NodeId>, Missing> {
        let nodes = self.find_class(class);
        if nodes.is_empty() {
            return Err(Missing::element(format!(".{class}")));
        }
        Ok(nodes)
    }

    pub fn require_class_in(&self, scope: NodeId, class: &str) -> Result<NodeId, Missing> {
        self.first_class_in(scope, class)
            .ok_or_else(|| Missing::element(format!(".{class}")))
    }

    /// Nearest inclusive ancestor of `node` carrying `class`, never leaving the container.
    #[must_use]
    pub fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        if !self.contains(node) {
            return None;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self
                .document
                .element(current)
                .is_some_and(|element| element.has_class(class))
            {
                return Some(current);
            }
            if current == self.root {
                return None;
            }
            cursor = self.document.parent(current);
        }
        None
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        self.document.children(node).to_vec()
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.has_class(class))
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.text.as_str())
    }

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    /// Reads a `data-*` attribute.
    #[must_use]
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attr(node, &format!("data-{key}"))
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.styles.get(property))
            .map(String::as_str)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> bool {
        if !self.guard(node, "add_class") {
            return false;
        }
        self.document
            .element_mut(node)
            .is_some_and(|element| element.add_class(class))
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> bool {
        if !self.guard(node, "remove_class") {
            return false;
        }
        self.document
            .element_mut(node)
            .is_some_and(|element| element.remove_class(class))
    }

    /// Sets or clears `class` on `node` according to `on`.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) -> bool {
        if on {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> bool {
        if !self.guard(node, "set_text") {
            return false;
        }
        match self.document.element_mut(node) {
            Some(element) => {
                element.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        if !self.guard(node, "set_attr") {
            return false;
        }
        match self.document.element_mut(node) {
            Some(element) => {
                element.attrs.insert(name.to_owned(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) -> bool {
        if !self.guard(node, "set_style") {
            return false;
        }
        match self.document.element_mut(node) {
            Some(element) => {
                element.styles.insert(property.to_owned(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) -> bool {
        if !self.guard(node, "remove_style") {
            return false;
        }
        self.document
            .element_mut(node)
            .is_some_and(|element| element.styles.shift_remove(property).is_some())
    }

    /// Appends a synthesized child under `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        if !self.guard(parent, "append") {
            return None;
        }
        self.document.append(parent, element).ok()
    }

    /// Removes every child of `parent`; returns how many direct children were removed.
    pub fn clear_children(&mut self, parent: NodeId) -> usize {
        if !self.guard(parent, "clear_children") {
            return 0;
        }
        self.document.detach_children(parent)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<NodeSnapshot> {
        self.document.snapshot(self.root)
    }
}
