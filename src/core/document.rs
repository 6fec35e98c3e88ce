use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::sandbox::Resolution;
use crate::core::types::LayoutRect;
use crate::error::{DeckError, DeckResult};

/// Stable handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element payload: everything a page can observe or change on a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: SmallVec<[String; 4]>,
    pub attrs: IndexMap<String, String>,
    pub styles: IndexMap<String, String>,
    pub text: String,
    pub layout: Option<LayoutRect>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Sets a `data-*` attribute.
    #[must_use]
    pub fn with_data(self, key: &str, value: impl Into<String>) -> Self {
        self.with_attr(format!("data-{key}"), value)
    }

    #[must_use]
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutRect) -> Self {
        self.layout = Some(layout);
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|entry| entry == class)
    }

    pub(crate) fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_owned());
        true
    }

    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|entry| entry != class);
        before != self.classes.len()
    }
}

#[derive(Debug, Clone)]
struct NodeSlot {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
}

/// Deterministic, serializable view of a subtree.
///
/// Two snapshots serialize to identical JSON iff the subtrees are identical in
/// every observable property, which is what isolation tests compare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: IndexMap<String, String>,
    pub styles: IndexMap<String, String>,
    pub text: String,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn to_json(&self) -> DeckResult<String> {
        serde_json::to_string(self)
            .map_err(|e| DeckError::InvalidData(format!("failed to serialize node snapshot: {e}")))
    }
}

/// Arena-backed element tree owned by the host.
///
/// Nodes are never freed; detached subtrees stay in the arena but are
/// unreachable from the root and ignored by every query.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeSlot>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeSlot {
                element: Element::new("body"),
                parent: None,
                children: Vec::new(),
                attached: true,
            }],
            root: NodeId(0),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Appends `element` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> DeckResult<NodeId> {
        if !self.is_attached(parent) {
            return Err(DeckError::InvalidData(format!(
                "cannot append to detached or unknown node {}",
                parent.0
            )));
        }
        let node = NodeId(self.nodes.len());
        self.nodes.push(NodeSlot {
            element,
            parent: Some(parent),
            children: Vec::new(),
            attached: true,
        });
        self.nodes[parent.0].children.push(node);
        Ok(node)
    }

    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|slot| slot.attached)
    }

    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes
            .get(node.0)
            .filter(|slot| slot.attached)
            .map(|slot| &slot.element)
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes
            .get_mut(node.0)
            .filter(|slot| slot.attached)
            .map(|slot| &mut slot.element)
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|slot| slot.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.nodes.get(node.0) {
            Some(slot) if slot.attached => &slot.children,
            _ => &[],
        }
    }

    /// Returns `true` when `node` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        if !self.is_attached(node) || !self.is_attached(ancestor) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Pre-order traversal of the attached subtree rooted at `node`, including `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_attached(node) {
            return out;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|node| {
            self.element(*node)
                .and_then(|element| element.id.as_deref())
                .is_some_and(|candidate| candidate == id)
        })
    }

    /// Resolves a page container by id.
    ///
    /// Absence is an expected outcome (the page is not part of this document),
    /// so it is reported as [`Resolution::NotFound`] rather than an error.
    #[must_use]
    pub fn resolve_container(&self, id: &str) -> Resolution<NodeId> {
        match self.get_element_by_id(id) {
            Some(node) => Resolution::Found(node),
            None => Resolution::NotFound,
        }
    }

    /// Detaches every child subtree of `parent`; returns the number of direct
    /// children removed.
    pub(crate) fn detach_children(&mut self, parent: NodeId) -> usize {
        if !self.is_attached(parent) {
            return 0;
        }
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in &children {
            for node in self.descendants(*child) {
                self.nodes[node.0].attached = false;
            }
        }
        children.len()
    }

    #[must_use]
    pub fn snapshot(&self, node: NodeId) -> Option<NodeSnapshot> {
        let element = self.element(node)?;
        Some(NodeSnapshot {
            tag: element.tag.clone(),
            id: element.id.clone(),
            classes: element.classes.iter().cloned().collect(),
            attrs: element.attrs.clone(),
            styles: element.styles.clone(),
            text: element.text.clone(),
            children: self
                .children(node)
                .iter()
                .filter_map(|child| self.snapshot(*child))
                .collect(),
        })
    }
}
