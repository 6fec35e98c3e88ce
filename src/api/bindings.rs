use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{NodeId, PageKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Click,
    Hover,
}

/// Page-defined tag handed back with every event a binding produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionTag(pub u32);

/// Event bindings of every page, keyed by `(page, node, kind)`.
///
/// Binding the same key again replaces the previous action, so a page that
/// re-runs its initialization never ends up with a doubled handler.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: IndexMap<(PageKey, NodeId, BindingKind), ActionTag>,
}

impl BindingTable {
    /// Returns `true` when the key was not bound before.
    pub(crate) fn bind(
        &mut self,
        page: PageKey,
        node: NodeId,
        kind: BindingKind,
        action: ActionTag,
    ) -> bool {
        self.entries.insert((page, node, kind), action).is_none()
    }

    pub(crate) fn unbind(&mut self, page: PageKey, node: NodeId, kind: BindingKind) -> bool {
        self.entries.shift_remove(&(page, node, kind)).is_some()
    }

    pub(crate) fn remove_page(&mut self, page: PageKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(owner, _, _), _| *owner != page);
        before - self.entries.len()
    }

    #[must_use]
    pub fn lookup(&self, node: NodeId, kind: BindingKind) -> Option<(PageKey, ActionTag)> {
        self.entries
            .iter()
            .find(|((_, bound, bound_kind), _)| *bound == node && *bound_kind == kind)
            .map(|((page, _, _), action)| (*page, *action))
    }

    #[must_use]
    pub fn count_for(&self, page: PageKey) -> usize {
        self.entries
            .keys()
            .filter(|(owner, _, _)| *owner == page)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Document, Element};

    #[test]
    fn rebinding_replaces_action() {
        let mut document = Document::new();
        let root = document.root();
        let node = document.append(root, Element::new("button")).expect("append");

        let mut table = BindingTable::default();
        assert!(table.bind(PageKey(0), node, BindingKind::Click, ActionTag(1)));
        assert!(!table.bind(PageKey(0), node, BindingKind::Click, ActionTag(2)));

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(node, BindingKind::Click),
            Some((PageKey(0), ActionTag(2)))
        );
        assert_eq!(table.lookup(node, BindingKind::Hover), None);
    }

    #[test]
    fn removing_page_drops_only_its_bindings() {
        let mut document = Document::new();
        let root = document.root();
        let a = document.append(root, Element::new("div")).expect("append");
        let b = document.append(root, Element::new("div")).expect("append");

        let mut table = BindingTable::default();
        table.bind(PageKey(0), a, BindingKind::Click, ActionTag(0));
        table.bind(PageKey(0), a, BindingKind::Hover, ActionTag(0));
        table.bind(PageKey(1), b, BindingKind::Click, ActionTag(0));

        assert_eq!(table.remove_page(PageKey(0)), 2);
        assert_eq!(table.count_for(PageKey(1)), 1);
    }
}
