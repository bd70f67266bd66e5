//! Open directives and continuation lookup.
//!
//! Every opened directive gets an entry that lives until its end fence is
//! found or its outer directive closes. An entry whose end has not been seen
//! when the host runs out of blocks is *hungry*: it waits for the host to
//! offer more blocks under its parent element. Hungry entries are indexed by
//! parent node, at most one per parent.

use std::collections::{BTreeMap, HashMap};

use rw_blocks::{Document, NodeId};

use crate::fence::Level;
use crate::kind::Directive;

/// Identifier of an open directive, increasing in opening order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EntryId(usize);

/// An opened directive.
pub(crate) struct OpenDirective {
    pub(crate) directive: Box<dyn Directive>,
    /// Element returned by `create`.
    pub(crate) root: NodeId,
    /// Element the directive was opened under.
    pub(crate) parent: NodeId,
    /// Directive that was dispatching content when this one opened.
    pub(crate) outer: Option<EntryId>,
    /// Start fence length.
    pub(crate) length: usize,
    /// Whether start fences in the content open nested directives.
    pub(crate) nests: bool,
}

struct Slot {
    open: OpenDirective,
    /// One more than the number of directives this one is nested in.
    depth: usize,
    /// Entries opened inside this one.
    inner: Vec<EntryId>,
}

/// Open directives of one document.
#[derive(Default)]
pub(crate) struct OpenStack {
    entries: BTreeMap<EntryId, Slot>,
    hungry: HashMap<NodeId, EntryId>,
    next: usize,
}

impl OpenStack {
    pub(crate) fn push(&mut self, open: OpenDirective) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        let depth = match open.outer.and_then(|outer| self.entries.get_mut(&outer)) {
            Some(outer) => {
                outer.inner.push(id);
                outer.depth + 1
            }
            None => 1,
        };
        self.entries.insert(
            id,
            Slot {
                open,
                depth,
                inner: Vec::new(),
            },
        );
        id
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut OpenDirective> {
        self.entries.get_mut(&id).map(|slot| &mut slot.open)
    }

    /// Nesting depth of an entry; `0` outside any directive.
    pub(crate) fn depth(&self, id: Option<EntryId>) -> usize {
        id.and_then(|id| self.entries.get(&id)).map_or(0, |slot| slot.depth)
    }

    /// Mark an entry as waiting for more content under its parent.
    ///
    /// # Panics
    ///
    /// Panics if another entry is already hungry under the same parent.
    pub(crate) fn set_hungry(&mut self, id: EntryId) {
        let Some(parent) = self.entries.get(&id).map(|slot| slot.open.parent) else {
            return;
        };
        let previous = self.hungry.insert(parent, id);
        assert!(
            previous.is_none_or(|p| p == id),
            "two hungry directives under one parent"
        );
    }

    /// Mark an entry as receiving content.
    pub(crate) fn set_active(&mut self, id: EntryId) {
        self.hungry.retain(|_, entry| *entry != id);
    }

    /// Find the hungry entry for blocks offered under `parent`.
    ///
    /// Walks from `parent` down the chain of last children; the first node
    /// with a hungry entry wins.
    pub(crate) fn resolve(&self, doc: &Document, parent: NodeId) -> Option<EntryId> {
        if self.hungry.is_empty() {
            return None;
        }
        let mut node = Some(parent);
        while let Some(current) = node {
            if let Some(&id) = self.hungry.get(&current) {
                return Some(id);
            }
            node = doc.last_child(current);
        }
        None
    }

    /// Close an entry together with every entry opened inside it.
    pub(crate) fn close(&mut self, id: EntryId) {
        let closing = self.subtree(id);
        if let Some(outer) = self.entries.get(&id).and_then(|slot| slot.open.outer)
            && let Some(outer) = self.entries.get_mut(&outer)
        {
            outer.inner.retain(|&inner| inner != id);
        }
        for entry in &closing {
            self.entries.remove(entry);
        }
        if !self.hungry.is_empty() {
            self.hungry.retain(|_, entry| !closing.contains(entry));
        }
        tracing::trace!(closed = closing.len(), open = self.entries.len(), "Closed directive");
    }

    /// Nesting levels of the still-open entries inside `id`, outermost first.
    pub(crate) fn nested_levels(&self, id: EntryId) -> Vec<Level> {
        let mut inside = self.subtree(id);
        inside.sort_unstable();
        inside
            .iter()
            .filter(|&&other| other != id)
            .filter_map(|other| self.entries.get(other))
            .map(|slot| Level {
                length: slot.open.length,
                nests: slot.open.nests,
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.hungry.clear();
        self.next = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// `id` followed by every entry opened inside it, breadth first.
    fn subtree(&self, id: EntryId) -> Vec<EntryId> {
        let mut found = vec![id];
        let mut next = 0;
        while let Some(&current) = found.get(next) {
            if let Some(slot) = self.entries.get(&current) {
                found.extend_from_slice(&slot.inner);
            }
            next += 1;
        }
        found
    }
}
