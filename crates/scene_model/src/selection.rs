//! Selection model - ordered set of selected nodes
//!
//! Order matters: range-select and "last selected" semantics depend on
//! the sequence in which nodes were picked.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// An ordered set of selected node ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in pick order
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// The most recently selected id, if any
    pub fn last(&self) -> Option<NodeId> {
        self.ids.last().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Replace the whole selection with exactly one id
    pub fn replace_with(&mut self, id: NodeId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with the given ids, preserving their order
    pub fn replace_all(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Toggle membership of an id (multi-select click)
    pub fn toggle(&mut self, id: NodeId) {
        if let Some(pos) = self.ids.iter().position(|&existing| existing == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer satisfy the predicate (stale-id pruning)
    pub fn retain(&mut self, mut exists: impl FnMut(NodeId) -> bool) {
        self.ids.retain(|&id| exists(id));
    }
}
