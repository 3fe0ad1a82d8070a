//! Undo/redo history as a bounded stack of deep snapshots

use chrono::{DateTime, Utc};
use scene_model::{Connector, SceneNode};
use serde::{Deserialize, Serialize};

/// Maximum number of retained snapshots; exceeding the cap silently
/// evicts the oldest entry
pub const MAX_HISTORY: usize = 50;

/// An immutable deep copy of the undoable scene state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub nodes: Vec<SceneNode>,
    pub connectors: Vec<Connector>,
    pub timestamp: DateTime<Utc>,
}

impl SceneSnapshot {
    fn capture(nodes: &[SceneNode], connectors: &[Connector]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            connectors: connectors.to_vec(),
            timestamp: Utc::now(),
        }
    }

    /// Whether this snapshot holds exactly the given live state
    /// (timestamps are not part of the comparison)
    fn matches(&self, nodes: &[SceneNode], connectors: &[Connector]) -> bool {
        self.nodes == nodes && self.connectors == connectors
    }
}

/// Linear undo history with a cursor.
///
/// Mutations record the pre-mutation state; the cursor tracks the
/// snapshot the live state was last restored from. Recording after an
/// undo truncates the redo branch (classic linear undo, no branching).
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<SceneSnapshot>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Record the current (pre-mutation) state.
    ///
    /// Truncates any redo branch beyond the cursor. When the live state
    /// still equals the cursor snapshot (the mutation directly follows
    /// an undo/redo restore), the duplicate append is skipped.
    pub fn record(&mut self, nodes: &[SceneNode], connectors: &[Connector]) {
        if let Some(cursor) = self.cursor {
            self.snapshots.truncate(cursor + 1);
            if self.snapshots[cursor].matches(nodes, connectors) {
                return;
            }
        }
        self.snapshots.push(SceneSnapshot::capture(nodes, connectors));
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step back one snapshot, returning the state to restore.
    ///
    /// When the live state sits past the newest snapshot (the normal
    /// case right after a mutation), it is stashed on top first so a
    /// following redo can return to it. Restores never re-append.
    pub fn undo(&mut self, nodes: &[SceneNode], connectors: &[Connector]) -> Option<SceneSnapshot> {
        let mut cursor = self.cursor?;
        if !self.snapshots[cursor].matches(nodes, connectors) {
            if cursor == self.snapshots.len() - 1 {
                self.snapshots.push(SceneSnapshot::capture(nodes, connectors));
                if self.snapshots.len() > MAX_HISTORY {
                    self.snapshots.remove(0);
                    cursor -= 1;
                    self.cursor = Some(cursor);
                }
            }
            return Some(self.snapshots[cursor].clone());
        }
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        Some(self.snapshots[cursor - 1].clone())
    }

    /// Step forward one snapshot, returning the state to restore
    pub fn redo(&mut self) -> Option<SceneSnapshot> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        Some(self.snapshots[cursor + 1].clone())
    }

    pub fn can_undo(&self, nodes: &[SceneNode], connectors: &[Connector]) -> bool {
        match self.cursor {
            None => false,
            Some(cursor) => cursor > 0 || !self.snapshots[cursor].matches(nodes, connectors),
        }
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.snapshots.len())
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn node_at(x: f32) -> SceneNode {
        SceneNode::new(Vec3::new(x, 0.0, 0.0), "default")
    }

    #[test]
    fn test_empty_history_cannot_undo_or_redo() {
        let mut history = History::new();
        assert!(history.undo(&[], &[]).is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_restores_pre_mutation_state() {
        let mut history = History::new();
        let before: Vec<SceneNode> = vec![];
        history.record(&before, &[]);
        let after = vec![node_at(1.0)];

        let restored = history.undo(&after, &[]).unwrap();
        assert!(restored.nodes.is_empty());
        // redo returns to the mutated state
        let redone = history.redo().unwrap();
        assert_eq!(redone.nodes, after);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new();
        history.record(&[], &[]);
        let live = vec![node_at(1.0)];
        let undone = history.undo(&live, &[]).unwrap();
        let redone = history.redo().unwrap();
        assert_eq!(redone.nodes, live);
        assert_ne!(undone.nodes, redone.nodes);
    }

    #[test]
    fn test_record_after_undo_truncates_redo_branch() {
        let mut history = History::new();
        history.record(&[], &[]);
        let v1 = vec![node_at(1.0)];
        let restored = history.undo(&v1, &[]).unwrap();
        assert!(history.can_redo());

        // new mutation from the restored state
        history.record(&restored.nodes, &restored.connectors);
        assert!(!history.can_redo());
        let v2 = vec![node_at(2.0)];
        let undone = history.undo(&v2, &[]).unwrap();
        assert!(undone.nodes.is_empty());
        assert_eq!(history.redo().unwrap().nodes, v2);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY + 20) {
            let state = vec![node_at(i as f32)];
            history.record(&state, &[]);
        }
        assert_eq!(history.len(), MAX_HISTORY);
    }

    #[test]
    fn test_undo_chain_walks_back_through_states() {
        let mut history = History::new();
        let s0: Vec<SceneNode> = vec![];
        let s1 = vec![node_at(1.0)];
        let s2 = vec![node_at(1.0), node_at(2.0)];
        history.record(&s0, &[]);
        history.record(&s1, &[]);

        // live is s2
        assert_eq!(history.undo(&s2, &[]).unwrap().nodes, s1);
        assert_eq!(history.undo(&s1, &[]).unwrap().nodes, s0);
        assert!(history.undo(&s0, &[]).is_none());
        assert_eq!(history.redo().unwrap().nodes, s1);
        assert_eq!(history.redo().unwrap().nodes, s2);
        assert!(history.redo().is_none());
    }
}
