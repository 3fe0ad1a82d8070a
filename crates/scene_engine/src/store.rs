//! The scene store - single source of truth for editable scene state
//!
//! Every mutation goes through this type so history snapshots, selection
//! pruning, connector referential integrity, and change notification stay
//! consistent. All operations are synchronous and atomic from the
//! caller's perspective; there is no parallel mutation path.

use crate::{
    History, SceneEvent, SceneSnapshot, SpawnAnimations, Subscribers, SubscriptionId,
    SPAWN_SCALE_START, SPAWN_SCALE_STEP,
};
use chrono::Utc;
use glam::Vec3;
use rand::Rng;
use scene_model::{
    Connector, ConnectorId, GeometryKind, GridSettings, Material, MaterialRegistry,
    NodeId, NodeProperties, NotificationQueue, SceneNode, Selection, Severity,
    unordered_pair, DEFAULT_MATERIAL,
};

/// Half-extent of the random placement cube used when `add_node` is
/// called without a position
const RANDOM_PLACEMENT_EXTENT: f32 = 5.0;

/// Authoritative mutable scene state
pub struct SceneStore {
    nodes: Vec<SceneNode>,
    connectors: Vec<Connector>,
    selection: Selection,
    materials: MaterialRegistry,
    grid: GridSettings,
    notifications: NotificationQueue,
    history: History,
    connection_mode: bool,
    pending_connection: Option<NodeId>,
    animations: SpawnAnimations,
    subscribers: Subscribers,
}

impl SceneStore {
    /// Create an empty scene with the default material set
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            connectors: Vec::new(),
            selection: Selection::new(),
            materials: MaterialRegistry::with_defaults(),
            grid: GridSettings::default(),
            notifications: NotificationQueue::new(),
            history: History::new(),
            connection_mode: false,
            pending_connection: None,
            animations: SpawnAnimations::new(),
            subscribers: Subscribers::new(),
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn connector(&self, id: &ConnectorId) -> Option<&Connector> {
        self.connectors.iter().find(|c| &c.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn grid(&self) -> GridSettings {
        self.grid
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn connection_mode(&self) -> bool {
        self.connection_mode
    }

    pub fn pending_connection(&self) -> Option<NodeId> {
        self.pending_connection
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(&self.nodes, &self.connectors)
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ------------------------------------------------------------------
    // Node mutation
    // ------------------------------------------------------------------

    /// Add a node, snapshotting history before the mutation so the
    /// pre-add state is the undo target. Without an explicit position the
    /// node lands at a random point near the origin.
    pub fn add_node(
        &mut self,
        position: Option<Vec3>,
        material: Option<&str>,
        animated: bool,
    ) -> NodeId {
        self.save_to_history();
        let position = position.unwrap_or_else(random_position);
        let id = self.spawn_node(position, material, animated);
        tracing::debug!(node = %id, "added node");
        self.subscribers.emit(SceneEvent::NodesChanged);
        id
    }

    /// Add a node with an explicit geometry kind and property bag
    pub fn add_advanced_node(
        &mut self,
        position: Vec3,
        material: Option<&str>,
        kind: GeometryKind,
        properties: NodeProperties,
        animated: bool,
    ) -> NodeId {
        self.save_to_history();
        let mut node = SceneNode::with_shape(
            position,
            material.unwrap_or(DEFAULT_MATERIAL),
            kind,
            properties,
        );
        if animated {
            node.spawn_scale = SPAWN_SCALE_START;
            self.animations.begin(node.id);
        }
        let id = node.id;
        self.nodes.push(node);
        self.subscribers.emit(SceneEvent::NodesChanged);
        id
    }

    /// Insert a node without touching history. Used by bulk command
    /// handlers, which snapshot once for the whole command.
    pub(crate) fn spawn_node(
        &mut self,
        position: Vec3,
        material: Option<&str>,
        animated: bool,
    ) -> NodeId {
        let mut node = SceneNode::new(position, material.unwrap_or(DEFAULT_MATERIAL));
        if animated {
            node.spawn_scale = SPAWN_SCALE_START;
            self.animations.begin(node.id);
        }
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// In-place position update. Deliberately does NOT snapshot history:
    /// this is called at high frequency during drags, and the caller
    /// snapshots once at drag start instead.
    pub fn set_node_position(&mut self, id: NodeId, position: Vec3) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.position = position;
            self.subscribers.emit(SceneEvent::NodesChanged);
        }
    }

    /// In-place scale update; no history snapshot (see `set_node_position`)
    pub fn set_node_scale(&mut self, id: NodeId, scale: Vec3) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.scale = scale;
            self.subscribers.emit(SceneEvent::NodesChanged);
        }
    }

    /// In-place rotation update; no history snapshot (see `set_node_position`)
    pub fn set_node_rotation(&mut self, id: NodeId, rotation: Vec3) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.rotation = rotation;
            self.subscribers.emit(SceneEvent::NodesChanged);
        }
    }

    /// Assign a material by name; snapshots history and notifies
    pub fn set_node_material(&mut self, id: NodeId, material: &str) {
        if self.node(id).is_none() {
            return;
        }
        self.save_to_history();
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.material = material.to_string();
        }
        self.notify(format!("Material set to {material}"), Severity::Success);
        self.subscribers.emit(SceneEvent::NodesChanged);
    }

    /// Merge a property patch into a node's bag; snapshots history
    pub fn set_node_properties(&mut self, id: NodeId, patch: &NodeProperties) {
        if self.node(id).is_none() {
            return;
        }
        self.save_to_history();
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.properties.merge(patch);
        }
        self.subscribers.emit(SceneEvent::NodesChanged);
    }

    /// Delete nodes and cascade to any connector touching them.
    ///
    /// Deletion always clears the whole selection, even for ids that
    /// were not in the deleted set.
    pub fn delete_nodes(&mut self, ids: &[NodeId]) {
        self.save_to_history();
        self.remove_nodes(ids);
        tracing::debug!(count = ids.len(), "deleted nodes");
        self.subscribers.emit(SceneEvent::NodesChanged);
        self.subscribers.emit(SceneEvent::ConnectorsChanged);
        self.subscribers.emit(SceneEvent::SelectionChanged);
    }

    /// Delete without a history snapshot; shared by `delete_nodes` and
    /// the command layer
    pub(crate) fn remove_nodes(&mut self, ids: &[NodeId]) {
        self.nodes.retain(|n| !ids.contains(&n.id));
        self.connectors
            .retain(|c| ids.iter().all(|&id| !c.touches(id)));
        self.selection.clear();
        for &id in ids {
            self.animations.cancel(id);
        }
    }

    // ------------------------------------------------------------------
    // Selection and connection mode
    // ------------------------------------------------------------------

    /// Select a node, or - while connection mode is active - pick it as a
    /// connector endpoint instead. The first pick records the pending
    /// endpoint; a second pick on a different node creates the connector
    /// and leaves connection mode.
    pub fn select_node(&mut self, id: NodeId, multi_select: bool) {
        if self.node(id).is_none() {
            return;
        }
        if self.connection_mode {
            match self.pending_connection {
                None => self.pending_connection = Some(id),
                Some(first) if first != id => {
                    self.add_connector(first, id);
                    self.pending_connection = None;
                    self.connection_mode = false;
                }
                Some(_) => {}
            }
            return;
        }
        if multi_select {
            self.selection.toggle(id);
        } else {
            self.selection.replace_with(id);
        }
        self.subscribers.emit(SceneEvent::SelectionChanged);
    }

    /// Select every current node, in node array order
    pub fn select_all(&mut self) {
        let ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        self.selection.replace_all(ids);
        self.subscribers.emit(SceneEvent::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.subscribers.emit(SceneEvent::SelectionChanged);
    }

    /// Toggle connection mode; leaving it discards any pending endpoint
    pub fn set_connection_mode(&mut self, active: bool) {
        self.connection_mode = active;
        if !active {
            self.pending_connection = None;
        }
    }

    // ------------------------------------------------------------------
    // Connectors
    // ------------------------------------------------------------------

    /// Create a connector between two existing nodes.
    ///
    /// Silently rejects (returns `None`) when either endpoint is missing
    /// or a connector already exists for the unordered pair; these are
    /// expected races with the UI, not errors.
    pub fn add_connector(&mut self, start: NodeId, end: NodeId) -> Option<ConnectorId> {
        if self.node(start).is_none() || self.node(end).is_none() {
            tracing::debug!("rejected connector with missing endpoint");
            return None;
        }
        if self.has_connector_between(start, end) {
            tracing::debug!("rejected duplicate connector");
            return None;
        }
        self.save_to_history();
        let id = self.insert_connector(start, end)?;
        self.subscribers.emit(SceneEvent::ConnectorsChanged);
        Some(id)
    }

    /// Insert without a history snapshot; shared by `add_connector` and
    /// the bulk command handlers. Still enforces existence and dedup.
    pub(crate) fn insert_connector(&mut self, start: NodeId, end: NodeId) -> Option<ConnectorId> {
        if self.node(start).is_none() || self.node(end).is_none() {
            return None;
        }
        if self.has_connector_between(start, end) {
            return None;
        }
        let connector = Connector::new(start, end);
        let id = connector.id.clone();
        self.connectors.push(connector);
        Some(id)
    }

    /// Remove a connector explicitly
    pub fn remove_connector(&mut self, id: &ConnectorId) {
        if self.connector(id).is_none() {
            return;
        }
        self.save_to_history();
        self.connectors.retain(|c| &c.id != id);
        self.subscribers.emit(SceneEvent::ConnectorsChanged);
    }

    /// Whether any connector joins the unordered endpoint pair
    pub fn has_connector_between(&self, a: NodeId, b: NodeId) -> bool {
        let key = unordered_pair(a, b);
        self.connectors.iter().any(|c| c.pair_key() == key)
    }

    // ------------------------------------------------------------------
    // Grid and materials
    // ------------------------------------------------------------------

    /// Round a position to the grid when snapping is enabled; identity
    /// otherwise. Deterministic and idempotent, no side effects.
    pub fn snap_position(&self, position: Vec3) -> Vec3 {
        if !self.grid.snap_to_grid || self.grid.grid_size <= 0.0 {
            return position;
        }
        let size = self.grid.grid_size;
        (position / size).round() * size
    }

    pub fn set_grid_settings(&mut self, grid: GridSettings) {
        self.grid = grid;
        self.subscribers.emit(SceneEvent::GridChanged);
    }

    /// Insert or replace a named material; the edit propagates to every
    /// node referencing the name
    pub fn set_material(&mut self, name: &str, material: Material) {
        self.materials.set(name, material);
        self.subscribers.emit(SceneEvent::MaterialsChanged);
    }

    /// Replace the whole material registry (project import)
    pub fn replace_materials(&mut self, materials: MaterialRegistry) {
        self.materials = materials;
        self.subscribers.emit(SceneEvent::MaterialsChanged);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Deep-copy the current nodes/connectors into the history stack.
    ///
    /// Called by every history-tracked mutation before it mutates, and by
    /// drag gestures once at drag start.
    pub fn save_to_history(&mut self) {
        self.history.record(&self.nodes, &self.connectors);
    }

    /// Step back one snapshot. Selection is cleared, not restored.
    pub fn undo(&mut self) -> bool {
        let restored = self.history.undo(&self.nodes, &self.connectors);
        self.apply_snapshot(restored)
    }

    /// Step forward one snapshot. Selection is cleared, not restored.
    pub fn redo(&mut self) -> bool {
        let restored = self.history.redo();
        self.apply_snapshot(restored)
    }

    fn apply_snapshot(&mut self, snapshot: Option<SceneSnapshot>) -> bool {
        let Some(snapshot) = snapshot else {
            return false;
        };
        self.nodes = snapshot.nodes;
        self.connectors = snapshot.connectors;
        self.selection.clear();
        self.animations.retain(|_| false);
        self.subscribers.emit(SceneEvent::HistoryRestored);
        self.subscribers.emit(SceneEvent::NodesChanged);
        self.subscribers.emit(SceneEvent::ConnectorsChanged);
        self.subscribers.emit(SceneEvent::SelectionChanged);
        true
    }

    // ------------------------------------------------------------------
    // Bulk replace (project import / clear)
    // ------------------------------------------------------------------

    /// History-snapshotted bulk replace of the scene contents, used by
    /// project import
    pub fn replace_scene(&mut self, nodes: Vec<SceneNode>, connectors: Vec<Connector>) {
        self.save_to_history();
        self.nodes = nodes;
        // drop any connector that references a node not in the new set
        self.connectors = connectors
            .into_iter()
            .filter(|c| {
                self.nodes.iter().any(|n| n.id == c.start_node_id)
                    && self.nodes.iter().any(|n| n.id == c.end_node_id)
            })
            .collect();
        self.selection.clear();
        self.animations.retain(|_| false);
        self.subscribers.emit(SceneEvent::NodesChanged);
        self.subscribers.emit(SceneEvent::ConnectorsChanged);
        self.subscribers.emit(SceneEvent::SelectionChanged);
    }

    /// Wipe nodes, connectors, and selection (history-snapshotted)
    pub fn clear_scene(&mut self) {
        self.save_to_history();
        self.wipe_scene();
        self.subscribers.emit(SceneEvent::NodesChanged);
        self.subscribers.emit(SceneEvent::ConnectorsChanged);
        self.subscribers.emit(SceneEvent::SelectionChanged);
    }

    /// Wipe without a history snapshot; shared with the command layer
    pub(crate) fn wipe_scene(&mut self) {
        self.nodes.clear();
        self.connectors.clear();
        self.selection.clear();
        self.animations.retain(|_| false);
    }

    // ------------------------------------------------------------------
    // Notifications and ticking
    // ------------------------------------------------------------------

    /// Push a transient notification
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.notifications.push(message, severity);
        self.subscribers.emit(SceneEvent::NotificationPushed);
        id
    }

    /// Advance every spawn animation one frame.
    ///
    /// Entries whose node no longer exists are dropped silently; the
    /// effect never blocks other store operations. Returns the number of
    /// nodes still animating.
    pub fn tick_animations(&mut self) -> usize {
        let ids: Vec<NodeId> = self.animations.active().to_vec();
        let mut still_active = 0;
        for id in ids {
            match self.nodes.iter_mut().find(|n| n.id == id) {
                Some(node) => {
                    node.spawn_scale = (node.spawn_scale + SPAWN_SCALE_STEP).min(1.0);
                    if node.spawn_scale >= 1.0 {
                        self.animations.cancel(id);
                    } else {
                        still_active += 1;
                    }
                }
                // deleted mid-animation: stop tracking it
                None => self.animations.cancel(id),
            }
        }
        if still_active > 0 {
            self.subscribers.emit(SceneEvent::NodesChanged);
        }
        still_active
    }

    /// Drop expired notifications; call from the frame loop
    pub fn tick_notifications(&mut self) {
        self.notifications.purge_expired(Utc::now());
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    pub fn subscribe(&mut self, callback: impl Fn(SceneEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Assert the structural invariants the rest of the system relies
    /// on. Used by tests after every mutation.
    pub fn assert_invariants(&self) {
        // node ids are unique
        for (i, node) in self.nodes.iter().enumerate() {
            assert!(
                !self.nodes[i + 1..].iter().any(|other| other.id == node.id),
                "duplicate node id {}",
                node.id
            );
        }
        // connectors resolve to live nodes and pairs are unique
        for (i, connector) in self.connectors.iter().enumerate() {
            assert!(
                self.node(connector.start_node_id).is_some()
                    && self.node(connector.end_node_id).is_some(),
                "dangling connector {}",
                connector.id
            );
            assert!(
                !self.connectors[i + 1..]
                    .iter()
                    .any(|other| other.pair_key() == connector.pair_key()),
                "duplicate connector pair {}",
                connector.id
            );
        }
        // selection only references live nodes
        for &id in self.selection.ids() {
            assert!(self.node(id).is_some(), "stale selection id {id}");
        }
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

fn random_position() -> Vec3 {
    let mut rng = rand::thread_rng();
    let mut coord = || (rng.gen::<f32>() - 0.5) * 2.0 * RANDOM_PLACEMENT_EXTENT;
    Vec3::new(coord(), coord(), coord())
}
