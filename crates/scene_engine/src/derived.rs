//! Derived-geometry entry points
//!
//! The rendering layer calls these on demand with the current scene
//! state; they resolve node references, reject anything dangling, and
//! delegate to the pure algorithms in `geometry`. Nothing here is
//! cached: the results are pure values of the current node positions
//! and the explicit parameters, and memoization is the caller's concern.

use crate::SceneStore;
use geometry::{
    build_surface, route_connector, subdivision_surface, ConnectorPath, MeshData,
    SubdivisionScheme, SurfaceMethod,
};
use glam::Vec3;
use scene_model::{ConnectorId, NodeId};

impl SceneStore {
    /// Route a connector's renderable path.
    ///
    /// Returns `None` when the connector is unknown or either endpoint
    /// node no longer exists (an invalid connector produces no geometry
    /// rather than a guessed fallback). Every other node's position is
    /// passed as an obstacle for collision-avoiding straight routes.
    pub fn connector_path(&self, id: &ConnectorId) -> Option<ConnectorPath> {
        let connector = self.connector(id)?;
        let start = self.node(connector.start_node_id)?.position;
        let end = self.node(connector.end_node_id)?.position;

        let obstacles: Vec<Vec3> = self
            .nodes()
            .iter()
            .filter(|n| n.id != connector.start_node_id && n.id != connector.end_node_id)
            .map(|n| n.position)
            .collect();

        let props = connector.properties.resolve(connector.kind);
        Some(route_connector(start, end, connector.kind, &props, &obstacles))
    }

    /// Build a surface mesh over the given nodes, in the given order.
    ///
    /// Ids that no longer resolve are skipped; fewer than three surviving
    /// points yields no geometry.
    pub fn surface_from_nodes(&self, ids: &[NodeId], method: SurfaceMethod) -> Option<MeshData> {
        let points = self.resolve_positions(ids);
        build_surface(&points, method)
    }

    /// Build a surface mesh over the current selection, in pick order
    pub fn surface_from_selection(&self, method: SurfaceMethod) -> Option<MeshData> {
        self.surface_from_nodes(self.selection().ids(), method)
    }

    /// Build a subdivision surface from control nodes; requires at least
    /// four resolving control points
    pub fn subdivision_from_nodes(
        &self,
        ids: &[NodeId],
        iterations: u32,
        scheme: SubdivisionScheme,
    ) -> Option<MeshData> {
        let points = self.resolve_positions(ids);
        subdivision_surface(&points, iterations, scheme)
    }

    fn resolve_positions(&self, ids: &[NodeId]) -> Vec<Vec3> {
        ids.iter()
            .filter_map(|&id| self.node(id).map(|n| n.position))
            .collect()
    }
}
