//! Connector types between scene nodes
//!
//! A connector references its two endpoint nodes by id (directed storage,
//! undirected semantics: the unordered endpoint pair identifies it for
//! deduplication). Curve parameters live in an optional property bag with
//! one default-resolution point, mirroring node shape properties.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Curve family used to route a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    Straight,
    Bezier,
    Spline,
    Arc,
    Spring,
}

impl Default for ConnectorKind {
    fn default() -> Self {
        ConnectorKind::Straight
    }
}

/// Dash pattern of the rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::Solid
    }
}

/// Auto-routing style for straight connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStyle {
    /// Plain two-point segment
    Direct,
    /// Right-angle path through a shared midpoint
    Manhattan,
    /// Perpendicular-offset curve through two interior controls
    Smooth,
}

impl Default for RoutingStyle {
    fn default() -> Self {
        RoutingStyle::Direct
    }
}

/// Unique identifier for a connector.
///
/// Derived deterministically from the ordered endpoint pair as
/// `conn_{start}_{end}`, so the same gesture always produces the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorId(String);

impl ConnectorId {
    /// Build the id for an ordered endpoint pair
    pub fn for_endpoints(start: NodeId, end: NodeId) -> Self {
        Self(format!("conn_{}_{}", start, end))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional curve/rendering parameters for a connector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorProperties {
    pub thickness: Option<f32>,
    pub line_style: Option<LineStyle>,
    /// Hex color string
    pub color: Option<String>,
    pub opacity: Option<f32>,
    /// Curve tension for spline interpolation
    pub tension: Option<f32>,
    /// Sample count along the curve; default depends on the connector kind
    pub segments: Option<u32>,
    /// Spring stiffness (cosmetic oscillation only)
    pub stiffness: Option<f32>,
    /// Spring damping (cosmetic oscillation only)
    pub damping: Option<f32>,
    /// Spring rest length in world units
    pub rest_length: Option<f32>,
    /// Route around the midpoint instead of straight through
    pub auto_route: Option<bool>,
    /// Push the path away from nearby obstacle nodes
    pub collision_avoidance: Option<bool>,
    /// Obstacle clearance distance; avoidance is disabled when <= 0
    pub avoidance_radius: Option<f32>,
    pub routing: Option<RoutingStyle>,
}

/// Connector properties with every default filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConnectorProperties {
    pub thickness: f32,
    pub line_style: LineStyle,
    pub color: String,
    pub opacity: f32,
    pub tension: f32,
    pub segments: u32,
    pub stiffness: f32,
    pub damping: f32,
    pub rest_length: f32,
    pub auto_route: bool,
    pub collision_avoidance: bool,
    pub avoidance_radius: f32,
    pub routing: RoutingStyle,
}

impl ConnectorProperties {
    /// Default sample count for a connector kind
    pub fn default_segments(kind: ConnectorKind) -> u32 {
        match kind {
            ConnectorKind::Arc => 16,
            ConnectorKind::Spline => 20,
            ConnectorKind::Spring => 32,
            ConnectorKind::Straight | ConnectorKind::Bezier => 2,
        }
    }

    /// Apply defaults to every unset field.
    ///
    /// The segment default depends on the curve family, so the connector
    /// kind is part of the resolution input.
    pub fn resolve(&self, kind: ConnectorKind) -> ResolvedConnectorProperties {
        ResolvedConnectorProperties {
            thickness: self.thickness.unwrap_or(1.0),
            line_style: self.line_style.unwrap_or_default(),
            color: self.color.clone().unwrap_or_else(|| "#e9ecef".to_string()),
            opacity: self.opacity.unwrap_or(1.0),
            tension: self.tension.unwrap_or(0.5),
            segments: self.segments.unwrap_or_else(|| Self::default_segments(kind)),
            stiffness: self.stiffness.unwrap_or(0.8),
            damping: self.damping.unwrap_or(0.1),
            rest_length: self.rest_length.unwrap_or(2.0),
            auto_route: self.auto_route.unwrap_or(false),
            collision_avoidance: self.collision_avoidance.unwrap_or(false),
            avoidance_radius: self.avoidance_radius.unwrap_or(0.5),
            routing: self.routing.unwrap_or_default(),
        }
    }
}

/// A curve between two scene nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub start_node_id: NodeId,
    pub end_node_id: NodeId,
    pub kind: ConnectorKind,
    #[serde(default)]
    pub properties: ConnectorProperties,
}

impl Connector {
    /// Create a straight connector with default properties
    pub fn new(start: NodeId, end: NodeId) -> Self {
        Self {
            id: ConnectorId::for_endpoints(start, end),
            start_node_id: start,
            end_node_id: end,
            kind: ConnectorKind::default(),
            properties: ConnectorProperties {
                thickness: Some(1.0),
                ..Default::default()
            },
        }
    }

    /// Unordered endpoint pair used for duplicate detection
    pub fn pair_key(&self) -> (NodeId, NodeId) {
        unordered_pair(self.start_node_id, self.end_node_id)
    }

    /// Whether this connector touches the given node
    pub fn touches(&self, id: NodeId) -> bool {
        self.start_node_id == id || self.end_node_id == id
    }
}

/// Normalize an endpoint pair so (a, b) and (b, a) compare equal
pub fn unordered_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a.as_uuid() <= b.as_uuid() {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_eq!(
            Connector::new(a, b).pair_key(),
            Connector::new(b, a).pair_key()
        );
    }

    #[test]
    fn test_connector_id_is_deterministic() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert_eq!(
            ConnectorId::for_endpoints(a, b),
            ConnectorId::for_endpoints(a, b)
        );
        assert!(ConnectorId::for_endpoints(a, b)
            .as_str()
            .starts_with("conn_"));
    }

    #[test]
    fn test_segment_defaults_per_kind() {
        let props = ConnectorProperties::default();
        assert_eq!(props.resolve(ConnectorKind::Arc).segments, 16);
        assert_eq!(props.resolve(ConnectorKind::Spline).segments, 20);
        assert_eq!(props.resolve(ConnectorKind::Spring).segments, 32);
    }

    #[test]
    fn test_explicit_segments_win() {
        let props = ConnectorProperties {
            segments: Some(64),
            ..Default::default()
        };
        assert_eq!(props.resolve(ConnectorKind::Spring).segments, 64);
    }
}
