//! Scene node types and shape properties
//!
//! A node is the primary user-manipulable entity: a positioned, shaped
//! point in 3D space. Shape parameters live in an optional property bag;
//! defaults are applied in exactly one place ([`NodeProperties::resolve`])
//! rather than at every read site.

use crate::NodeId;
use chrono::{DateTime, Utc};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Geometry primitive rendered for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Sphere,
    Cube,
    Cylinder,
    Cone,
    Plane,
    Torus,
    Custom,
}

impl Default for GeometryKind {
    fn default() -> Self {
        GeometryKind::Sphere
    }
}

/// Optional shape/rendering parameters for a node.
///
/// Every field is optional; a `None` means "use the default". Defaults are
/// resolved once via [`NodeProperties::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    pub radius: Option<f32>,
    pub height: Option<f32>,
    pub width: Option<f32>,
    pub depth: Option<f32>,
    pub segments: Option<u32>,
    pub rings: Option<u32>,
    /// Hex color string, e.g. "#4dabf7"
    pub color: Option<String>,
    pub opacity: Option<f32>,
    pub metalness: Option<f32>,
    pub roughness: Option<f32>,
    /// Hex emissive color
    pub emissive: Option<String>,
    pub wireframe: Option<bool>,
    pub visible: Option<bool>,
    pub cast_shadow: Option<bool>,
    pub receive_shadow: Option<bool>,
}

/// Node properties with every default filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedNodeProperties {
    pub radius: f32,
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    pub segments: u32,
    pub rings: u32,
    pub color: String,
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: String,
    pub wireframe: bool,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl NodeProperties {
    /// Apply defaults to every unset field.
    ///
    /// This is the single default-resolution point for node shape
    /// parameters; callers must not re-apply their own fallbacks.
    pub fn resolve(&self) -> ResolvedNodeProperties {
        ResolvedNodeProperties {
            radius: self.radius.unwrap_or(0.5),
            height: self.height.unwrap_or(1.0),
            width: self.width.unwrap_or(1.0),
            depth: self.depth.unwrap_or(1.0),
            segments: self.segments.unwrap_or(32),
            rings: self.rings.unwrap_or(16),
            color: self.color.clone().unwrap_or_else(|| "#4dabf7".to_string()),
            opacity: self.opacity.unwrap_or(1.0),
            metalness: self.metalness.unwrap_or(0.3),
            roughness: self.roughness.unwrap_or(0.4),
            emissive: self
                .emissive
                .clone()
                .unwrap_or_else(|| "#000000".to_string()),
            wireframe: self.wireframe.unwrap_or(false),
            visible: self.visible.unwrap_or(true),
            cast_shadow: self.cast_shadow.unwrap_or(true),
            receive_shadow: self.receive_shadow.unwrap_or(true),
        }
    }

    /// Merge another bag into this one; set fields in `other` win
    pub fn merge(&mut self, other: &NodeProperties) {
        macro_rules! take {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field.clone();
                }
            };
        }
        take!(radius);
        take!(height);
        take!(width);
        take!(depth);
        take!(segments);
        take!(rings);
        take!(color);
        take!(opacity);
        take!(metalness);
        take!(roughness);
        take!(emissive);
        take!(wireframe);
        take!(visible);
        take!(cast_shadow);
        take!(receive_shadow);
    }
}

/// A positioned node in the scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Stable unique id
    pub id: NodeId,
    /// World position
    pub position: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Non-uniform scale
    pub scale: Vec3,
    /// Geometry primitive
    pub kind: GeometryKind,
    /// Shape/rendering parameters (defaults applied lazily)
    #[serde(default)]
    pub properties: NodeProperties,
    /// Key into the material registry
    pub material: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Scale-in animation value; 1.0 once the spawn animation finished
    #[serde(default = "default_spawn_scale")]
    pub spawn_scale: f32,
}

fn default_spawn_scale() -> f32 {
    1.0
}

impl SceneNode {
    /// Create a node at a position with the default sphere geometry
    pub fn new(position: Vec3, material: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            kind: GeometryKind::default(),
            properties: NodeProperties::default(),
            material: material.into(),
            created_at: Utc::now(),
            spawn_scale: 1.0,
        }
    }

    /// Create a node with an explicit geometry kind and property bag
    pub fn with_shape(
        position: Vec3,
        material: impl Into<String>,
        kind: GeometryKind,
        properties: NodeProperties,
    ) -> Self {
        Self {
            kind,
            properties,
            ..Self::new(position, material)
        }
    }

    /// Whether the spawn scale-in animation is still running
    pub fn is_spawning(&self) -> bool {
        self.spawn_scale < 1.0
    }
}
