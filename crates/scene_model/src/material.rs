//! Material registry
//!
//! Materials are referenced from nodes and connectors by name, never
//! embedded by value, so editing a material propagates to every entity
//! that references it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named surface appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Hex color string, e.g. "#4dabf7"
    pub color: String,
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    pub fn new(color: impl Into<String>, opacity: f32, metalness: f32, roughness: f32) -> Self {
        Self {
            color: color.into(),
            opacity,
            metalness,
            roughness,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("#4dabf7", 1.0, 0.3, 0.4)
    }
}

/// Name of the material assigned to nodes when none is given
pub const DEFAULT_MATERIAL: &str = "default";

/// The small fixed registry of named materials.
///
/// A `BTreeMap` keeps iteration (and serialization) order stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRegistry {
    materials: BTreeMap<String, Material>,
}

impl MaterialRegistry {
    /// Registry with the built-in material set
    pub fn with_defaults() -> Self {
        let mut materials = BTreeMap::new();
        materials.insert(DEFAULT_MATERIAL.to_string(), Material::default());
        materials.insert("metal".to_string(), Material::new("#c0c4cc", 1.0, 0.9, 0.15));
        materials.insert("glass".to_string(), Material::new("#a5d8ff", 0.35, 0.0, 0.05));
        materials.insert("neon".to_string(), Material::new("#69db7c", 1.0, 0.1, 0.3));
        materials.insert("matte".to_string(), Material::new("#ced4da", 1.0, 0.0, 0.9));
        Self { materials }
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Whether a material name exists
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Insert or replace a material; edits propagate to all referencing
    /// entities because nodes store only the name
    pub fn set(&mut self, name: impl Into<String>, material: Material) {
        self.materials.insert(name.into(), material);
    }

    /// Names in stable order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_present() {
        let registry = MaterialRegistry::with_defaults();
        assert!(registry.contains(DEFAULT_MATERIAL));
        assert!(registry.contains("glass"));
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut registry = MaterialRegistry::with_defaults();
        registry.set("metal", Material::new("#111111", 1.0, 1.0, 0.0));
        assert_eq!(registry.get("metal").unwrap().color, "#111111");
        assert_eq!(registry.len(), 5);
    }
}
