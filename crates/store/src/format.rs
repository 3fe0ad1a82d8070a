//! Project file format specification

use chrono::{DateTime, Utc};
use scene_model::{Connector, GridSettings, MaterialRegistry, SceneNode};
use serde::{Deserialize, Serialize};

/// Project format version
pub const PROJECT_VERSION: u32 = 1;

/// Grid/snap settings as persisted in a project file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub grid_size: f32,
    pub show_grid: bool,
    pub snap_to_grid: bool,
}

impl From<GridSettings> for ProjectSettings {
    fn from(grid: GridSettings) -> Self {
        Self {
            grid_size: grid.grid_size,
            show_grid: grid.show_grid,
            snap_to_grid: grid.snap_to_grid,
        }
    }
}

impl From<ProjectSettings> for GridSettings {
    fn from(settings: ProjectSettings) -> Self {
        Self {
            grid_size: settings.grid_size,
            show_grid: settings.show_grid,
            snap_to_grid: settings.snap_to_grid,
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        GridSettings::default().into()
    }
}

/// The complete persisted project shape.
///
/// Collection fields default to empty when absent so a partial blob
/// still imports; the whole structure must survive a round trip through
/// an opaque storage channel unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default = "MaterialRegistry::with_defaults")]
    pub materials: MaterialRegistry,
    #[serde(default)]
    pub settings: ProjectSettings,
    /// Export timestamp (ISO 8601)
    pub exported: DateTime<Utc>,
}

impl ProjectFile {
    pub fn is_supported(&self) -> bool {
        self.version <= PROJECT_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let json = format!(
            r#"{{"name":"sparse","version":1,"exported":"{}"}}"#,
            Utc::now().to_rfc3339()
        );
        let project: ProjectFile = serde_json::from_str(&json).unwrap();
        assert!(project.nodes.is_empty());
        assert!(project.connectors.is_empty());
        assert!(project.materials.contains("default"));
        assert_eq!(project.settings, ProjectSettings::default());
    }
}
