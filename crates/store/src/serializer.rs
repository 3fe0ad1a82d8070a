//! Project serialization

use crate::{ProjectFile, Result, StoreError, PROJECT_VERSION};
use chrono::Utc;
use scene_engine::SceneStore;

/// Serialize a scene into the named project's JSON blob
pub fn export_project(store: &SceneStore, name: impl Into<String>) -> Result<String> {
    let project = ProjectFile {
        name: name.into(),
        version: PROJECT_VERSION,
        nodes: store.nodes().to_vec(),
        connectors: store.connectors().to_vec(),
        materials: store.materials().clone(),
        settings: store.grid().into(),
        exported: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&project)?;
    Ok(json)
}

/// Parse a project blob without applying it
pub fn parse_project(json: &str) -> Result<ProjectFile> {
    let project: ProjectFile = serde_json::from_str(json)?;
    if !project.is_supported() {
        return Err(StoreError::UnsupportedVersion(project.version));
    }
    Ok(project)
}

/// Import a project blob into the scene.
///
/// Performs a history-snapshotted bulk replace of nodes and connectors,
/// then restores materials and grid settings; absent arrays in the blob
/// import as empty.
pub fn import_project(store: &mut SceneStore, json: &str) -> Result<ProjectFile> {
    let project = parse_project(json)?;
    store.replace_scene(project.nodes.clone(), project.connectors.clone());
    store.replace_materials(project.materials.clone());
    store.set_grid_settings(project.settings.into());
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_round_trip() {
        let mut store = SceneStore::new();
        let a = store.add_node(Some(Vec3::ZERO), None, false);
        let b = store.add_node(Some(Vec3::new(2.0, 0.0, 0.0)), None, false);
        store.add_connector(a, b);

        let json = export_project(&store, "demo").unwrap();

        let mut restored = SceneStore::new();
        let project = import_project(&mut restored, &json).unwrap();
        assert_eq!(project.name, "demo");
        assert_eq!(restored.nodes(), store.nodes());
        assert_eq!(restored.connectors(), store.connectors());
        restored.assert_invariants();
    }

    #[test]
    fn test_import_is_undoable() {
        let mut store = SceneStore::new();
        store.add_node(Some(Vec3::ZERO), None, false);
        let json = export_project(&store, "one-node").unwrap();

        let mut target = SceneStore::new();
        target.add_node(Some(Vec3::X), None, false);
        let before_import = target.nodes().to_vec();

        import_project(&mut target, &json).unwrap();
        assert_ne!(target.nodes(), before_import.as_slice());

        assert!(target.undo());
        assert_eq!(target.nodes(), before_import.as_slice());
    }

    #[test]
    fn test_import_drops_dangling_connectors() {
        let mut store = SceneStore::new();
        let a = store.add_node(Some(Vec3::ZERO), None, false);
        let b = store.add_node(Some(Vec3::X), None, false);
        store.add_connector(a, b);
        let json = export_project(&store, "pair").unwrap();

        // corrupt the blob: keep connectors but drop the nodes array
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("nodes");
        let corrupted = serde_json::to_string(&value).unwrap();

        let mut target = SceneStore::new();
        import_project(&mut target, &corrupted).unwrap();
        assert!(target.nodes().is_empty());
        assert!(target.connectors().is_empty());
        target.assert_invariants();
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let json = format!(
            r#"{{"name":"future","version":99,"exported":"{}"}}"#,
            Utc::now().to_rfc3339()
        );
        assert!(matches!(
            parse_project(&json),
            Err(StoreError::UnsupportedVersion(99))
        ));
    }
}
