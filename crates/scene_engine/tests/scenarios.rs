//! End-to-end scene store scenarios

use glam::Vec3;
use scene_engine::{SceneStore, MAX_HISTORY};
use scene_model::{GridSettings, Severity};

#[test]
fn add_connect_dedup_scenario() {
    let mut store = SceneStore::new();
    let id1 = store.add_node(Some(Vec3::new(0.0, 0.0, 0.0)), None, false);
    let id2 = store.add_node(Some(Vec3::new(1.0, 0.0, 0.0)), None, false);

    store.add_connector(id1, id2);
    assert_eq!(store.connectors().len(), 1);

    // dedup is order-independent
    store.add_connector(id2, id1);
    assert_eq!(store.connectors().len(), 1);
    store.assert_invariants();
}

#[test]
fn cube_command_scenario() {
    let mut store = SceneStore::new();
    store.execute_command("create cube size 2");
    assert_eq!(store.nodes().len(), 8);

    // adjacency-distance connectors only: no diagonals across the cube
    let max_len = 2.0 * 1.1;
    for connector in store.connectors() {
        let a = store.node(connector.start_node_id).unwrap().position;
        let b = store.node(connector.end_node_id).unwrap().position;
        assert!(a.distance(b) <= max_len);
    }
    store.assert_invariants();
}

#[test]
fn delete_cascade_scenario() {
    let mut store = SceneStore::new();
    let doomed = store.add_node(Some(Vec3::ZERO), None, false);
    let survivor = store.add_node(Some(Vec3::X), None, false);
    let bystander = store.add_node(Some(Vec3::Z), None, false);
    store.add_connector(doomed, survivor);

    // selection holds an unrelated id; deletion clears it anyway
    store.select_node(bystander, false);
    store.delete_nodes(&[doomed]);

    assert!(store.node(doomed).is_none());
    assert!(store.node(survivor).is_some());
    assert!(store.connectors().is_empty());
    assert!(store.selection().is_empty());
    store.assert_invariants();
}

#[test]
fn undo_redo_round_trip_for_each_mutation_kind() {
    let mut store = SceneStore::new();
    let a = store.add_node(Some(Vec3::ZERO), None, false);
    let b = store.add_node(Some(Vec3::X), None, false);
    store.add_connector(a, b);
    store.execute_command("create node at 5, 5, 5");

    // undo(); redo(); leaves nodes/connectors unchanged
    let nodes_before = store.nodes().to_vec();
    let connectors_before = store.connectors().to_vec();
    assert!(store.undo());
    assert!(store.redo());
    assert_eq!(store.nodes(), nodes_before.as_slice());
    assert_eq!(store.connectors(), connectors_before.as_slice());
    store.assert_invariants();
}

#[test]
fn undo_walks_back_to_empty_scene() {
    let mut store = SceneStore::new();
    store.execute_command("create node at 0, 0, 0");
    store.execute_command("create node at 1, 0, 0");
    store.execute_command("connect all distance 2");

    while store.undo() {}
    assert!(store.nodes().is_empty());
    assert!(store.connectors().is_empty());

    while store.redo() {}
    assert_eq!(store.nodes().len(), 2);
    assert_eq!(store.connectors().len(), 1);
}

#[test]
fn command_failures_never_mutate() {
    let mut store = SceneStore::new();
    store.execute_command("create node at 1, 2, 3");

    store.execute_command("create node at invalid, coords");
    assert_eq!(store.nodes().len(), 1);
    let latest = store.notifications().latest().unwrap();
    assert_eq!(latest.message, "Invalid coordinates");
    assert_eq!(latest.severity, Severity::Error);

    store.execute_command("definitely not a command");
    assert_eq!(store.nodes().len(), 1);
    assert_eq!(
        store.notifications().latest().unwrap().message,
        "Unknown command"
    );
    store.assert_invariants();
}

#[test]
fn history_cap_evicts_oldest() {
    let mut store = SceneStore::new();
    for i in 0..(MAX_HISTORY + 25) {
        store.add_node(Some(Vec3::new(i as f32, 0.0, 0.0)), None, false);
    }
    assert!(store.history_len() <= MAX_HISTORY);

    // undo can still walk back through the retained window
    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert!(undone > 0);
    assert!(undone <= MAX_HISTORY);
}

#[test]
fn snap_positions_property() {
    let mut store = SceneStore::new();
    store.set_grid_settings(GridSettings {
        show_grid: true,
        grid_size: 0.5,
        snap_to_grid: true,
    });

    for p in [
        Vec3::new(0.26, -0.9, 3.33),
        Vec3::new(-7.77, 0.0, 0.24),
        Vec3::ZERO,
    ] {
        let once = store.snap_position(p);
        // idempotent, and every coordinate is a grid multiple
        assert_eq!(store.snap_position(once), once);
        for c in (once / 0.5).to_array() {
            assert!((c - c.round()).abs() < 1e-5);
        }
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn snap_is_idempotent_for_any_point(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            z in -100.0f32..100.0,
            grid_size in 0.1f32..10.0,
        ) {
            let mut store = SceneStore::new();
            store.set_grid_settings(GridSettings {
                show_grid: true,
                grid_size,
                snap_to_grid: true,
            });
            let snapped = store.snap_position(Vec3::new(x, y, z));
            prop_assert_eq!(store.snap_position(snapped), snapped);
        }

        #[test]
        fn history_never_exceeds_cap(extra in 1usize..40) {
            let mut store = SceneStore::new();
            for i in 0..(MAX_HISTORY + extra) {
                store.add_node(Some(Vec3::new(i as f32, 0.0, 0.0)), None, false);
            }
            store.undo();
            prop_assert!(store.history_len() <= MAX_HISTORY);
        }
    }
}

#[test]
fn drag_gesture_snapshots_once() {
    let mut store = SceneStore::new();
    let id = store.add_node(Some(Vec3::ZERO), None, false);

    // drag start: caller snapshots once, then streams position updates
    store.save_to_history();
    for i in 1..=20 {
        store.set_node_position(id, Vec3::new(i as f32 * 0.1, 0.0, 0.0));
    }
    let final_pos = store.node(id).unwrap().position;

    // one undo returns to the drag-start position
    assert!(store.undo());
    assert_eq!(store.node(id).unwrap().position, Vec3::ZERO);
    assert!(store.redo());
    assert_eq!(store.node(id).unwrap().position, final_pos);
}
