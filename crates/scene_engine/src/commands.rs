//! Command interpreter
//!
//! Maps a constrained, case-insensitive command grammar onto scene store
//! mutations. The grammar is an ordered list of (pattern, handler) rules
//! evaluated first-match-wins, so new commands are added by extending the
//! table rather than touching control flow. Commands never propagate
//! errors to the caller: every failure degrades to a notification.

use crate::{EngineError, Result, SceneStore};
use glam::Vec3;
use rand::Rng;
use regex_lite::{Captures, Regex};
use scene_model::{NodeId, Severity};
use std::f32::consts::TAU;
use std::sync::OnceLock;

/// Default node count for `create spiral`
const SPIRAL_DEFAULT_SEGMENTS: usize = 50;

/// Default spacing for `create cube`
const CUBE_DEFAULT_SPACING: f32 = 2.0;

/// Adjacency tolerance for cube connections: neighbors along an axis are
/// one spacing apart; diagonals are sqrt(2) away and must not connect
const CUBE_ADJACENCY_FACTOR: f32 = 1.1;

/// What a successful handler reports back to the user
struct CommandReply {
    message: String,
    severity: Severity,
}

impl CommandReply {
    fn success(message: impl Into<String>) -> Result<Self> {
        Ok(Self {
            message: message.into(),
            severity: Severity::Success,
        })
    }

    fn warning(message: impl Into<String>) -> Result<Self> {
        Ok(Self {
            message: message.into(),
            severity: Severity::Warning,
        })
    }

    fn info(message: impl Into<String>) -> Result<Self> {
        Ok(Self {
            message: message.into(),
            severity: Severity::Info,
        })
    }
}

type Handler = fn(&mut SceneStore, &Captures) -> Result<CommandReply>;

struct CommandRule {
    name: &'static str,
    pattern: Regex,
    run: Handler,
}

/// The ordered rule table; first match wins
fn rules() -> &'static [CommandRule] {
    static RULES: OnceLock<Vec<CommandRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let rule = |name, pattern: &str, run: Handler| CommandRule {
            name,
            pattern: Regex::new(pattern).expect("command pattern"),
            run,
        };
        vec![
            rule("clear", r"^clear$", cmd_clear),
            rule("create-node", r"^create node at\s+(.+)$", cmd_create_node),
            rule(
                "create-cube",
                r"^create cube size\s+(\d+)(?:\s+spacing\s+(-?\d+(?:\.\d+)?))?$",
                cmd_create_cube,
            ),
            rule(
                "create-sphere",
                r"^create sphere radius\s+(-?\d+(?:\.\d+)?)\s+segments\s+(\d+)$",
                cmd_create_sphere,
            ),
            rule(
                "create-spiral",
                r"^create spiral turns\s+(-?\d+(?:\.\d+)?)\s+radius\s+(-?\d+(?:\.\d+)?)\s+height\s+(-?\d+(?:\.\d+)?)(?:\s+segments\s+(\d+))?$",
                cmd_create_spiral,
            ),
            rule(
                "connect-all",
                r"^connect all distance\s+(-?\d+(?:\.\d+)?)$",
                cmd_connect_all,
            ),
            rule("select-all", r"^select all$", cmd_select_all),
            rule("delete-selected", r"^delete selected$", cmd_delete_selected),
        ]
    })
}

impl SceneStore {
    /// Execute a console/AI command string.
    ///
    /// History is snapshotted before anything else, even for no-ops and
    /// unknown commands (undo of a no-op is itself a no-op). Handler
    /// failures become notifications; nothing is raised to the caller.
    pub fn execute_command(&mut self, input: &str) {
        self.save_to_history();
        let text = input.trim().to_lowercase();

        for rule in rules() {
            if let Some(caps) = rule.pattern.captures(&text) {
                tracing::debug!(command = rule.name, "executing command");
                match (rule.run)(self, &caps) {
                    Ok(reply) => {
                        self.notify(reply.message, reply.severity);
                    }
                    Err(EngineError::InvalidCoordinates) => {
                        self.notify("Invalid coordinates", Severity::Error);
                    }
                    Err(error) => {
                        tracing::warn!(%error, command = rule.name, "command failed");
                        self.notify("Command execution failed", Severity::Error);
                    }
                }
                return;
            }
        }
        self.notify("Unknown command", Severity::Error);
    }
}

fn cmd_clear(store: &mut SceneStore, _caps: &Captures) -> Result<CommandReply> {
    store.wipe_scene();
    CommandReply::success("Scene cleared")
}

fn cmd_create_node(store: &mut SceneStore, caps: &Captures) -> Result<CommandReply> {
    let coords: Vec<f32> = caps[1]
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| EngineError::InvalidCoordinates)?;
    let &[x, y, z] = coords.as_slice() else {
        return Err(EngineError::InvalidCoordinates);
    };

    store.spawn_node(Vec3::new(x, y, z), None, false);
    CommandReply::success(format!("Created node at ({x}, {y}, {z})"))
}

fn cmd_create_cube(store: &mut SceneStore, caps: &Captures) -> Result<CommandReply> {
    let size: usize = caps[1]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[1].to_string()))?;
    let spacing: f32 = match caps.get(2) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| EngineError::InvalidArgument(m.as_str().to_string()))?,
        None => CUBE_DEFAULT_SPACING,
    };

    // N x N x N grid centered at the origin
    let mut placed: Vec<(NodeId, Vec3)> = Vec::with_capacity(size * size * size);
    let center = (size as f32 - 1.0) / 2.0;
    for x in 0..size {
        for y in 0..size {
            for z in 0..size {
                let position = Vec3::new(
                    (x as f32 - center) * spacing,
                    (y as f32 - center) * spacing,
                    (z as f32 - center) * spacing,
                );
                let id = store.spawn_node(position, None, false);
                placed.push((id, position));
            }
        }
    }

    // adjacency connections only: axis neighbors, never diagonals
    let threshold = spacing * CUBE_ADJACENCY_FACTOR;
    for (i, &(id_a, pos_a)) in placed.iter().enumerate() {
        for &(id_b, pos_b) in &placed[i + 1..] {
            if pos_a.distance(pos_b) <= threshold {
                store.insert_connector(id_a, id_b);
            }
        }
    }

    CommandReply::success(format!("Created {size}\u{d7}{size}\u{d7}{size} cube"))
}

fn cmd_create_sphere(store: &mut SceneStore, caps: &Captures) -> Result<CommandReply> {
    let radius: f32 = caps[1]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[1].to_string()))?;
    let segments: usize = caps[2]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[2].to_string()))?;

    // area-uniform scatter: theta uniform, phi = acos(1 - 2u)
    let mut rng = rand::thread_rng();
    for _ in 0..segments {
        let theta = rng.gen::<f32>() * TAU;
        let phi = (1.0 - 2.0 * rng.gen::<f32>()).acos();
        let position = Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        );
        store.spawn_node(position, None, false);
    }

    CommandReply::success(format!("Created sphere with {segments} nodes"))
}

fn cmd_create_spiral(store: &mut SceneStore, caps: &Captures) -> Result<CommandReply> {
    let turns: f32 = caps[1]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[1].to_string()))?;
    let radius: f32 = caps[2]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[2].to_string()))?;
    let height: f32 = caps[3]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[3].to_string()))?;
    let segments: usize = match caps.get(4) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| EngineError::InvalidArgument(m.as_str().to_string()))?,
        None => SPIRAL_DEFAULT_SEGMENTS,
    };

    // helical path, each node connected to the previous one
    let denom = segments.saturating_sub(1).max(1) as f32;
    let mut previous: Option<NodeId> = None;
    for i in 0..segments {
        let t = i as f32 / denom;
        let angle = t * turns * TAU;
        let position = Vec3::new(radius * angle.cos(), t * height, radius * angle.sin());
        let id = store.spawn_node(position, None, false);
        if let Some(prev) = previous {
            store.insert_connector(prev, id);
        }
        previous = Some(id);
    }

    CommandReply::success(format!("Created spiral with {segments} nodes"))
}

fn cmd_connect_all(store: &mut SceneStore, caps: &Captures) -> Result<CommandReply> {
    let distance: f32 = caps[1]
        .parse()
        .map_err(|_| EngineError::InvalidArgument(caps[1].to_string()))?;

    let nodes: Vec<(NodeId, Vec3)> = store.nodes().iter().map(|n| (n.id, n.position)).collect();
    let mut created = 0usize;
    for (i, &(id_a, pos_a)) in nodes.iter().enumerate() {
        for &(id_b, pos_b) in &nodes[i + 1..] {
            if pos_a.distance(pos_b) <= distance && store.insert_connector(id_a, id_b).is_some() {
                created += 1;
            }
        }
    }

    CommandReply::success(format!("Created {created} connections"))
}

fn cmd_select_all(store: &mut SceneStore, _caps: &Captures) -> Result<CommandReply> {
    store.select_all();
    CommandReply::info(format!("Selected {} nodes", store.selection().len()))
}

fn cmd_delete_selected(store: &mut SceneStore, _caps: &Captures) -> Result<CommandReply> {
    if store.selection().is_empty() {
        return CommandReply::warning("No nodes selected");
    }
    let ids: Vec<NodeId> = store.selection().ids().to_vec();
    store.remove_nodes(&ids);
    CommandReply::success(format!("Deleted {} nodes", ids.len()))
}
