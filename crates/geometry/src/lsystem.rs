//! L-System grammar expansion and turtle mesh emission
//!
//! Expands a rewrite grammar and walks a virtual turtle over the result,
//! emitting a cylindrical tube segment for every draw symbol. Branching
//! is handled with a state stack; sibling branches never inherit each
//! other's decay.

use crate::{any_perpendicular, rotate_around, MeshData};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Radial segment count of every emitted tube
const TUBE_RADIAL_SEGMENTS: u32 = 8;

/// L-system grammar and turtle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LSystemConfig {
    pub axiom: String,
    /// Symbol rewrite rules; symbols without a rule are copied unchanged
    pub rules: HashMap<char, String>,
    pub iterations: u32,
    /// Turn angle in degrees for +, -, &, ^, \ and /
    pub angle_degrees: f32,
    /// Initial draw length per F/G symbol
    pub step_length: f32,
    /// Length multiplier applied after each draw
    pub length_decay: f32,
    /// Initial tube radius
    pub thickness: f32,
    /// Thickness multiplier applied after each draw
    pub thickness_decay: f32,
}

impl Default for LSystemConfig {
    fn default() -> Self {
        Self {
            axiom: "F".to_string(),
            rules: HashMap::new(),
            iterations: 1,
            angle_degrees: 25.0,
            step_length: 1.0,
            length_decay: 0.95,
            thickness: 0.1,
            thickness_decay: 0.9,
        }
    }
}

impl LSystemConfig {
    pub fn with_rule(mut self, symbol: char, replacement: impl Into<String>) -> Self {
        self.rules.insert(symbol, replacement.into());
        self
    }
}

/// Expand `axiom` through the rewrite rules exactly `iterations` times.
///
/// Every character with a rule is replaced by its replacement string;
/// all other characters pass through unchanged.
pub fn expand(axiom: &str, rules: &HashMap<char, String>, iterations: u32) -> String {
    let mut current = axiom.to_string();
    for _ in 0..iterations {
        let mut next = String::with_capacity(current.len() * 2);
        for symbol in current.chars() {
            match rules.get(&symbol) {
                Some(replacement) => next.push_str(replacement),
                None => next.push(symbol),
            }
        }
        current = next;
    }
    current
}

/// One emitted tube: a straight segment with a radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

#[derive(Clone, Copy)]
struct TurtleState {
    position: Vec3,
    direction: Vec3,
    up: Vec3,
    length: f32,
    thickness: f32,
}

/// Walk the turtle over an expanded string and collect draw segments.
///
/// `F` and `G` draw (and decay length/thickness per draw, independent of
/// bracket depth); `+`/`-` yaw around the up axis, `&`/`^` pitch around
/// direction x up, `\`/`/` roll the up vector around the direction, `|`
/// reverses direction, `[`/`]` push/pop the full turtle state. Any other
/// symbol is a no-op.
pub fn trace_turtle(expanded: &str, config: &LSystemConfig) -> Vec<TubeSegment> {
    let angle = config.angle_degrees.to_radians();
    let mut state = TurtleState {
        position: Vec3::ZERO,
        direction: Vec3::Y,
        up: Vec3::Z,
        length: config.step_length,
        thickness: config.thickness,
    };
    let mut stack: Vec<TurtleState> = Vec::new();
    let mut segments = Vec::new();

    for symbol in expanded.chars() {
        match symbol {
            'F' | 'G' => {
                let end = state.position + state.direction * state.length;
                segments.push(TubeSegment {
                    start: state.position,
                    end,
                    radius: state.thickness,
                });
                state.position = end;
                state.length *= config.length_decay;
                state.thickness *= config.thickness_decay;
            }
            '+' => state.direction = rotate_around(state.direction, state.up, angle),
            '-' => state.direction = rotate_around(state.direction, state.up, -angle),
            '&' | '^' => {
                let pitch_axis = state
                    .direction
                    .cross(state.up)
                    .try_normalize()
                    .unwrap_or_else(|| any_perpendicular(state.direction));
                let signed = if symbol == '&' { angle } else { -angle };
                state.direction = rotate_around(state.direction, pitch_axis, signed);
                state.up = rotate_around(state.up, pitch_axis, signed);
            }
            '\\' => state.up = rotate_around(state.up, state.direction, angle),
            '/' => state.up = rotate_around(state.up, state.direction, -angle),
            '|' => state.direction = -state.direction,
            '[' => stack.push(state),
            ']' => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
            }
            _ => {}
        }
    }
    segments
}

/// Expand the grammar and emit the merged tube mesh
pub fn build_lsystem_mesh(config: &LSystemConfig) -> MeshData {
    let expanded = expand(&config.axiom, &config.rules, config.iterations);
    let segments = trace_turtle(&expanded, config);
    mesh_from_segments(&segments)
}

/// Build one merged vertex/index buffer from tube segments; normals are
/// computed once at the end.
pub fn mesh_from_segments(segments: &[TubeSegment]) -> MeshData {
    let mut mesh = MeshData::default();
    for segment in segments {
        append_tube(&mut mesh, segment);
    }
    mesh.compute_normals();
    mesh
}

/// Append an open-ended cylinder between the segment endpoints
fn append_tube(mesh: &mut MeshData, segment: &TubeSegment) {
    let axis = (segment.end - segment.start)
        .try_normalize()
        .unwrap_or(Vec3::Y);
    let side = any_perpendicular(axis);
    let binormal = axis.cross(side);

    let base = mesh.positions.len() as u32;
    let n = TUBE_RADIAL_SEGMENTS;
    for ring in [segment.start, segment.end] {
        for k in 0..n {
            let theta = k as f32 / n as f32 * std::f32::consts::TAU;
            let offset = (side * theta.cos() + binormal * theta.sin()) * segment.radius;
            mesh.positions.push(ring + offset);
        }
    }

    for k in 0..n {
        let next = (k + 1) % n;
        let (a, b) = (base + k, base + next);
        let (c, d) = (base + n + k, base + n + next);
        mesh.indices.extend_from_slice(&[a, b, c]);
        mesh.indices.extend_from_slice(&[b, d, c]);
    }
}
