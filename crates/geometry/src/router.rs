//! Connector routing
//!
//! Computes the renderable polyline (and, for bezier curves, the control
//! point pair) for a connector between two node positions. Routing is a
//! pure function of the endpoints, the connector kind, the resolved
//! property bag, and an obstacle list; the caller is responsible for
//! resolving endpoint ids to positions first and rejecting connectors
//! whose endpoints no longer exist.

use crate::{direction_or, xz_perpendicular};
use glam::Vec3;
use scene_model::{ConnectorKind, ResolvedConnectorProperties, RoutingStyle};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Sample spacing for collision-avoidance subdivision, in world units
const AVOIDANCE_STEP: f32 = 0.2;

/// Extra clearance added when pushing a sample out of an obstacle radius
const AVOIDANCE_PADDING: f32 = 0.1;

/// Number of full turns in a spring coil
const SPRING_TURNS: f32 = 3.0;

/// A routed connector path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorPath {
    /// Ordered polyline samples (or curve endpoints for bezier)
    pub points: Vec<Vec3>,
    /// Cubic control point pair, present for bezier connectors only
    pub controls: Option<[Vec3; 2]>,
}

impl ConnectorPath {
    fn polyline(points: Vec<Vec3>) -> Self {
        Self {
            points,
            controls: None,
        }
    }
}

/// Route a connector between two endpoint positions.
///
/// `obstacles` is only consulted for straight connectors with collision
/// avoidance enabled; it is typically every other node's position.
pub fn route_connector(
    start: Vec3,
    end: Vec3,
    kind: ConnectorKind,
    props: &ResolvedConnectorProperties,
    obstacles: &[Vec3],
) -> ConnectorPath {
    match kind {
        ConnectorKind::Straight => route_straight(start, end, props, obstacles),
        ConnectorKind::Bezier => route_bezier(start, end),
        ConnectorKind::Arc => route_arc(start, end, props.segments),
        ConnectorKind::Spline => route_spline(start, end, props.tension, props.segments),
        ConnectorKind::Spring => route_spring(start, end, props.segments),
    }
}

fn route_straight(
    start: Vec3,
    end: Vec3,
    props: &ResolvedConnectorProperties,
    obstacles: &[Vec3],
) -> ConnectorPath {
    // Avoidance radius <= 0 means the distance check can never trigger
    // for positive distances; treat it as disabled.
    if props.collision_avoidance && !obstacles.is_empty() && props.avoidance_radius > 0.0 {
        return ConnectorPath::polyline(avoid_obstacles(
            start,
            end,
            props.avoidance_radius,
            obstacles,
        ));
    }
    if props.auto_route {
        return match props.routing {
            RoutingStyle::Manhattan => ConnectorPath::polyline(manhattan_path(start, end)),
            RoutingStyle::Smooth => ConnectorPath::polyline(smooth_path(start, end)),
            RoutingStyle::Direct => ConnectorPath::polyline(vec![start, end]),
        };
    }
    ConnectorPath::polyline(vec![start, end])
}

/// Subdivide the segment and push samples out of obstacle radii.
///
/// This is iterative per-obstacle correction, not a global shortest path:
/// several close obstacles can compound a sample's displacement.
fn avoid_obstacles(start: Vec3, end: Vec3, radius: f32, obstacles: &[Vec3]) -> Vec<Vec3> {
    let distance = start.distance(end);
    let steps = ((distance / AVOIDANCE_STEP).ceil() as usize).max(1);

    let mut points = Vec::with_capacity(steps + 1);
    points.push(start);
    for i in 1..steps {
        let t = i as f32 / steps as f32;
        let mut sample = start.lerp(end, t);
        for obstacle in obstacles {
            let d = sample.distance(*obstacle);
            if d < radius {
                let away = (sample - *obstacle).try_normalize().unwrap_or(Vec3::Y);
                sample += away * (radius - d + AVOIDANCE_PADDING);
            }
        }
        points.push(sample);
    }
    points.push(end);
    points
}

/// Right-angle path through one shared midpoint x-coordinate (3 segments)
fn manhattan_path(start: Vec3, end: Vec3) -> Vec<Vec3> {
    let mid_x = (start.x + end.x) / 2.0;
    vec![
        start,
        Vec3::new(mid_x, start.y, start.z),
        Vec3::new(mid_x, end.y, end.z),
        end,
    ]
}

/// Four-point path with interior controls displaced along the XZ
/// perpendicular by 30% of the straight-line distance
fn smooth_path(start: Vec3, end: Vec3) -> Vec<Vec3> {
    let distance = start.distance(end);
    let dir = direction_or(start, end, Vec3::X);
    let offset = xz_perpendicular(dir) * (distance * 0.3);
    vec![
        start,
        start.lerp(end, 0.3) + offset,
        start.lerp(end, 0.7) + offset,
        end,
    ]
}

/// Cubic control pair: the midpoint displaced +/-30%-of-distance along
/// the perpendicular
fn route_bezier(start: Vec3, end: Vec3) -> ConnectorPath {
    let distance = start.distance(end);
    let mid = start.lerp(end, 0.5);
    let dir = direction_or(start, end, Vec3::X);
    let offset = xz_perpendicular(dir) * (distance * 0.3);
    ConnectorPath {
        points: vec![start, end],
        controls: Some([mid + offset, mid - offset]),
    }
}

/// Semicircular arc (0..pi) lifted above the straight segment
fn route_arc(start: Vec3, end: Vec3, segments: u32) -> ConnectorPath {
    let segments = segments.max(2);
    let radius = start.distance(end) * 0.3;
    let mut points = Vec::with_capacity(segments as usize + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let angle = PI * t;
        points.push(start.lerp(end, t) + Vec3::Y * (angle.sin() * radius));
    }
    ConnectorPath::polyline(points)
}

/// Cardinal-spline interpolation through 4 control points: the endpoints
/// plus two interior points at t=0.33/0.66 with +/-1 unit y-displacement
fn route_spline(start: Vec3, end: Vec3, tension: f32, segments: u32) -> ConnectorPath {
    let segments = segments.max(2);
    let controls = [
        start,
        start.lerp(end, 0.33) + Vec3::Y,
        start.lerp(end, 0.66) - Vec3::Y,
        end,
    ];

    let mut points = Vec::with_capacity(segments as usize);
    let spans = controls.len() - 1;
    for i in 0..segments {
        let u = i as f32 / (segments - 1) as f32 * spans as f32;
        let span = (u.floor() as usize).min(spans - 1);
        let t = u - span as f32;

        // clamp phantom endpoints to the boundary controls
        let p0 = controls[span.saturating_sub(1)];
        let p1 = controls[span];
        let p2 = controls[span + 1];
        let p3 = controls[(span + 2).min(controls.len() - 1)];
        points.push(cardinal(p0, p1, p2, p3, tension, t));
    }
    ConnectorPath::polyline(points)
}

/// Cardinal spline segment between p1 and p2; tension 0.5 is Catmull-Rom
fn cardinal(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32, t: f32) -> Vec3 {
    let m1 = (p2 - p0) * tension;
    let m2 = (p3 - p1) * tension;
    let t2 = t * t;
    let t3 = t2 * t;
    p1 * (2.0 * t3 - 3.0 * t2 + 1.0)
        + m1 * (t3 - 2.0 * t2 + t)
        + p2 * (-2.0 * t3 + 3.0 * t2)
        + m2 * (t3 - t2)
}

/// Helical coil over three full turns, radius 10% of endpoint distance
fn route_spring(start: Vec3, end: Vec3, segments: u32) -> ConnectorPath {
    let segments = segments.max(2);
    let distance = start.distance(end);
    let radius = distance * 0.1;
    let dir = direction_or(start, end, Vec3::Y);
    let side = xz_perpendicular(dir);
    let binormal = dir.cross(side).try_normalize().unwrap_or(Vec3::Y);

    let mut points = Vec::with_capacity(segments as usize);
    for i in 0..segments {
        let t = i as f32 / (segments - 1) as f32;
        let angle = t * SPRING_TURNS * 2.0 * PI;
        let base = start.lerp(end, t);
        points.push(base + side * (angle.cos() * radius) + binormal * (angle.sin() * radius));
    }
    ConnectorPath::polyline(points)
}

/// Cosmetic spring-tension scale factor.
///
/// A Hooke's-law-flavored visual effect, not a physics integrator: the
/// render layer drives `phase` each frame and scales the coil by the
/// returned factor.
pub fn spring_oscillation(distance: f32, rest_length: f32, stiffness: f32, phase: f32) -> f32 {
    let displacement = distance - rest_length;
    1.0 + 0.1 * stiffness * displacement * phase.sin()
}
