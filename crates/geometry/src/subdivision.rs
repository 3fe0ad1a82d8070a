//! Mesh subdivision
//!
//! Refines a triangle mesh by repeated 4-way splitting with light
//! Laplacian smoothing. Both subdivision schemes offered by the editor
//! resolve to this single routine: the "Catmull-Clark" and "Loop" modes
//! are observably identical simplifications, not faithful
//! implementations of either scheme.

use crate::{build_surface, MeshData, SurfaceMethod};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Blend factor for the per-iteration vertex smoothing pass
const SMOOTHING_BLEND: f32 = 0.1;

/// Requested subdivision scheme. Both variants run the same
/// split-and-smooth routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubdivisionScheme {
    CatmullClark,
    Loop,
}

impl Default for SubdivisionScheme {
    fn default() -> Self {
        SubdivisionScheme::CatmullClark
    }
}

/// Build a subdivision surface from a set of control node positions.
///
/// Requires at least 4 control nodes; the base mesh is a fan
/// triangulation which is then refined `iterations` times.
pub fn subdivision_surface(
    points: &[Vec3],
    iterations: u32,
    scheme: SubdivisionScheme,
) -> Option<MeshData> {
    if points.len() < 4 {
        return None;
    }
    let base = build_surface(points, SurfaceMethod::Triangulation)?;
    Some(subdivide_mesh(&base, iterations, scheme))
}

/// Refine a triangle mesh by `iterations` rounds of 4-way splitting.
///
/// Per iteration: each triangle is replaced with four (three corner
/// triangles plus the center triangle formed by the edge midpoints);
/// midpoints are shared per edge. Afterwards, each *original* vertex is
/// blended toward the mean of the midpoints created on its incident
/// edges (the newly inserted midpoints are left untouched). Normals are
/// recomputed after each iteration.
pub fn subdivide_mesh(
    mesh: &MeshData,
    iterations: u32,
    _scheme: SubdivisionScheme,
) -> MeshData {
    let mut current = mesh.clone();
    for _ in 0..iterations {
        current = subdivide_once(&current);
    }
    current
}

fn subdivide_once(mesh: &MeshData) -> MeshData {
    let original_count = mesh.positions.len();
    let mut positions = mesh.positions.clone();
    let mut indices = Vec::with_capacity(mesh.indices.len() * 4);

    // one midpoint vertex per shared edge
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    // accumulated midpoint positions adjacent to each original vertex
    let mut neighbor_sums = vec![Vec3::ZERO; original_count];
    let mut neighbor_counts = vec![0u32; original_count];

    let mut midpoint = |a: u32,
                        b: u32,
                        positions: &mut Vec<Vec3>,
                        sums: &mut [Vec3],
                        counts: &mut [u32]| {
        let key = if a < b { (a, b) } else { (b, a) };
        *midpoints.entry(key).or_insert_with(|| {
            let point = (positions[a as usize] + positions[b as usize]) / 2.0;
            let index = positions.len() as u32;
            positions.push(point);
            for &end in &[a, b] {
                sums[end as usize] += point;
                counts[end as usize] += 1;
            }
            index
        })
    };

    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, &mut positions, &mut neighbor_sums, &mut neighbor_counts);
        let bc = midpoint(b, c, &mut positions, &mut neighbor_sums, &mut neighbor_counts);
        let ca = midpoint(c, a, &mut positions, &mut neighbor_sums, &mut neighbor_counts);

        indices.extend_from_slice(&[a, ab, ca]);
        indices.extend_from_slice(&[ab, b, bc]);
        indices.extend_from_slice(&[ca, bc, c]);
        indices.extend_from_slice(&[ab, bc, ca]);
    }

    // weak Laplacian smoothing of original vertices only
    for i in 0..original_count {
        if neighbor_counts[i] > 0 {
            let mean = neighbor_sums[i] / neighbor_counts[i] as f32;
            positions[i] = positions[i].lerp(mean, SMOOTHING_BLEND);
        }
    }

    MeshData::new(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> MeshData {
        MeshData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z], vec![0, 1, 2])
    }

    #[test]
    fn test_one_iteration_quadruples_triangles() {
        let mesh = subdivide_mesh(&single_triangle(), 1, SubdivisionScheme::CatmullClark);
        assert_eq!(mesh.triangle_count(), 4);
        // 3 originals + 3 edge midpoints
        assert_eq!(mesh.vertex_count(), 6);
    }

    #[test]
    fn test_midpoints_shared_between_triangles() {
        // two triangles sharing the edge (1, 2)
        let mesh = MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)],
            vec![0, 1, 2, 1, 3, 2],
        );
        let refined = subdivide_mesh(&mesh, 1, SubdivisionScheme::Loop);
        // 4 originals + 5 distinct edges
        assert_eq!(refined.vertex_count(), 9);
        assert_eq!(refined.triangle_count(), 8);
    }

    #[test]
    fn test_schemes_are_aliases() {
        let base = single_triangle();
        let cc = subdivide_mesh(&base, 2, SubdivisionScheme::CatmullClark);
        let lp = subdivide_mesh(&base, 2, SubdivisionScheme::Loop);
        assert_eq!(cc, lp);
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let base = single_triangle();
        let same = subdivide_mesh(&base, 0, SubdivisionScheme::CatmullClark);
        assert_eq!(base, same);
    }

    #[test]
    fn test_surface_requires_four_control_points() {
        let three = [Vec3::ZERO, Vec3::X, Vec3::Z];
        assert!(subdivision_surface(&three, 1, SubdivisionScheme::CatmullClark).is_none());

        let four = [Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 1.0, 1.0)];
        let mesh = subdivision_surface(&four, 1, SubdivisionScheme::CatmullClark).unwrap();
        // fan base of 2 triangles, split 4-way
        assert_eq!(mesh.triangle_count(), 8);
    }

    #[test]
    fn test_smoothing_moves_original_vertices_inward() {
        let refined = subdivide_mesh(&single_triangle(), 1, SubdivisionScheme::CatmullClark);
        // vertex 0 blends toward the mean of its two incident midpoints
        let m01 = Vec3::new(0.5, 0.0, 0.0);
        let m20 = Vec3::new(0.0, 0.0, 0.5);
        let expected = Vec3::ZERO.lerp((m01 + m20) / 2.0, 0.1);
        assert!((refined.positions[0] - expected).length() < 1e-6);
        // midpoints themselves are not smoothed
        assert!(refined.positions[3..]
            .iter()
            .any(|p| (*p - m01).length() < 1e-6));
    }
}
