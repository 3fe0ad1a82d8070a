//! Surface mesh construction over node sets
//!
//! Builds an indexed triangle mesh from an unordered list of node
//! positions. The triangulation and hull routines are deliberately
//! simplified reproductions of the editor's behavior: fan triangulation
//! is NOT a Delaunay triangulation, and the "convex hull" is a cheap
//! min-y fan approximation, not a true hull. Fewer than three points is
//! an invalid input and yields no geometry.

use crate::MeshData;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mesh construction method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceMethod {
    /// Fan triangulation from point 0 (simplified, not Delaunay)
    Triangulation,
    /// Implicit square grid of side ceil(sqrt(n))
    Quad,
    /// Min-y fan approximation (not a true convex hull)
    ConvexHull,
    /// Quad-mesh over an explicit width x height grid
    Grid { width: usize, height: usize },
}

/// Build a surface mesh over `points` with the given method.
///
/// Returns `None` for degenerate input: fewer than 3 points, or fewer
/// than 4 for the quad methods.
pub fn build_surface(points: &[Vec3], method: SurfaceMethod) -> Option<MeshData> {
    if points.len() < 3 {
        return None;
    }
    let indices = match method {
        SurfaceMethod::Triangulation => fan_indices(points.len()),
        SurfaceMethod::Quad => {
            if points.len() < 4 {
                return None;
            }
            let side = (points.len() as f32).sqrt().ceil() as usize;
            grid_indices(points.len(), side, side)
        }
        SurfaceMethod::ConvexHull => hull_indices(points),
        SurfaceMethod::Grid { width, height } => {
            if points.len() < 4 {
                return None;
            }
            grid_indices(points.len(), width, height)
        }
    };
    if indices.is_empty() {
        return None;
    }
    Some(MeshData::new(points.to_vec(), indices))
}

/// Fan triangulation from point 0: (0, i+1, i+2)
fn fan_indices(count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((count - 2) * 3);
    for i in 0..count - 2 {
        indices.extend_from_slice(&[0, i as u32 + 1, i as u32 + 2]);
    }
    indices
}

/// Two triangles per interior grid cell.
///
/// When the point count does not exactly fill the assumed grid, cells
/// whose corner indices fall past the buffer are skipped rather than
/// emitted out of range.
fn grid_indices(count: usize, width: usize, height: usize) -> Vec<u32> {
    if width < 2 || height < 2 {
        return Vec::new();
    }
    let mut indices = Vec::new();
    for row in 0..height - 1 {
        for col in 0..width - 1 {
            let i = row * width + col;
            let cell = [
                [i, i + 1, i + width],
                [i + 1, i + width + 1, i + width],
            ];
            for tri in cell {
                if tri.iter().all(|&idx| idx < count) {
                    indices.extend(tri.iter().map(|&idx| idx as u32));
                }
            }
        }
    }
    indices
}

/// Find the minimum-y point and fan-connect it to the remaining points
/// in their input order. A cheap hull approximation.
fn hull_indices(points: &[Vec3]) -> Vec<u32> {
    let base = points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let rest: Vec<u32> = (0..points.len())
        .filter(|&i| i != base)
        .map(|i| i as u32)
        .collect();

    let mut indices = Vec::with_capacity((rest.len().saturating_sub(1)) * 3);
    for pair in rest.windows(2) {
        indices.extend_from_slice(&[base as u32, pair[0], pair[1]]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_points_yield_one_triangle() {
        let points = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let mesh = build_surface(&points, SurfaceMethod::Triangulation).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_fewer_than_three_points_is_invalid() {
        assert!(build_surface(&[], SurfaceMethod::Triangulation).is_none());
        assert!(build_surface(&[Vec3::ZERO, Vec3::X], SurfaceMethod::Triangulation).is_none());
    }

    #[test]
    fn test_fan_triangle_count() {
        let points: Vec<Vec3> = (0..6)
            .map(|i| Vec3::new(i as f32, 0.0, (i * i) as f32))
            .collect();
        let mesh = build_surface(&points, SurfaceMethod::Triangulation).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_quad_grid_perfect_square() {
        // 2x2 grid: one cell, two triangles
        let points = [Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)];
        let mesh = build_surface(&points, SurfaceMethod::Quad).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(&mesh.indices[..3], &[0, 1, 2]);
        assert_eq!(&mesh.indices[3..], &[1, 3, 2]);
    }

    #[test]
    fn test_quad_grid_skips_out_of_range_cells() {
        // 5 points imply a 3x3 grid; most cells reference missing points
        let points: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let mesh = build_surface(&points, SurfaceMethod::Quad).unwrap();
        // every emitted index must be in range
        assert!(mesh.indices.iter().all(|&i| (i as usize) < points.len()));
        assert!(mesh.triangle_count() >= 1);
    }

    #[test]
    fn test_explicit_grid_dimensions() {
        let points: Vec<Vec3> = (0..6)
            .map(|i| Vec3::new((i % 3) as f32, 0.0, (i / 3) as f32))
            .collect();
        let mesh = build_surface(
            &points,
            SurfaceMethod::Grid {
                width: 3,
                height: 2,
            },
        )
        .unwrap();
        // 2 cells x 2 triangles
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_hull_fans_from_lowest_point() {
        let points = [
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(1.0, -2.0, 0.0), // minimum y
            Vec3::new(2.0, 1.0, 1.0),
            Vec3::new(0.0, 2.0, 2.0),
        ];
        let mesh = build_surface(&points, SurfaceMethod::ConvexHull).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        // every triangle is anchored at the min-y point
        for tri in mesh.indices.chunks_exact(3) {
            assert_eq!(tri[0], 1);
        }
    }
}
