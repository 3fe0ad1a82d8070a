//! Indexed triangle mesh buffers

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh with per-vertex normals.
///
/// Positions and normals are parallel arrays; `indices` holds triangle
/// corners in groups of three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions,
            indices,
            normals: Vec::new(),
        };
        mesh.compute_normals();
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Flatten positions into an xyz float buffer for upload
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }

    /// Recompute per-vertex normals by standard per-face averaging:
    /// accumulate each face normal onto its three corners, then normalize.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }

    /// Append another mesh, offsetting its indices past our vertices
    pub fn merge(&mut self, other: &MeshData) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> MeshData {
        MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_normals_face_consistently() {
        let mesh = unit_triangle();
        assert_eq!(mesh.normals.len(), 3);
        for n in &mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-6);
            // triangle in the XZ plane, wound 0->X->Z: normal points -Y
            assert!(n.y < 0.0);
        }
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut mesh = unit_triangle();
        let other = unit_triangle();
        mesh.merge(&other);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(&mesh.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_flat_positions_layout() {
        let mesh = unit_triangle();
        let flat = mesh.flat_positions();
        assert_eq!(flat.len(), 9);
        assert_eq!(&flat[3..6], &[1.0, 0.0, 0.0]);
    }
}
