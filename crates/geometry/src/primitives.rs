//! Small vector helpers shared by the geometry algorithms

use glam::{Quat, Vec3};

/// Unit vector in the XZ plane perpendicular to `dir`.
///
/// Falls back to +X when `dir` has no XZ footprint (vertical segments).
pub fn xz_perpendicular(dir: Vec3) -> Vec3 {
    Vec3::new(-dir.z, 0.0, dir.x)
        .try_normalize()
        .unwrap_or(Vec3::X)
}

/// Normalized direction from `a` to `b`, or `fallback` when they coincide
pub fn direction_or(a: Vec3, b: Vec3, fallback: Vec3) -> Vec3 {
    (b - a).try_normalize().unwrap_or(fallback)
}

/// Rotate `v` around `axis` by `angle` radians
pub fn rotate_around(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    Quat::from_axis_angle(axis, angle) * v
}

/// Any unit vector perpendicular to `v`
pub fn any_perpendicular(v: Vec3) -> Vec3 {
    let candidate = if v.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    v.cross(candidate).try_normalize().unwrap_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xz_perpendicular_is_orthogonal() {
        let dir = Vec3::new(1.0, 0.5, 2.0).normalize();
        let perp = xz_perpendicular(dir);
        assert!(perp.dot(Vec3::new(dir.x, 0.0, dir.z)).abs() < 1e-6);
        assert!((perp.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_xz_perpendicular_vertical_fallback() {
        assert_eq!(xz_perpendicular(Vec3::Y), Vec3::X);
    }

    #[test]
    fn test_rotate_around_quarter_turn() {
        let rotated = rotate_around(Vec3::X, Vec3::Y, std::f32::consts::FRAC_PI_2);
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_any_perpendicular() {
        for v in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.3, -0.8, 0.5)] {
            let p = any_perpendicular(v);
            assert!(p.dot(v).abs() < 1e-6);
        }
    }
}
