// Re-export glam for convenience
pub use glam::*;

// Luma math types
mod interval;
mod linalg;
mod ray;

pub use interval::Interval;
pub use linalg::{checked_inverse, checked_normalize, reflect, DETERMINANT_EPSILON};
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_cross_is_right_handed() {
        let c = Vec3::X.cross(Vec3::Y);
        assert_eq!(c, Vec3::Z);

        // forward × up points to the right for a camera looking down -Z
        let right = Vec3::NEG_Z.cross(Vec3::Y);
        assert_eq!(right, Vec3::X);
    }
}
