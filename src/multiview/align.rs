//! Rotation between directions
//!
//! Closed-form Rodrigues construction of the rotation carrying one unit
//! vector onto another, used to re-express camera-relative directions.

use nalgebra::{Matrix3, Vector3};

/// Rotation matrix `Rot` with `Rot * a == b` for unit vectors `a`, `b`.
///
/// Built from the axis-angle form of the cross product. Coinciding vectors
/// return the identity. The antiparallel case (`a == -b`) has no defined
/// axis and is not handled; callers must not pass opposite directions.
pub fn rotation_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Matrix3<f64> {
    let cos = a.dot(b);
    if (1.0 - cos).abs() < 1e-12 {
        return Matrix3::identity();
    }

    let axis = a.cross(b);
    let sin_sq = axis.norm_squared();
    let k = skew(&axis);
    Matrix3::identity() + k + k * k * ((1.0 - cos) / sin_sq)
}

fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v.z, v.y,
        v.z, 0.0, -v.x,
        -v.y, v.x, 0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_maps_a_onto_b() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 1.0, 0.0);
        let rot = rotation_between(&a, &b);
        assert_relative_eq!(rot * a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_arbitrary_directions() {
        let a = Vector3::new(0.3, -0.4, 0.8).normalize();
        let b = Vector3::new(-0.7, 0.1, 0.2).normalize();
        let rot = rotation_between(&a, &b);
        assert_relative_eq!(rot * a, b, epsilon = 1e-9);
    }

    #[test]
    fn test_result_is_a_rotation() {
        let a = Vector3::new(0.0, 0.6, 0.8);
        let b = Vector3::new(1.0, 0.0, 0.0);
        let rot = rotation_between(&a, &b);
        assert_relative_eq!(rot.transpose() * rot, Matrix3::identity(), epsilon = 1e-9);
        assert_relative_eq!(rot.determinant(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coinciding_vectors_give_identity() {
        let a = Vector3::new(0.0, 0.0, 1.0);
        let rot = rotation_between(&a, &a);
        assert_eq!(rot, Matrix3::identity());
    }
}
