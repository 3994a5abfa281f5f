//! Attention-point triangulation from 2D observations
//!
//! Each observing camera's pixel is back-projected to a world-space ray
//! through the camera's optical center; the attention point is the
//! least-squares intersection of all rays, i.e. the point minimizing the sum
//! of squared perpendicular distances to them. The normal equations are
//! assembled from per-ray orthogonal projectors and solved by SVD, so
//! rank-deficient systems (exactly parallel rays) yield the minimum-norm
//! solution instead of failing.

use log::warn;
use nalgebra::{Matrix3, Vector3};
use std::collections::BTreeMap;

use crate::error::{ReviewError, ReviewResult};
use crate::multiview::camera::{Camera, CameraTable};

/// Singular values below this are treated as zero when solving the
/// accumulated normal equations.
const LSTSQ_EPS: f64 = 1e-12;

/// A world-space view ray. Ephemeral: built per triangulation call.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3<f64>,
    /// Points from the camera away into the scene; not necessarily unit
    /// length.
    pub direction: Vector3<f64>,
}

/// Back-project a pixel observation to the camera's view ray.
///
/// The homogeneous world point behind the pixel comes from the pseudo-inverse
/// of the camera's projection matrix; `None` when it lies at infinity.
pub fn observation_ray(camera: &Camera, pixel: &[f64; 2]) -> Option<Ray> {
    let projection = camera.projection_matrix();
    // A non-negative epsilon cannot be rejected.
    let pinv = projection
        .pseudo_inverse(LSTSQ_EPS)
        .unwrap_or_else(|_| nalgebra::Matrix4x3::zeros());

    let h = pinv * Vector3::new(pixel[0], pixel[1], 1.0);
    if h.w.abs() < LSTSQ_EPS {
        return None;
    }
    let world = Vector3::new(h.x, h.y, h.z) / h.w;

    let origin = camera.position();
    Some(Ray {
        origin,
        direction: world - origin,
    })
}

/// Least-squares intersection of two or more rays.
///
/// Accumulates the orthogonal projector `I - n * n^T` of each unit direction
/// and solves `(sum P) p = sum (P * origin)`.
pub fn intersect_rays(rays: &[Ray]) -> ReviewResult<Vector3<f64>> {
    if rays.len() < 2 {
        return Err(ReviewError::InsufficientViews(rays.len()));
    }

    let mut normal = Matrix3::<f64>::zeros();
    let mut rhs = Vector3::<f64>::zeros();
    for ray in rays {
        let n = ray.direction.normalize();
        let projector = Matrix3::identity() - n * n.transpose();
        normal += projector;
        rhs += projector * ray.origin;
    }

    let svd = normal.svd(true, true);
    // Both factors were requested above, so solve cannot fail.
    Ok(svd
        .solve(&rhs, LSTSQ_EPS)
        .unwrap_or_else(|_| Vector3::zeros()))
}

/// Triangulate the attention point from per-camera pixel observations.
///
/// Observations without a calibrated camera, or whose back-projection is
/// degenerate, are dropped with a warning; at least two usable rays must
/// remain.
pub fn triangulate_attention(
    observations: &BTreeMap<u8, [f64; 2]>,
    cameras: &CameraTable,
) -> ReviewResult<Vector3<f64>> {
    let mut rays = Vec::with_capacity(observations.len());
    for (id, pixel) in observations {
        let Some(camera) = cameras.get(id) else {
            warn!("no calibration for camera {}, dropping observation", id);
            continue;
        };
        match observation_ray(camera, pixel) {
            Some(ray) => rays.push(ray),
            None => warn!("camera {}: observation back-projects to infinity, dropping", id),
        }
    }
    intersect_rays(&rays)
}
