//! Calibrated camera model
//!
//! Cameras are supplied fully calibrated by the capture rig; nothing here
//! estimates parameters. The projection operator is the standard pinhole
//! chain: rotate by the Rodrigues lens vector, translate, perspective-divide,
//! apply radial/tangential distortion, then the intrinsic matrix. The lens
//! rotation vector is the Rodrigues form of the rotation matrix, so the
//! operator's optical center coincides with [`Camera::position`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Matrix3x4, Rotation3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ReviewError, ReviewResult};

/// Distortion coefficients in OpenCV order: k1, k2, p1, p2, k3.
pub type Distortion = [f64; 5];

/// One calibrated camera of the rig.
#[derive(Clone, Debug)]
pub struct Camera {
    pub id: u8,
    pub intrinsics: Matrix3<f64>,
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// Rodrigues rotation vector used by the projection operator.
    pub lens_rotation: Vector3<f64>,
    pub distortion: Distortion,
    rotation_inv: Matrix3<f64>,
}

impl Camera {
    pub fn new(
        id: u8,
        intrinsics: Matrix3<f64>,
        rotation: Matrix3<f64>,
        translation: Vector3<f64>,
        lens_rotation: Vector3<f64>,
        distortion: Distortion,
    ) -> ReviewResult<Self> {
        let rotation_inv = rotation
            .try_inverse()
            .ok_or(ReviewError::InvalidCalibration(id))?;
        Ok(Self {
            id,
            intrinsics,
            rotation,
            translation,
            lens_rotation,
            distortion,
            rotation_inv,
        })
    }

    /// Optical center in world coordinates: `-R^-1 * T`.
    pub fn position(&self) -> Vector3<f64> {
        -(self.rotation_inv * self.translation)
    }

    /// Project a world point to pixel coordinates in this camera's own frame.
    ///
    /// Points behind the camera still produce coordinates (with a negative
    /// perspective divisor); callers gate on the frame bounds.
    pub fn project(&self, point: &Vector3<f64>) -> Vector2<f64> {
        let lens = Rotation3::new(self.lens_rotation);
        let pc = lens * point + self.translation;

        let xn = pc.x / pc.z;
        let yn = pc.y / pc.z;

        let [k1, k2, p1, p2, k3] = self.distortion;
        let r2 = xn * xn + yn * yn;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + k1 * r2 + k2 * r4 + k3 * r6;
        let xd = xn * radial + 2.0 * p1 * xn * yn + p2 * (r2 + 2.0 * xn * xn);
        let yd = yn * radial + p1 * (r2 + 2.0 * yn * yn) + 2.0 * p2 * xn * yn;

        let k = &self.intrinsics;
        Vector2::new(
            k[(0, 0)] * xd + k[(0, 1)] * yd + k[(0, 2)],
            k[(1, 1)] * yd + k[(1, 2)],
        )
    }

    /// The 3x4 projection matrix `K * [L | T]` of the undistorted operator,
    /// with `L` the Rodrigues lens rotation.
    pub fn projection_matrix(&self) -> Matrix3x4<f64> {
        let lens = Rotation3::new(self.lens_rotation);

        let mut rt = Matrix3x4::<f64>::zeros();
        rt.fixed_view_mut::<3, 3>(0, 0).copy_from(lens.matrix());
        rt.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);

        self.intrinsics * rt
    }
}

/// File schema for one camera's calibration. Matrices are row-major.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CameraRecord {
    pub intrinsics: [[f64; 3]; 3],
    pub rotation: [[f64; 3]; 3],
    pub translation: [f64; 3],
    pub lens_rotation: [f64; 3],
    pub distortion: Distortion,
}

impl CameraRecord {
    pub fn into_camera(self, id: u8) -> ReviewResult<Camera> {
        Camera::new(
            id,
            matrix3(&self.intrinsics),
            matrix3(&self.rotation),
            Vector3::from(self.translation),
            Vector3::from(self.lens_rotation),
            self.distortion,
        )
    }
}

fn matrix3(rows: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::new(
        rows[0][0], rows[0][1], rows[0][2],
        rows[1][0], rows[1][1], rows[1][2],
        rows[2][0], rows[2][1], rows[2][2],
    )
}

/// Calibrated cameras keyed by camera id.
pub type CameraTable = BTreeMap<u8, Camera>;

/// Load a camera table from a JSON file keyed by camera id.
pub fn load_camera_table(path: &Path) -> ReviewResult<CameraTable> {
    let text = fs::read_to_string(path)
        .map_err(|e| ReviewError::InvalidCameraTable(format!("{}: {}", path.display(), e)))?;
    let records: BTreeMap<u8, CameraRecord> = serde_json::from_str(&text)
        .map_err(|e| ReviewError::InvalidCameraTable(format!("{}: {}", path.display(), e)))?;

    let mut cameras = CameraTable::new();
    for (id, record) in records {
        cameras.insert(id, record.into_camera(id)?);
    }
    Ok(cameras)
}
