//! Linear algebra type system for the review pipeline
//!
//! Provides compile-time dimension checking and clean type aliases
//! for the pose-statistics and multi-view geometry code.

use nalgebra::{SMatrix, SVector};

// ===== Feature Dimensions =====
/// A pose feature vector is position (x, y, z) plus orientation (yaw, pitch, roll).
pub const POSE_DIM: usize = 6;

// ===== Pose Statistics Types =====
pub type PoseVec = SVector<f64, POSE_DIM>;
pub type PoseCov = SMatrix<f64, POSE_DIM, POSE_DIM>;
