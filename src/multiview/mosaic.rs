//! Projection into the tiled multi-camera mosaic
//!
//! The rig composites its six views into one mosaic image, two columns by
//! three rows, each cell holding one camera's frame. World points are
//! projected per camera, gated on that camera's frame bounds, and then
//! shifted by the camera's fixed cell offset.

use log::warn;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::multiview::camera::CameraTable;

pub const MOSAIC_COLS: u32 = 2;
pub const MOSAIC_ROWS: u32 = 3;

/// Mosaic cell (column, row) for a camera id, from the rig's fixed layout.
fn tile_cell(camera_id: u8) -> Option<(u32, u32)> {
    match camera_id {
        1 => Some((1, 0)),
        2 => Some((0, 1)),
        3 => Some((1, 1)),
        4 => Some((0, 2)),
        5 => Some((1, 2)),
        6 => Some((0, 0)),
        _ => None,
    }
}

/// Cell geometry of the mosaic. Each camera frame occupies one cell of
/// `half_width` by `half_height` pixels.
#[derive(Clone, Copy, Debug)]
pub struct MosaicLayout {
    pub half_width: f64,
    pub half_height: f64,
}

impl MosaicLayout {
    /// Layout for a source frame of `width` by `height` pixels (halved with
    /// integer division, matching the compositor).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            half_width: (width / 2) as f64,
            half_height: (height / 2) as f64,
        }
    }

    fn contains(&self, p: &Vector2<f64>) -> bool {
        0.0 < p.x && p.x < self.half_width && 0.0 < p.y && p.y < self.half_height
    }

    fn offset_for(&self, cell: (u32, u32)) -> Vector2<f64> {
        Vector2::new(
            cell.0 as f64 * self.half_width,
            cell.1 as f64 * self.half_height,
        )
    }
}

/// World points to render for one frame: the head position and, when an
/// annotation exists, the attention target.
#[derive(Clone, Copy, Debug)]
pub struct FramePoints {
    pub head: Vector3<f64>,
    pub attention: Option<Vector3<f64>>,
}

/// Pixel locations of one camera's visible points in the mosaic. A point
/// projecting outside the camera's frame is absent, never clamped.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MosaicPoints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<[i32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attention: Option<[i32; 2]>,
}

/// Project the frame's points into every camera's mosaic cell.
///
/// Every camera in the table gets an entry; cameras that see neither point
/// get an empty one. Cameras without a cell in the layout are skipped.
pub fn project_to_mosaic(
    points: &FramePoints,
    cameras: &CameraTable,
    layout: &MosaicLayout,
) -> BTreeMap<u8, MosaicPoints> {
    let mut mosaic = BTreeMap::new();

    for (&id, camera) in cameras {
        let Some(cell) = tile_cell(id) else {
            warn!("camera {} has no mosaic cell, skipping", id);
            continue;
        };
        let offset = layout.offset_for(cell);

        let mut entry = MosaicPoints::default();
        let head = camera.project(&points.head);
        if layout.contains(&head) {
            entry.head = Some(to_pixel(&(head + offset)));
        }
        if let Some(attention) = points.attention {
            let attention = camera.project(&attention);
            if layout.contains(&attention) {
                entry.attention = Some(to_pixel(&(attention + offset)));
            }
        }
        mosaic.insert(id, entry);
    }

    mosaic
}

fn to_pixel(p: &Vector2<f64>) -> [i32; 2] {
    [p.x as i32, p.y as i32]
}
