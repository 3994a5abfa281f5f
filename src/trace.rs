//! Pose log parsing
//!
//! Reads the comma-separated head-pose logs produced by the capture rig.
//! Two record layouts exist in the wild: a 10-field layout carrying only the
//! pose, and an 18-field layout that additionally carries detection flags and
//! head/attention landmark coordinates (ignored here). Lines with any other
//! field count are skipped.

use std::fs;
use std::path::Path;

use log::warn;
use nalgebra::Vector3;

use crate::error::{ReviewError, ReviewResult};
use crate::types::POSE_DIM;

/// Field count of the pose-only record layout.
pub const SHORT_RECORD_FIELDS: usize = 10;
/// Field count of the layout with detection flags and landmarks.
pub const LONG_RECORD_FIELDS: usize = 18;

/// One row of the pose log: a frame id plus a 6-DoF head pose.
///
/// Frame ids are assumed monotonically non-decreasing across the log; this is
/// not enforced.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseSample {
    pub frame_id: i64,
    pub position: Vector3<f64>,
    /// Euler angles as (yaw, pitch, roll).
    pub orientation: Vector3<f64>,
}

impl PoseSample {
    /// The 6-dimensional feature vector analyzed by the selection pipeline.
    pub fn features(&self) -> [f64; POSE_DIM] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.orientation.x,
            self.orientation.y,
            self.orientation.z,
        ]
    }
}

/// Column indices binding raw record fields to pose features.
///
/// The defaults reproduce the recorder's historical layout, in which the yaw
/// slot reads the same column as the y position and the column between x and z
/// is never consumed. Whether that duplication is intended is unresolved; a
/// corrected binding is a single index change here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldMap {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    pub yaw: usize,
    pub pitch: usize,
    pub roll: usize,
}

impl FieldMap {
    /// Binding for 10-field records.
    pub const fn short_record() -> Self {
        Self {
            x: 1,
            y: 4,
            z: 3,
            yaw: 4,
            pitch: 5,
            roll: 6,
        }
    }

    /// Binding for 18-field records (pose fields shifted past the two
    /// detection flags).
    pub const fn long_record() -> Self {
        Self {
            x: 3,
            y: 6,
            z: 5,
            yaw: 6,
            pitch: 7,
            roll: 8,
        }
    }
}

/// Field bindings for both supported record layouts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogFormat {
    pub short: FieldMap,
    pub long: FieldMap,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            short: FieldMap::short_record(),
            long: FieldMap::long_record(),
        }
    }
}

/// Parse pose samples out of log text, skipping unusable lines.
///
/// A line is skipped (with a warning) when its field count matches neither
/// supported layout or when a bound field fails to parse as a number.
pub fn parse_pose_log(text: &str, format: &LogFormat) -> Vec<PoseSample> {
    let mut samples = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let map = match fields.len() {
            SHORT_RECORD_FIELDS => &format.short,
            LONG_RECORD_FIELDS => &format.long,
            n => {
                warn!("pose log line {}: unsupported field count {}, skipping", lineno + 1, n);
                continue;
            }
        };

        match build_sample(&fields, map) {
            Some(sample) => samples.push(sample),
            None => {
                warn!("pose log line {}: unparsable numeric field, skipping", lineno + 1);
            }
        }
    }

    samples
}

fn build_sample(fields: &[&str], map: &FieldMap) -> Option<PoseSample> {
    let frame_id = fields.first()?.trim().parse::<i64>().ok()?;
    let get = |i: usize| fields.get(i)?.trim().parse::<f64>().ok();

    Some(PoseSample {
        frame_id,
        position: Vector3::new(get(map.x)?, get(map.y)?, get(map.z)?),
        orientation: Vector3::new(get(map.yaw)?, get(map.pitch)?, get(map.roll)?),
    })
}

/// Read a pose log from disk using the default field bindings.
pub fn read_pose_log(path: &Path) -> ReviewResult<Vec<PoseSample>> {
    let text = fs::read_to_string(path)
        .map_err(|e| ReviewError::InputNotFound(format!("{}: {}", path.display(), e)))?;
    Ok(parse_pose_log(&text, &LogFormat::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_record_parsing() {
        let text = "7,1.0,2.0,3.0,4.0,5.0,6.0,0,0,0\n";
        let samples = parse_pose_log(text, &LogFormat::default());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].frame_id, 7);
        // Position y and yaw both read column 4 in the historical layout.
        assert_eq!(samples[0].position, Vector3::new(1.0, 4.0, 3.0));
        assert_eq!(samples[0].orientation, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_long_record_parsing() {
        let text = "12,1,1,0.1,0.2,0.3,0.4,0.5,0.6,0,0,0,0,0,0,0,0,0\n";
        let samples = parse_pose_log(text, &LogFormat::default());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].frame_id, 12);
        assert_eq!(samples[0].position, Vector3::new(0.1, 0.4, 0.3));
        assert_eq!(samples[0].orientation, Vector3::new(0.4, 0.5, 0.6));
    }

    #[test]
    fn test_unsupported_field_count_skipped() {
        let text = "1,2,3\n7,1.0,2.0,3.0,4.0,5.0,6.0,0,0,0\nnot,a,record,at,all\n";
        let samples = parse_pose_log(text, &LogFormat::default());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].frame_id, 7);
    }

    #[test]
    fn test_unparsable_number_skipped() {
        let text = "7,one,2.0,3.0,4.0,5.0,6.0,0,0,0\n8,1.0,2.0,3.0,4.0,5.0,6.0,0,0,0\n";
        let samples = parse_pose_log(text, &LogFormat::default());
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].frame_id, 8);
    }

    #[test]
    fn test_custom_field_map_corrects_yaw() {
        // A corrected binding that reads y from column 2 and yaw from column 4.
        let format = LogFormat {
            short: FieldMap {
                x: 1,
                y: 2,
                z: 3,
                yaw: 4,
                pitch: 5,
                roll: 6,
            },
            long: FieldMap::long_record(),
        };
        let text = "7,1.0,2.0,3.0,4.0,5.0,6.0,0,0,0\n";
        let samples = parse_pose_log(text, &format);
        assert_eq!(samples[0].position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(samples[0].orientation, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = read_pose_log(Path::new("/no/such/pose_log.txt")).unwrap_err();
        assert!(matches!(err, ReviewError::InputNotFound(_)));
    }
}
