//! Camera intrinsics and distortion, loaded from a JSON calibration file.
//!
//! File layout:
//!
//! ```json
//! {
//!   "camera_id": "front",
//!   "intrinsic": [[fx, 0, cx], [0, fy, cy], [0, 0, 1]],
//!   "distortion": [k1, k2, p1, p2, k3]
//! }
//! ```

use std::{fs, path::Path};

use nalgebra::{Matrix3, SVector};
use serde::{Deserialize, Serialize};

/// Brown-Conrady coefficients `[k1, k2, p1, p2, k3]`.
pub type Distortion = SVector<f64, 5>;

#[derive(thiserror::Error, Debug)]
pub enum CameraCalibrationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("camera calibration contains non-finite values")]
    NonFinite,
}

/// Projection matrix and distortion vector handed to the marker engine.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraCalibration {
    pub camera_id: Option<String>,
    pub intrinsic: Matrix3<f64>,
    pub distortion: Distortion,
}

impl Default for CameraCalibration {
    fn default() -> Self {
        Self {
            camera_id: None,
            intrinsic: Matrix3::identity(),
            distortion: Distortion::zeros(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CameraCalibrationFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    camera_id: Option<String>,
    intrinsic: [[f64; 3]; 3],
    #[serde(default)]
    distortion: [f64; 5],
}

impl CameraCalibration {
    pub fn new(intrinsic: Matrix3<f64>, distortion: Distortion) -> Self {
        Self {
            camera_id: None,
            intrinsic,
            distortion,
        }
    }

    pub fn fx(&self) -> f64 {
        self.intrinsic[(0, 0)]
    }

    pub fn fy(&self) -> f64 {
        self.intrinsic[(1, 1)]
    }

    pub fn principal_point(&self) -> [f64; 2] {
        [self.intrinsic[(0, 2)], self.intrinsic[(1, 2)]]
    }

    fn is_finite(&self) -> bool {
        self.intrinsic.iter().all(|v| v.is_finite()) && self.distortion.iter().all(|v| v.is_finite())
    }

    /// Load a calibration from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CameraCalibrationError> {
        let raw = fs::read_to_string(path)?;
        let file: CameraCalibrationFile = serde_json::from_str(&raw)?;
        let rows = file.intrinsic;
        let cal = Self {
            camera_id: file.camera_id,
            intrinsic: Matrix3::from_row_slice(&[
                rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
                rows[2][1], rows[2][2],
            ]),
            distortion: Distortion::from_row_slice(&file.distortion),
        };
        if !cal.is_finite() {
            return Err(CameraCalibrationError::NonFinite);
        }
        Ok(cal)
    }

    /// Write this calibration to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CameraCalibrationError> {
        let m = &self.intrinsic;
        let file = CameraCalibrationFile {
            camera_id: self.camera_id.clone(),
            intrinsic: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            distortion: [
                self.distortion[0],
                self.distortion[1],
                self.distortion[2],
                self.distortion[3],
                self.distortion[4],
            ],
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json)?;
        Ok(())
    }
}
