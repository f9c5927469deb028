//! Session configuration and its JSON representation.

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Coordinate system the engine reports marker positions in.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TransformType {
    /// Camera-centric coordinates.
    #[default]
    #[serde(rename = "none")]
    None,
    /// 3D to 2D homography onto the calibrated field plane.
    #[serde(rename = "2d")]
    TwoD,
    /// User-defined 3D frame, linear combination of four translation/rotation transforms.
    #[serde(rename = "3d")]
    ThreeD,
    /// User-defined 3D frame, full 4x3 matrix.
    #[serde(rename = "4d")]
    FourD,
    /// Inverse transform, for testing only.
    #[serde(rename = "inverse")]
    Inverse,
}

impl TransformType {
    /// Numeric code used by the engine.
    pub fn code(self) -> u8 {
        match self {
            TransformType::None => 0,
            TransformType::TwoD => 1,
            TransformType::ThreeD => 2,
            TransformType::FourD => 3,
            TransformType::Inverse => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TransformType::None),
            1 => Some(TransformType::TwoD),
            2 => Some(TransformType::ThreeD),
            3 => Some(TransformType::FourD),
            4 => Some(TransformType::Inverse),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("circle diameter must be positive and finite (got {0})")]
    CircleDiameter(f32),
    #[error("marker count must be at least 1")]
    MarkerCount,
    #[error("id_bits and id_samples must be non-zero (id_bits={id_bits}, id_samples={id_samples})")]
    IdCoding { id_bits: u32, id_samples: u32 },
}

fn default_marker_count() -> usize {
    3
}

fn default_id_bits() -> u32 {
    3
}

fn default_id_samples() -> u32 {
    360
}

fn default_hamming_distance() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Configuration captured once when a session is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Camera intrinsics/distortion file, read at session construction.
    pub camera_calibration_path: PathBuf,
    /// Space-transform calibration blob handed to the engine on initialization.
    pub space_transform_path: PathBuf,
    /// Outer black circle diameter in metres.
    pub circle_diameter: f32,
    /// Number of markers to track.
    #[serde(default = "default_marker_count")]
    pub marker_count: usize,
    #[serde(default)]
    pub transform: TransformType,
    /// Number of ID bits.
    #[serde(default = "default_id_bits")]
    pub id_bits: u32,
    /// Number of samples taken along the ID ring.
    #[serde(default = "default_id_samples")]
    pub id_samples: u32,
    /// Hamming distance of the ID code.
    #[serde(default = "default_hamming_distance")]
    pub hamming_distance: u32,
    /// Decode marker IDs.
    #[serde(default = "default_true")]
    pub identify: bool,
    /// Let the engine draw coordinates into the frame.
    #[serde(default = "default_true")]
    pub draw_coords: bool,
    /// Let the engine draw segments into the frame.
    #[serde(default = "default_true")]
    pub draw_segments: bool,
    #[serde(default)]
    pub debug: bool,
}

impl SessionConfig {
    pub fn new(
        camera_calibration_path: impl Into<PathBuf>,
        space_transform_path: impl Into<PathBuf>,
        circle_diameter: f32,
    ) -> Self {
        Self {
            camera_calibration_path: camera_calibration_path.into(),
            space_transform_path: space_transform_path.into(),
            circle_diameter,
            marker_count: default_marker_count(),
            transform: TransformType::default(),
            id_bits: default_id_bits(),
            id_samples: default_id_samples(),
            hamming_distance: default_hamming_distance(),
            identify: true,
            draw_coords: true,
            draw_segments: true,
            debug: false,
        }
    }

    pub fn with_marker_count(mut self, marker_count: usize) -> Self {
        self.marker_count = marker_count;
        self
    }

    pub fn with_transform(mut self, transform: TransformType) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_id_coding(mut self, id_bits: u32, id_samples: u32, hamming_distance: u32) -> Self {
        self.id_bits = id_bits;
        self.id_samples = id_samples;
        self.hamming_distance = hamming_distance;
        self
    }

    pub fn with_identify(mut self, identify: bool) -> Self {
        self.identify = identify;
        self
    }

    pub fn with_drawing(mut self, coords: bool, segments: bool) -> Self {
        self.draw_coords = coords;
        self.draw_segments = segments;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Log level matching the `debug` flag, for
    /// `whycon_core::init_with_level`.
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.circle_diameter.is_finite() && self.circle_diameter > 0.0) {
            return Err(ConfigError::CircleDiameter(self.circle_diameter));
        }
        if self.marker_count == 0 {
            return Err(ConfigError::MarkerCount);
        }
        if self.id_bits == 0 || self.id_samples == 0 {
            return Err(ConfigError::IdCoding {
                id_bits: self.id_bits,
                id_samples: self.id_samples,
            });
        }
        Ok(())
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
