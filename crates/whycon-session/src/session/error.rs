use std::path::PathBuf;

use whycon_core::{CameraCalibrationError, FrameSize, ShapeError};

use crate::autocalibration::FieldDimensions;
use crate::config::ConfigError;
use crate::engine::EngineError;

/// Errors returned by a [`crate::DetectorSession`].
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The camera calibration could not be read. A session cannot produce
    /// meaningful poses without it; callers should treat this as fatal.
    #[error("failed to load camera calibration from {path}")]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: CameraCalibrationError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("frame size {actual} differs from the {expected} size the session was initialized with")]
    FrameSizeMismatch {
        expected: FrameSize,
        actual: FrameSize,
    },

    #[error("field dimensions must be positive and finite (length={length}, width={width})")]
    InvalidField { length: f32, width: f32 },

    #[error(
        "field dimensions changed while calibrating (started with {}x{}, got {}x{})",
        .started.length, .started.width, .requested.length, .requested.width
    )]
    FieldChanged {
        started: FieldDimensions,
        requested: FieldDimensions,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
