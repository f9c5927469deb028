//! Contract of the external marker detection/pose engine.
//!
//! The session never looks inside the engine. It configures it once the frame
//! size is known, hands it adapted frames, and reads back flat per-marker
//! records which [`crate::project_markers`] turns into caller-facing
//! [`whycon_core::Marker`]s.

use std::path::{Path, PathBuf};

use whycon_core::{CameraCalibration, FrameSize, RawImageMut};

use crate::autocalibration::FieldDimensions;
use crate::config::{SessionConfig, TransformType};

/// Errors raised by an engine implementation.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),

    #[error("space calibration {path}: {reason}")]
    Calibration { path: PathBuf, reason: String },

    #[error("image processing failed: {0}")]
    Processing(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        EngineError::Backend(Box::new(err))
    }
}

/// Parameters for the one-time engine initialization.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineInit {
    pub circle_diameter: f32,
    /// Engine-side preview window; the session never asks for one.
    pub use_gui: bool,
    pub id_bits: u32,
    pub id_samples: u32,
    pub hamming_distance: u32,
    pub marker_count: usize,
    pub identify: bool,
    pub width: usize,
    pub height: usize,
}

impl EngineInit {
    pub fn from_config(config: &SessionConfig, size: FrameSize) -> Self {
        Self {
            circle_diameter: config.circle_diameter,
            use_gui: false,
            id_bits: config.id_bits,
            id_samples: config.id_samples,
            hamming_distance: config.hamming_distance,
            marker_count: config.marker_count,
            identify: config.identify,
            width: size.width,
            height: size.height,
        }
    }
}

/// Outcome of asking the engine to begin field autocalibration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutocalibrationStart {
    Started,
    /// Fewer than four outer reference markers are visible in the frame.
    NotEnoughMarkers { found: usize },
}

/// Engine-native segment record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineSegment {
    pub x: f32,
    pub y: f32,
    pub size: u32,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub mean: i32,
    pub kind: i32,
    pub roundness: f32,
    pub bw_ratio: f32,
    pub round: bool,
    pub valid: bool,
    pub m0: f32,
    pub m1: f32,
    pub v0: f32,
    pub v1: f32,
    pub r0: f32,
    pub r1: f32,
    /// Negative when no ID was decoded.
    pub id: i32,
}

/// Engine-native tracked-object record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineTrackedObject {
    pub u: f32,
    pub v: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub d: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub angle: f32,
    pub n0: f32,
    pub n1: f32,
    pub n2: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
}

/// One engine detection: image segment plus pose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineMarker {
    pub seg: EngineSegment,
    pub obj: EngineTrackedObject,
}

/// External marker engine driven by a [`crate::DetectorSession`].
pub trait MarkerEngine {
    /// Allocate engine state for frames of `init.width` x `init.height`.
    ///
    /// The session calls this on the first frame and again on every later
    /// frame until the whole configuration sequence, ending with
    /// [`MarkerEngine::load_calibration`], has succeeded once. A failure after
    /// `init` returned `Ok` therefore leads to a second `init` call on the
    /// same engine, which must replace the previous state.
    fn init(&mut self, init: &EngineInit) -> Result<(), EngineError>;

    fn update_camera_info(&mut self, camera: &CameraCalibration);

    fn set_drawing(&mut self, coords: bool, segments: bool);

    fn set_coordinate_transform(&mut self, transform: TransformType);

    fn set_debug(&mut self, debug: bool);

    /// Size of the calibration field spanned by the four reference markers.
    fn set_field_dimensions(&mut self, field: FieldDimensions);

    fn load_calibration(&mut self, path: &Path) -> Result<(), EngineError>;

    fn save_calibration(&mut self, path: &Path) -> Result<(), EngineError>;

    /// Run one detection pass, appending to `markers`.
    ///
    /// `image` is in [`whycon_core::ChannelOrder::ENGINE`] order; the engine
    /// may draw overlays into it.
    fn process_image(
        &mut self,
        image: &mut RawImageMut<'_>,
        markers: &mut Vec<EngineMarker>,
    ) -> Result<(), EngineError>;

    fn start_autocalibration(&mut self) -> Result<AutocalibrationStart, EngineError>;

    /// `true` while a started autocalibration is still collecting frames.
    fn autocalibration_in_progress(&self) -> bool;
}
