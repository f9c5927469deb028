//! Field autocalibration bookkeeping.
//!
//! A session moves through `NotStarted -> Started -> Completed` exactly once.
//! Every move goes through [`AutocalibrationState::transition`]; events that do
//! not apply to the current state leave it unchanged. `Completed` is terminal
//! for the per-frame path; only an explicit
//! [`crate::DetectorSession::reset_autocalibration`] starts over.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use whycon_core::Marker;

/// Where a session is in its one-shot autocalibration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutocalibrationState {
    #[default]
    NotStarted,
    Started,
    Completed,
}

/// Observation fed into the state machine after talking to the engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CalibrationEvent {
    /// The engine found the four reference markers and began collecting.
    StartAccepted,
    /// Fewer than four reference markers were visible; try again next frame.
    NotEnoughMarkers,
    /// The engine is still collecting frames.
    StillRunning,
    /// The engine finished computing the space transform.
    Finished,
}

/// Side effect the session must carry out for a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CalibrationAction {
    None,
    /// Write the computed space transform to the request's output path.
    Persist,
}

impl AutocalibrationState {
    pub fn transition(self, event: CalibrationEvent) -> (Self, CalibrationAction) {
        use AutocalibrationState::*;
        use CalibrationEvent::*;
        match (self, event) {
            (NotStarted, StartAccepted) => (Started, CalibrationAction::None),
            (NotStarted, NotEnoughMarkers) => (NotStarted, CalibrationAction::None),
            (Started, StillRunning) => (Started, CalibrationAction::None),
            (Started, Finished) => (Completed, CalibrationAction::Persist),
            (state, _) => (state, CalibrationAction::None),
        }
    }

    pub fn is_started(self) -> bool {
        self == AutocalibrationState::Started
    }

    pub fn is_completed(self) -> bool {
        self == AutocalibrationState::Completed
    }
}

/// Size of the calibration field spanned by the four reference markers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDimensions {
    /// X dimension of the resulting coordinate system.
    pub length: f32,
    /// Y dimension of the resulting coordinate system.
    pub width: f32,
}

impl Default for FieldDimensions {
    fn default() -> Self {
        Self {
            length: 1.0,
            width: 1.0,
        }
    }
}

impl FieldDimensions {
    pub fn new(length: f32, width: f32) -> Self {
        Self { length, width }
    }

    pub fn is_valid(&self) -> bool {
        self.length.is_finite() && self.width.is_finite() && self.length > 0.0 && self.width > 0.0
    }
}

/// Per-call inputs of `detect_and_calibrate`.
#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationRequest {
    /// Where the engine writes the space transform once calibration finishes.
    pub out_path: PathBuf,
    pub field: FieldDimensions,
    /// Engine debug output for this call.
    pub debug: bool,
}

impl CalibrationRequest {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            field: FieldDimensions::default(),
            debug: false,
        }
    }

    pub fn with_field(mut self, length: f32, width: f32) -> Self {
        self.field = FieldDimensions::new(length, width);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Markers found in the frame, plus whether this call wrote the calibration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub markers: Vec<Marker>,
    pub saved: bool,
}
