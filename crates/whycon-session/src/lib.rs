//! Session layer around a WhyCon/WhyCode marker engine.
//!
//! A [`DetectorSession`] accepts one caller frame at a time and:
//! - validates the `(height, width, 3)` layout before touching anything,
//! - configures the engine once, sized to the first frame,
//! - swaps the frame into the engine's channel order for the duration of the
//!   call and restores it on every exit path,
//! - runs plain detection or the one-shot field autocalibration,
//! - projects engine records into [`whycon_core::Marker`]s.
//!
//! The detection algorithm itself lives behind the [`MarkerEngine`] trait.
//!
//! ## Quickstart
//!
//! ```no_run
//! use whycon_core::FrameMut;
//! use whycon_session::{CalibrationRequest, DetectorSession, MarkerEngine, SessionConfig};
//!
//! fn run<E: MarkerEngine>(engine: E, pixels: &mut [u8]) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::new("camera.json", "space.bin", 0.122);
//!     whycon_core::init_with_level(config.log_level())?;
//!     let mut session = DetectorSession::new(config, engine)?;
//!
//!     let mut frame = FrameMut::rgb(pixels, 640, 480);
//!     let markers = session.detect(&mut frame)?;
//!     println!("found {} markers", markers.len());
//!
//!     let request = CalibrationRequest::new("space.out.bin").with_field(2.0, 1.5);
//!     let result = session.detect_and_calibrate(&mut frame, &request)?;
//!     println!("saved: {}", result.saved);
//!     Ok(())
//! }
//! ```

mod autocalibration;
mod config;
mod engine;
mod projector;
mod session;

pub use autocalibration::{
    AutocalibrationState, CalibrationAction, CalibrationEvent, CalibrationRequest,
    CalibrationResult, FieldDimensions,
};
pub use config::{ConfigError, ConfigIoError, SessionConfig, TransformType};
pub use engine::{
    AutocalibrationStart, EngineError, EngineInit, EngineMarker, EngineSegment,
    EngineTrackedObject, MarkerEngine,
};
pub use projector::{project_marker, project_markers};
pub use session::{DetectorSession, SessionError};
