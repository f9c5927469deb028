//! High-level facade crate for the `whycon-*` workspace.
//!
//! This crate provides:
//! - re-exports of the frame/marker primitives and the detector session
//! - (feature-gated) helpers that run a session directly on an `image::RgbImage`
//!
//! ## Quickstart
//!
//! ```no_run
//! use whycon::detect;
//! use whycon::{DetectorSession, MarkerEngine, SessionConfig};
//! use image::ImageReader;
//!
//! # fn run<E: MarkerEngine>(engine: E) -> Result<(), Box<dyn std::error::Error>> {
//! let mut img = ImageReader::open("field.png")?.decode()?.to_rgb8();
//! let config = SessionConfig::new("camera.json", "space.bin", 0.122);
//! let mut session = DetectorSession::new(config, engine)?;
//!
//! let markers = detect::detect_rgb_image(&mut session, &mut img)?;
//! println!("detected: {}", markers.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `whycon::core`: frames, channel order, camera calibration, marker records.
//! - `whycon::session`: engine trait, session configuration, autocalibration.
//! - `whycon::detect` (feature `image`): helpers over `image::RgbImage`.

pub use whycon_core as core;
pub use whycon_session as session;

pub use whycon_core::{CameraCalibration, FrameMut, FrameSize, Marker, MarkerPose, MarkerSegment};
pub use whycon_session::{
    AutocalibrationState, CalibrationRequest, CalibrationResult, DetectorSession, MarkerEngine,
    SessionConfig, SessionError,
};

#[cfg(feature = "image")]
pub mod detect;
