//! Core types for the WhyCon marker session layer.
//!
//! This crate holds the pieces that do not depend on a marker engine:
//! caller frame views and their validation, the scoped channel-order
//! adaptation into the engine's layout, caller-facing marker records, and
//! camera calibration loading.

mod adapter;
mod camera;
mod image;
mod logger;
mod marker;

pub use adapter::{adapt, AdaptedFrame};
pub use camera::{CameraCalibration, CameraCalibrationError, Distortion};
pub use image::{
    ChannelOrder, FrameMut, FrameShape, FrameSize, RawImageMut, ShapeError, COLOR_CHANNELS,
};
pub use marker::{BoundingBox, EulerAngles, Marker, MarkerPose, MarkerSegment};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
