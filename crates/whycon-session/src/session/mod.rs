//! Detector session: one engine, lazily initialized from the first frame.
//!
//! This module wires together frame validation, scoped channel-order
//! adaptation, one-time engine configuration, the autocalibration state
//! machine and result projection.

mod error;
mod pipeline;

pub use error::SessionError;
pub use pipeline::DetectorSession;
