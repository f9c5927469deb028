use log::{debug, info};
use whycon_core::{adapt, CameraCalibration, FrameMut, FrameSize, Marker};

use crate::autocalibration::{
    AutocalibrationState, CalibrationAction, CalibrationEvent, CalibrationRequest,
    CalibrationResult, FieldDimensions,
};
use crate::config::SessionConfig;
use crate::engine::{AutocalibrationStart, EngineInit, MarkerEngine};
use crate::projector::project_markers;

use super::SessionError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Owns one marker engine and drives it frame by frame.
///
/// The engine is configured on the first frame, sized to that frame. Every
/// later frame must have the same size. Methods take `&mut self`; sharing a
/// session across threads needs an external lock.
pub struct DetectorSession<E> {
    config: SessionConfig,
    camera: CameraCalibration,
    engine: E,
    frame_size: Option<FrameSize>,
    calibration: AutocalibrationState,
    calibration_field: Option<FieldDimensions>,
}

impl<E: MarkerEngine> DetectorSession<E> {
    /// Create a session, reading camera intrinsics from
    /// `config.camera_calibration_path`.
    pub fn new(config: SessionConfig, engine: E) -> Result<Self, SessionError> {
        let camera = CameraCalibration::load_json(&config.camera_calibration_path).map_err(
            |source| SessionError::ConfigLoad {
                path: config.camera_calibration_path.clone(),
                source,
            },
        )?;
        Self::with_camera(config, camera, engine)
    }

    /// Create a session with already loaded camera intrinsics.
    pub fn with_camera(
        config: SessionConfig,
        camera: CameraCalibration,
        engine: E,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        debug!(
            "session created: camera={} space_transform={} camera_id={:?}",
            config.camera_calibration_path.display(),
            config.space_transform_path.display(),
            camera.camera_id
        );
        Ok(Self {
            config,
            camera,
            engine,
            frame_size: None,
            calibration: AutocalibrationState::NotStarted,
            calibration_field: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraCalibration {
        &self.camera
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Size latched by the first frame, if any frame was processed.
    pub fn frame_size(&self) -> Option<FrameSize> {
        self.frame_size
    }

    pub fn is_initialized(&self) -> bool {
        self.frame_size.is_some()
    }

    pub fn calibration_state(&self) -> AutocalibrationState {
        self.calibration
    }

    /// Forget any calibration progress so the next `detect_and_calibrate`
    /// starts a new attempt.
    pub fn reset_autocalibration(&mut self) {
        if self.calibration != AutocalibrationState::NotStarted {
            info!("autocalibration reset from {:?}", self.calibration);
        }
        self.calibration = AutocalibrationState::NotStarted;
        self.calibration_field = None;
    }

    /// Configure the engine for frames of `size`. No-op once initialized.
    ///
    /// The size is latched only after every step succeeded, so a failure here
    /// is retried in full on the next frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(width = size.width, height = size.height))
    )]
    pub fn ensure_initialized(&mut self, size: FrameSize) -> Result<(), SessionError> {
        if self.frame_size.is_some() {
            return Ok(());
        }
        let init = EngineInit::from_config(&self.config, size);
        self.engine.init(&init)?;
        self.engine.update_camera_info(&self.camera);
        self.engine
            .set_drawing(self.config.draw_coords, self.config.draw_segments);
        self.engine.set_coordinate_transform(self.config.transform);
        self.engine.set_debug(self.config.debug);
        self.engine
            .load_calibration(&self.config.space_transform_path)?;

        debug!(
            "engine initialized for {size}: circle_diameter={} markers={} transform={:?} \
             id_bits={} id_samples={} hamming={} identify={} draw_coords={} draw_segments={}",
            init.circle_diameter,
            init.marker_count,
            self.config.transform,
            init.id_bits,
            init.id_samples,
            init.hamming_distance,
            init.identify,
            self.config.draw_coords,
            self.config.draw_segments,
        );
        self.frame_size = Some(size);
        Ok(())
    }

    /// Validate a frame against the required layout and the latched size.
    fn check_frame(&self, frame: &FrameMut<'_>) -> Result<FrameSize, SessionError> {
        let actual = frame.size()?;
        match self.frame_size {
            Some(expected) if expected != actual => {
                Err(SessionError::FrameSizeMismatch { expected, actual })
            }
            _ => Ok(actual),
        }
    }

    /// Detect markers in one frame.
    ///
    /// The frame is swapped into engine order for the duration of the call and
    /// swapped back before returning, also when an error is returned. With
    /// drawing enabled, engine overlays remain in the frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.shape().width, height = frame.shape().height))
    )]
    pub fn detect(&mut self, frame: &mut FrameMut<'_>) -> Result<Vec<Marker>, SessionError> {
        let size = self.check_frame(frame)?;
        self.ensure_initialized(size)?;

        let mut image = adapt(frame)?;
        let mut raw = Vec::new();
        self.engine.process_image(&mut image, &mut raw)?;
        Ok(project_markers(&raw))
    }

    /// Detect markers and advance the field autocalibration.
    ///
    /// While not started, each call asks the engine to begin; without four
    /// visible reference markers it simply tries again on the next call.
    /// Once started, each call checks whether the engine finished and, if so,
    /// writes the result to `request.out_path`. `saved` is `true` only for
    /// the call that wrote it.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, frame, request),
            fields(
                width = frame.shape().width,
                height = frame.shape().height,
                state = ?self.calibration
            )
        )
    )]
    pub fn detect_and_calibrate(
        &mut self,
        frame: &mut FrameMut<'_>,
        request: &CalibrationRequest,
    ) -> Result<CalibrationResult, SessionError> {
        let size = self.check_frame(frame)?;
        self.check_field(request.field)?;
        self.ensure_initialized(size)?;

        let mut image = adapt(frame)?;
        let entry_state = self.calibration;
        self.engine.set_debug(request.debug);
        if !entry_state.is_completed() {
            self.engine.set_field_dimensions(request.field);
        }

        if entry_state == AutocalibrationState::NotStarted {
            let event = match self.engine.start_autocalibration()? {
                AutocalibrationStart::Started => {
                    info!(
                        "autocalibration started (field {}x{})",
                        request.field.length, request.field.width
                    );
                    self.calibration_field = Some(request.field);
                    CalibrationEvent::StartAccepted
                }
                AutocalibrationStart::NotEnoughMarkers { found } => {
                    debug!("autocalibration waiting for 4 reference markers, found {found}");
                    CalibrationEvent::NotEnoughMarkers
                }
            };
            let (next, _) = self.calibration.transition(event);
            self.calibration = next;
        }

        let mut raw = Vec::new();
        self.engine.process_image(&mut image, &mut raw)?;

        let mut saved = false;
        if entry_state.is_started() {
            let event = if self.engine.autocalibration_in_progress() {
                CalibrationEvent::StillRunning
            } else {
                CalibrationEvent::Finished
            };
            let (next, action) = self.calibration.transition(event);
            if action == CalibrationAction::Persist {
                info!(
                    "writing calibration result to {}",
                    request.out_path.display()
                );
                self.engine.save_calibration(&request.out_path)?;
                saved = true;
            }
            self.calibration = next;
        }

        Ok(CalibrationResult {
            markers: project_markers(&raw),
            saved,
        })
    }

    fn check_field(&self, field: FieldDimensions) -> Result<(), SessionError> {
        if !field.is_valid() {
            return Err(SessionError::InvalidField {
                length: field.length,
                width: field.width,
            });
        }
        match self.calibration_field {
            Some(started) if self.calibration.is_started() && started != field => {
                Err(SessionError::FieldChanged {
                    started,
                    requested: field,
                })
            }
            _ => Ok(()),
        }
    }
}
