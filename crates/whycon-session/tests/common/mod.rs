#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use whycon_core::{CameraCalibration, ChannelOrder, RawImageMut};
use whycon_session::{
    AutocalibrationStart, EngineError, EngineInit, EngineMarker, EngineSegment,
    EngineTrackedObject, FieldDimensions, MarkerEngine, SessionConfig, TransformType,
};

/// Engine stand-in that records every call and replays a scripted scene.
#[derive(Default)]
pub struct ScriptedEngine {
    pub calls: Vec<&'static str>,
    pub init: Option<EngineInit>,
    pub init_calls: usize,
    pub camera: Option<CameraCalibration>,
    pub drawing: Option<(bool, bool)>,
    pub transform: Option<TransformType>,
    pub debug: Option<bool>,
    pub field: Option<FieldDimensions>,
    pub loaded: Vec<PathBuf>,
    pub saved: Vec<PathBuf>,

    /// Markers reported on every frame.
    pub scene: Vec<EngineMarker>,
    /// Reference markers visible when autocalibration is requested.
    pub reference_markers: usize,
    /// Overrides `reference_markers` for the next start attempts, one entry each.
    pub reference_markers_per_attempt: VecDeque<usize>,
    /// Frames the engine collects before autocalibration finishes.
    pub frames_to_calibrate: usize,
    pub calibrating: bool,
    pub calibration_frames: usize,
    pub start_attempts: usize,

    /// First pixel and channel order as the engine saw them, per frame.
    pub seen: Vec<([u8; 3], ChannelOrder)>,
    /// Pixel drawn at (0, 0) on every frame, in engine order.
    pub overlay: Option<[u8; 3]>,

    pub fail_init: bool,
    /// Number of upcoming `load_calibration` calls that fail.
    pub fail_loads: usize,
    pub fail_process: bool,
    pub fail_saves: usize,
}

impl ScriptedEngine {
    pub fn with_scene(scene: Vec<EngineMarker>) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    pub fn calibratable(reference_markers: usize, frames_to_calibrate: usize) -> Self {
        Self {
            reference_markers,
            frames_to_calibrate,
            scene: (0..reference_markers as i32)
                .map(|id| marker(id, 10.0 * id as f32))
                .collect(),
            ..Self::default()
        }
    }
}

impl MarkerEngine for ScriptedEngine {
    fn init(&mut self, init: &EngineInit) -> Result<(), EngineError> {
        self.calls.push("init");
        self.init_calls += 1;
        if self.fail_init {
            return Err(EngineError::Init("scripted init failure".into()));
        }
        self.init = Some(init.clone());
        Ok(())
    }

    fn update_camera_info(&mut self, camera: &CameraCalibration) {
        self.calls.push("update_camera_info");
        self.camera = Some(camera.clone());
    }

    fn set_drawing(&mut self, coords: bool, segments: bool) {
        self.calls.push("set_drawing");
        self.drawing = Some((coords, segments));
    }

    fn set_coordinate_transform(&mut self, transform: TransformType) {
        self.calls.push("set_coordinate_transform");
        self.transform = Some(transform);
    }

    fn set_debug(&mut self, debug: bool) {
        self.calls.push("set_debug");
        self.debug = Some(debug);
    }

    fn set_field_dimensions(&mut self, field: FieldDimensions) {
        self.calls.push("set_field_dimensions");
        self.field = Some(field);
    }

    fn load_calibration(&mut self, path: &Path) -> Result<(), EngineError> {
        self.calls.push("load_calibration");
        if self.fail_loads > 0 {
            self.fail_loads -= 1;
            return Err(EngineError::Calibration {
                path: path.to_path_buf(),
                reason: "scripted load failure".into(),
            });
        }
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn save_calibration(&mut self, path: &Path) -> Result<(), EngineError> {
        self.calls.push("save_calibration");
        if self.fail_saves > 0 {
            self.fail_saves -= 1;
            return Err(EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "scripted save failure",
            )));
        }
        self.saved.push(path.to_path_buf());
        Ok(())
    }

    fn process_image(
        &mut self,
        image: &mut RawImageMut<'_>,
        markers: &mut Vec<EngineMarker>,
    ) -> Result<(), EngineError> {
        self.calls.push("process_image");
        if let Some(px) = image.pixel(0, 0) {
            self.seen.push((px, image.order()));
        }
        if let Some(px) = self.overlay {
            image.put_pixel(0, 0, px);
        }
        if self.fail_process {
            return Err(EngineError::backend(std::io::Error::other(
                "scripted processing failure",
            )));
        }
        if self.calibrating {
            self.calibration_frames += 1;
            if self.calibration_frames >= self.frames_to_calibrate {
                self.calibrating = false;
            }
        }
        markers.extend_from_slice(&self.scene);
        Ok(())
    }

    fn start_autocalibration(&mut self) -> Result<AutocalibrationStart, EngineError> {
        self.calls.push("start_autocalibration");
        self.start_attempts += 1;
        let visible = self
            .reference_markers_per_attempt
            .pop_front()
            .unwrap_or(self.reference_markers);
        if visible < 4 {
            return Ok(AutocalibrationStart::NotEnoughMarkers { found: visible });
        }
        self.calibrating = true;
        self.calibration_frames = 0;
        Ok(AutocalibrationStart::Started)
    }

    fn autocalibration_in_progress(&self) -> bool {
        self.calibrating
    }
}

pub fn marker(id: i32, x: f32) -> EngineMarker {
    EngineMarker {
        seg: EngineSegment {
            x,
            y: x + 1.0,
            size: 64,
            valid: true,
            round: true,
            id,
            ..EngineSegment::default()
        },
        obj: EngineTrackedObject {
            u: x,
            v: x + 1.0,
            z: 1.0,
            d: 1.0,
            qw: 1.0,
            ..EngineTrackedObject::default()
        },
    }
}

pub fn config() -> SessionConfig {
    SessionConfig::new("camera.json", "space.in.bin", 0.15)
        .with_marker_count(4)
        .with_id_coding(7, 720, 2)
}

/// Packed RGB test frame with distinct red and blue samples.
pub fn frame_pixels(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| {
            let v = (i % 200) as u8;
            [v, v.wrapping_add(1), v.wrapping_add(50)]
        })
        .collect()
}
