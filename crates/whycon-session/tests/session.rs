mod common;

use common::{config, frame_pixels, marker, ScriptedEngine};
use whycon_core::{CameraCalibration, ChannelOrder, FrameMut, FrameShape, FrameSize, ShapeError};
use whycon_session::{DetectorSession, SessionConfig, SessionError, TransformType};

fn session(engine: ScriptedEngine) -> DetectorSession<ScriptedEngine> {
    DetectorSession::with_camera(config(), CameraCalibration::default(), engine).unwrap()
}

#[test]
fn first_frame_initializes_engine_in_order() {
    let mut s = session(ScriptedEngine::default());
    assert!(!s.is_initialized());

    let mut pixels = frame_pixels(8, 6);
    s.detect(&mut FrameMut::rgb(&mut pixels, 8, 6)).unwrap();

    let engine = s.engine();
    assert_eq!(
        &engine.calls[..7],
        &[
            "init",
            "update_camera_info",
            "set_drawing",
            "set_coordinate_transform",
            "set_debug",
            "load_calibration",
            "process_image",
        ]
    );
    let init = engine.init.as_ref().unwrap();
    assert_eq!((init.width, init.height), (8, 6));
    assert_eq!(init.marker_count, 4);
    assert_eq!((init.id_bits, init.id_samples, init.hamming_distance), (7, 720, 2));
    assert!(init.identify);
    assert!(!init.use_gui);
    assert_eq!(engine.drawing, Some((true, true)));
    assert_eq!(engine.transform, Some(TransformType::None));
    assert_eq!(engine.loaded.len(), 1);
    assert!(engine.loaded[0].ends_with("space.in.bin"));
    assert_eq!(
        s.frame_size(),
        Some(FrameSize {
            width: 8,
            height: 6
        })
    );
}

#[test]
fn later_frames_do_not_reinitialize() {
    let mut s = session(ScriptedEngine::default());
    let mut pixels = frame_pixels(4, 4);
    for _ in 0..5 {
        s.detect(&mut FrameMut::rgb(&mut pixels, 4, 4)).unwrap();
    }
    let engine = s.engine();
    assert_eq!(engine.init_calls, 1);
    assert_eq!(engine.loaded.len(), 1);
    assert_eq!(
        engine.calls.iter().filter(|c| **c == "process_image").count(),
        5
    );
}

#[test]
fn markerless_frames_return_empty_and_leave_calibration_alone() {
    let mut s = session(ScriptedEngine::default());
    let mut pixels = frame_pixels(4, 4);
    for _ in 0..2 {
        let markers = s.detect(&mut FrameMut::rgb(&mut pixels, 4, 4)).unwrap();
        assert!(markers.is_empty());
    }
    assert_eq!(
        s.calibration_state(),
        whycon_session::AutocalibrationState::NotStarted
    );
    assert_eq!(s.engine().start_attempts, 0);
}

#[test]
fn detect_projects_engine_markers_in_order() {
    let engine = ScriptedEngine::with_scene(vec![marker(3, 5.0), marker(-1, 9.0)]);
    let mut s = session(engine);
    let mut pixels = frame_pixels(4, 4);
    let markers = s.detect(&mut FrameMut::rgb(&mut pixels, 4, 4)).unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].id(), Some(3));
    assert_eq!(markers[0].segment.center.x, 5.0);
    assert_eq!(markers[1].id(), None);
    assert_eq!(markers[1].pose.image_center.y, 10.0);
}

#[test]
fn engine_sees_swapped_channels_and_caller_gets_original_back() {
    let mut s = session(ScriptedEngine::default());
    let original = frame_pixels(3, 2);
    let mut pixels = original.clone();
    s.detect(&mut FrameMut::rgb(&mut pixels, 3, 2)).unwrap();

    let (seen, order) = s.engine().seen[0];
    assert_eq!(order, ChannelOrder::ENGINE);
    assert_eq!(seen, [original[2], original[1], original[0]]);
    assert_eq!(pixels, original);
}

#[test]
fn engine_overlay_is_returned_in_caller_order() {
    let engine = ScriptedEngine {
        overlay: Some([200, 100, 0]),
        ..ScriptedEngine::default()
    };
    let mut s = session(engine);
    let mut pixels = frame_pixels(2, 2);
    s.detect(&mut FrameMut::rgb(&mut pixels, 2, 2)).unwrap();
    assert_eq!(&pixels[..3], &[0, 100, 200]);
}

#[test]
fn engine_failure_propagates_and_buffer_is_restored() {
    let engine = ScriptedEngine {
        fail_process: true,
        ..ScriptedEngine::default()
    };
    let mut s = session(engine);
    let original = frame_pixels(5, 5);
    let mut pixels = original.clone();
    let err = s
        .detect(&mut FrameMut::rgb(&mut pixels, 5, 5))
        .unwrap_err();
    assert!(matches!(err, SessionError::Engine(_)));
    assert_eq!(pixels, original);
}

#[test]
fn wrong_channel_count_is_rejected_before_engine_is_touched() {
    let mut s = session(ScriptedEngine::default());
    let original = vec![7u8; 4 * 4 * 4];
    let mut pixels = original.clone();
    let mut frame = FrameMut::new(&mut pixels, FrameShape::new(4, 4, 4));
    let err = s.detect(&mut frame).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Shape(ShapeError::ChannelCount { channels: 4 })
    ));
    assert!(s.engine().calls.is_empty());
    assert!(!s.is_initialized());
    assert_eq!(pixels, original);
}

#[test]
fn short_buffer_is_a_shape_error() {
    let mut s = session(ScriptedEngine::default());
    let mut pixels = vec![0u8; 10];
    let err = s
        .detect(&mut FrameMut::rgb(&mut pixels, 2, 2))
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Shape(ShapeError::BufferLength {
            expected: 12,
            got: 10
        })
    ));
    assert!(s.engine().calls.is_empty());
}

#[test]
fn frame_size_change_after_initialization_fails_explicitly() {
    let mut s = session(ScriptedEngine::default());
    let mut first = frame_pixels(4, 4);
    s.detect(&mut FrameMut::rgb(&mut first, 4, 4)).unwrap();
    let calls_before = s.engine().calls.len();

    let original = frame_pixels(6, 4);
    let mut second = original.clone();
    let err = s
        .detect(&mut FrameMut::rgb(&mut second, 6, 4))
        .unwrap_err();
    match err {
        SessionError::FrameSizeMismatch { expected, actual } => {
            assert_eq!(
                expected,
                FrameSize {
                    width: 4,
                    height: 4
                }
            );
            assert_eq!(
                actual,
                FrameSize {
                    width: 6,
                    height: 4
                }
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(s.engine().calls.len(), calls_before);
    assert_eq!(second, original);
}

#[test]
fn failed_initialization_is_retried_on_next_frame() {
    let engine = ScriptedEngine {
        fail_loads: 1,
        ..ScriptedEngine::with_scene(vec![marker(1, 2.0)])
    };
    let mut s = session(engine);
    let original = frame_pixels(4, 4);
    let mut pixels = original.clone();

    let err = s
        .detect(&mut FrameMut::rgb(&mut pixels, 4, 4))
        .unwrap_err();
    assert!(matches!(err, SessionError::Engine(_)));
    assert!(!s.is_initialized());
    assert_eq!(s.frame_size(), None);
    assert!(!s.engine().calls.contains(&"process_image"));
    assert_eq!(pixels, original);

    let markers = s.detect(&mut FrameMut::rgb(&mut pixels, 4, 4)).unwrap();
    assert_eq!(markers.len(), 1);
    assert!(s.is_initialized());
    let engine = s.engine();
    assert_eq!(engine.init_calls, 2);
    assert_eq!(engine.loaded.len(), 1);
    assert_eq!(
        engine.calls.iter().filter(|c| **c == "process_image").count(),
        1
    );

    s.detect(&mut FrameMut::rgb(&mut pixels, 4, 4)).unwrap();
    assert_eq!(s.engine().init_calls, 2);
}

#[test]
fn config_flags_reach_the_engine() {
    let cfg = config()
        .with_transform(TransformType::TwoD)
        .with_drawing(false, true)
        .with_debug(true);
    let mut s =
        DetectorSession::with_camera(cfg, CameraCalibration::default(), ScriptedEngine::default())
            .unwrap();
    let mut pixels = frame_pixels(2, 2);
    s.detect(&mut FrameMut::rgb(&mut pixels, 2, 2)).unwrap();
    let engine = s.engine();
    assert_eq!(engine.transform, Some(TransformType::TwoD));
    assert_eq!(engine.drawing, Some((false, true)));
    assert_eq!(engine.debug, Some(true));
    assert_eq!(engine.camera, Some(CameraCalibration::default()));
}

#[test]
fn new_loads_camera_calibration_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let camera_path = dir.path().join("camera.json");
    std::fs::write(
        &camera_path,
        r#"{"camera_id": "bench", "intrinsic": [[500.0, 0.0, 2.0], [0.0, 500.0, 2.0], [0.0, 0.0, 1.0]], "distortion": [0.0, 0.0, 0.0, 0.0, 0.0]}"#,
    )
    .unwrap();
    let cfg = SessionConfig::new(&camera_path, dir.path().join("space.bin"), 0.1);
    let mut s = DetectorSession::new(cfg, ScriptedEngine::default()).unwrap();
    approx::assert_relative_eq!(s.camera().fx(), 500.0);

    let mut pixels = frame_pixels(4, 4);
    s.detect(&mut FrameMut::rgb(&mut pixels, 4, 4)).unwrap();
    let pushed = s.engine().camera.as_ref().unwrap();
    assert_eq!(pushed.camera_id.as_deref(), Some("bench"));
}

#[test]
fn missing_camera_calibration_is_a_config_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = SessionConfig::new(dir.path().join("absent.json"), "space.bin", 0.1);
    let err = DetectorSession::new(cfg, ScriptedEngine::default())
        .err()
        .unwrap();
    assert!(matches!(err, SessionError::ConfigLoad { .. }));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let cfg = config().with_marker_count(0);
    let err = DetectorSession::with_camera(cfg, CameraCalibration::default(), ScriptedEngine::default())
        .err()
        .unwrap();
    assert!(matches!(err, SessionError::Config(_)));
}
