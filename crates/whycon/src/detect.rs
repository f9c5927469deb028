use crate::core::{FrameMut, Marker};
use crate::session::{
    CalibrationRequest, CalibrationResult, DetectorSession, MarkerEngine, SessionError,
};

/// Borrow an `image::RgbImage` as a caller-order frame.
pub fn rgb_frame(img: &mut ::image::RgbImage) -> FrameMut<'_> {
    let (width, height) = img.dimensions();
    FrameMut::rgb(&mut **img, width as usize, height as usize)
}

/// Run plain detection on an RGB image.
///
/// The image is handed back unchanged apart from whatever the engine draws.
pub fn detect_rgb_image<E: MarkerEngine>(
    session: &mut DetectorSession<E>,
    img: &mut ::image::RgbImage,
) -> Result<Vec<Marker>, SessionError> {
    session.detect(&mut rgb_frame(img))
}

/// Run detection plus one autocalibration step on an RGB image.
pub fn detect_and_calibrate_rgb_image<E: MarkerEngine>(
    session: &mut DetectorSession<E>,
    img: &mut ::image::RgbImage,
    request: &CalibrationRequest,
) -> Result<CalibrationResult, SessionError> {
    session.detect_and_calibrate(&mut rgb_frame(img), request)
}
