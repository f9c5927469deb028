use nalgebra::{Point2, Point3, Quaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Pixel bounding box of a segment (inclusive bounds).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Inclusive width; saturates on out-of-range engine bounds.
    pub fn width(&self) -> i32 {
        self.max_x.saturating_sub(self.min_x).saturating_add(1)
    }

    /// Inclusive height; saturates on out-of-range engine bounds.
    pub fn height(&self) -> i32 {
        self.max_y.saturating_sub(self.min_y).saturating_add(1)
    }
}

/// Image-space description of one detected ring pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerSegment {
    /// Ellipse center in image coordinates.
    pub center: Point2<f32>,
    pub bbox: BoundingBox,
    /// Number of pixels in the segment.
    pub size: u32,
    /// Mean brightness of the segment.
    pub mean_brightness: i32,
    /// Segment type as reported by the engine (black or white blob).
    pub segment_type: i32,
    /// Result of the first roundness test.
    pub roundness: f32,
    /// Ratio of white to black pixels.
    pub bw_ratio: f32,
    /// Segment passed the initial roundness test.
    pub round: bool,
    /// Segment passed every test and was handed to the pose stage.
    pub valid: bool,
    /// Eigenvalues of the pattern covariance matrix.
    pub eigenvalues: [f32; 2],
    /// Main eigenvector of the pattern covariance matrix.
    pub eigenvector: [f32; 2],
    /// Inner vs. outer ellipse dimension ratios.
    pub ratios: [f32; 2],
    /// Decoded marker ID, when identification is enabled and succeeded.
    pub id: Option<u32>,
}

/// Fixed-axis angles in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Pose of a tracked marker, in the coordinate system selected by the
/// session's transform type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPose {
    /// Marker center in image coordinates.
    pub image_center: Point2<f32>,
    pub position: Point3<f32>,
    /// Distance from the camera.
    pub distance: f32,
    pub euler: EulerAngles,
    /// Rotation around the marker's surface normal.
    pub angle: f32,
    /// Surface normal pointing away from the camera.
    pub normal: Vector3<f32>,
    pub orientation: Quaternion<f32>,
}

/// One detected marker: where it is in the image and where it is in space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub segment: MarkerSegment,
    pub pose: MarkerPose,
}

impl Marker {
    pub fn id(&self) -> Option<u32> {
        self.segment.id
    }
}
