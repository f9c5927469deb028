use nalgebra::{Point2, Point3, Quaternion, Vector3};
use whycon_core::{BoundingBox, EulerAngles, Marker, MarkerPose, MarkerSegment};

use crate::engine::{EngineMarker, EngineSegment, EngineTrackedObject};

/// Convert engine records into caller-facing markers, one to one, in order.
pub fn project_markers(raw: &[EngineMarker]) -> Vec<Marker> {
    raw.iter().map(project_marker).collect()
}

pub fn project_marker(raw: &EngineMarker) -> Marker {
    Marker {
        segment: project_segment(&raw.seg),
        pose: project_pose(&raw.obj),
    }
}

fn project_segment(seg: &EngineSegment) -> MarkerSegment {
    MarkerSegment {
        center: Point2::new(seg.x, seg.y),
        bbox: BoundingBox {
            min_x: seg.min_x,
            min_y: seg.min_y,
            max_x: seg.max_x,
            max_y: seg.max_y,
        },
        size: seg.size,
        mean_brightness: seg.mean,
        segment_type: seg.kind,
        roundness: seg.roundness,
        bw_ratio: seg.bw_ratio,
        round: seg.round,
        valid: seg.valid,
        eigenvalues: [seg.m0, seg.m1],
        eigenvector: [seg.v0, seg.v1],
        ratios: [seg.r0, seg.r1],
        id: u32::try_from(seg.id).ok(),
    }
}

fn project_pose(obj: &EngineTrackedObject) -> MarkerPose {
    MarkerPose {
        image_center: Point2::new(obj.u, obj.v),
        position: Point3::new(obj.x, obj.y, obj.z),
        distance: obj.d,
        euler: EulerAngles {
            roll: obj.roll,
            pitch: obj.pitch,
            yaw: obj.yaw,
        },
        angle: obj.angle,
        normal: Vector3::new(obj.n0, obj.n1, obj.n2),
        orientation: Quaternion::new(obj.qw, obj.qx, obj.qy, obj.qz),
    }
}
