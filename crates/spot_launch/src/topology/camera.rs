//! Camera source enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// A camera on the robot body (or gripper) that produces a depth/RGB pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSource {
    FrontLeft,
    FrontRight,
    Left,
    Right,
    Back,
    /// Gripper camera, only present on robots with an arm
    Hand,
}

/// Body cameras in the order their components are emitted
pub const BODY_CAMERAS: [CameraSource; 5] = [
    CameraSource::FrontLeft,
    CameraSource::FrontRight,
    CameraSource::Left,
    CameraSource::Right,
    CameraSource::Back,
];

impl CameraSource {
    /// Identifier used in topic and component names
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraSource::FrontLeft => "frontleft",
            CameraSource::FrontRight => "frontright",
            CameraSource::Left => "left",
            CameraSource::Right => "right",
            CameraSource::Back => "back",
            CameraSource::Hand => "hand",
        }
    }
}

impl fmt::Display for CameraSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cameras available on the robot, body cameras first and `hand` last.
pub fn sources(has_arm: bool) -> Vec<CameraSource> {
    let mut cameras = BODY_CAMERAS.to_vec();
    if has_arm {
        cameras.push(CameraSource::Hand);
    }
    cameras
}
