//! Topic name synthesis
//!
//! Every external topic a component is wired to comes from one of the
//! templates below. Components that refer to the same camera get identical
//! names from the same template, which is what makes the wiring line up.
//! Changing a template renames a published topic.

use super::camera::CameraSource;
use serde::{Serialize, Serializer};
use std::fmt;

/// One segment of a topic template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    /// Replaced by the camera identifier
    Camera,
}

/// A fixed sequence of segments with a camera slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicTemplate(pub &'static [Segment]);

use Segment::{Camera, Literal};

pub const DEPTH_IMAGE: TopicTemplate = TopicTemplate(&[Literal("depth"), Camera, Literal("image")]);
pub const DEPTH_CAMERA_INFO: TopicTemplate =
    TopicTemplate(&[Literal("depth"), Camera, Literal("camera_info")]);
pub const RGB_IMAGE: TopicTemplate = TopicTemplate(&[Literal("camera"), Camera, Literal("image")]);
pub const RGB_CAMERA_INFO: TopicTemplate =
    TopicTemplate(&[Literal("camera"), Camera, Literal("camera_info")]);
pub const REGISTERED_IMAGE: TopicTemplate =
    TopicTemplate(&[Literal("depth_registered"), Camera, Literal("image")]);
pub const REGISTERED_CAMERA_INFO: TopicTemplate =
    TopicTemplate(&[Literal("depth_registered"), Camera, Literal("camera_info")]);
pub const REGISTERED_POINTS: TopicTemplate =
    TopicTemplate(&[Literal("depth_registered"), Camera, Literal("points")]);

/// A relative, namespace-independent path whose segments are joined with `/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPath {
    segments: Vec<String>,
}

impl TopicPath {
    /// Build a path from raw segments. An empty trailing segment yields a trailing `/`.
    pub fn join<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for TopicPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl Serialize for TopicPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Substitute `camera` into the template's camera slot.
pub fn synthesize(template: TopicTemplate, camera: CameraSource) -> TopicPath {
    TopicPath::join(template.0.iter().map(|segment| match segment {
        Literal(s) => *s,
        Camera => camera.as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_substitutes_camera() {
        let path = synthesize(DEPTH_IMAGE, CameraSource::FrontLeft);
        assert_eq!(path.to_string(), "depth/frontleft/image");
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let a = synthesize(REGISTERED_POINTS, CameraSource::Hand);
        let b = synthesize(REGISTERED_POINTS, CameraSource::Hand);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "depth_registered/hand/points");
    }

    #[test]
    fn test_join_with_empty_trailing_segment() {
        assert_eq!(TopicPath::join(["spot1", ""]).to_string(), "spot1/");
    }

    #[test]
    fn test_topic_path_serializes_as_string() {
        let path = synthesize(RGB_CAMERA_INFO, CameraSource::Back);
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            "\"camera/back/camera_info\""
        );
    }
}
