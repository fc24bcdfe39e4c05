//! Composable component descriptors for depth registration and point clouds

use super::camera::CameraSource;
use super::topic::{self, synthesize, TopicPath, TopicTemplate};
use serde::Serialize;

/// Package providing both component plugins
pub const COMPONENT_PACKAGE: &str = "depth_image_proc";

/// Kind of component hosted in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Registers a depth image into the frame of the matching RGB camera
    RegisterDepth,
    /// Fuses registered depth with RGB into a colored point cloud
    PointCloudXyzrgb,
}

/// Internal topic names and the templates their external names come from.
const REGISTER_DEPTH_REMAPPINGS: &[(&str, TopicTemplate)] = &[
    ("depth/image_rect", topic::DEPTH_IMAGE),
    ("depth/camera_info", topic::DEPTH_CAMERA_INFO),
    ("rgb/camera_info", topic::RGB_CAMERA_INFO),
    ("depth_registered/image_rect", topic::REGISTERED_IMAGE),
    ("depth_registered/camera_info", topic::REGISTERED_CAMERA_INFO),
];

const POINT_CLOUD_REMAPPINGS: &[(&str, TopicTemplate)] = &[
    ("rgb/camera_info", topic::RGB_CAMERA_INFO),
    ("rgb/image_rect_color", topic::RGB_IMAGE),
    ("depth_registered/image_rect", topic::REGISTERED_IMAGE),
    ("points", topic::REGISTERED_POINTS),
];

impl ComponentKind {
    pub fn plugin(&self) -> &'static str {
        match self {
            ComponentKind::RegisterDepth => "depth_image_proc::RegisterNode",
            ComponentKind::PointCloudXyzrgb => "depth_image_proc::PointCloudXyzrgbNode",
        }
    }

    /// Prefix of the per-camera component name
    pub fn name_prefix(&self) -> &'static str {
        match self {
            ComponentKind::RegisterDepth => "register_node",
            ComponentKind::PointCloudXyzrgb => "point_cloud_xyzrgb_node",
        }
    }

    fn remapping_table(&self) -> &'static [(&'static str, TopicTemplate)] {
        match self {
            ComponentKind::RegisterDepth => REGISTER_DEPTH_REMAPPINGS,
            ComponentKind::PointCloudXyzrgb => POINT_CLOUD_REMAPPINGS,
        }
    }

    /// Describe the component of this kind serving `camera`
    pub fn describe(&self, camera: CameraSource, namespace: &str) -> ComponentDescriptor {
        let remappings = self
            .remapping_table()
            .iter()
            .map(|&(internal, template)| Remapping {
                internal,
                external: synthesize(template, camera),
            })
            .collect();

        ComponentDescriptor {
            kind: *self,
            package: COMPONENT_PACKAGE,
            plugin: self.plugin(),
            name: format!("{}_{}", self.name_prefix(), camera),
            namespace: namespace.to_string(),
            camera,
            remappings,
        }
    }
}

/// Maps a component's fixed internal topic to its pipeline-wide name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remapping {
    pub internal: &'static str,
    pub external: TopicPath,
}

/// A component to be loaded into the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDescriptor {
    pub kind: ComponentKind,
    pub package: &'static str,
    pub plugin: &'static str,
    pub name: String,
    pub namespace: String,
    pub camera: CameraSource,
    pub remappings: Vec<Remapping>,
}

impl ComponentDescriptor {
    /// External topic for an internal name, if this component remaps it
    pub fn remapped(&self, internal: &str) -> Option<&TopicPath> {
        self.remappings
            .iter()
            .find(|r| r.internal == internal)
            .map(|r| &r.external)
    }
}

/// One `RegisterDepth` component per camera
pub fn depth_registration_components(
    cameras: &[CameraSource],
    namespace: &str,
) -> Vec<ComponentDescriptor> {
    build(ComponentKind::RegisterDepth, cameras, namespace)
}

/// One `PointCloudXyzrgb` component per camera
pub fn point_cloud_components(cameras: &[CameraSource], namespace: &str) -> Vec<ComponentDescriptor> {
    build(ComponentKind::PointCloudXyzrgb, cameras, namespace)
}

fn build(kind: ComponentKind, cameras: &[CameraSource], namespace: &str) -> Vec<ComponentDescriptor> {
    cameras
        .iter()
        .map(|camera| kind.describe(*camera, namespace))
        .collect()
}
