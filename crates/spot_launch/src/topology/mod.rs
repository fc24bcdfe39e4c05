//! Compilation of launch arguments into a component topology

pub mod assembler;
pub mod camera;
pub mod component;
pub mod mode;
mod plan;
pub mod topic;

pub use assembler::*;
pub use camera::{sources, CameraSource, BODY_CAMERAS};
pub use component::{
    depth_registration_components, point_cloud_components, ComponentDescriptor, ComponentKind,
    Remapping,
};
pub use mode::{resolve_mode, resolve_point_cloud_policy, DepthRegisteredMode};
pub use topic::{synthesize, Segment, TopicPath, TopicTemplate};
