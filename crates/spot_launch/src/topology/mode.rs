//! Depth registration mode and point cloud policy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where registered depth images come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthRegisteredMode {
    /// No registered depth images are published
    #[default]
    #[serde(rename = "disable")]
    Disabled,
    /// The driver requests registered depth images from the robot
    #[serde(rename = "from_spot")]
    FromDriver,
    /// RegisterNode components on the host produce registered depth images
    #[serde(rename = "from_nodelets")]
    FromComponents,
}

impl DepthRegisteredMode {
    /// Launch argument spelling of the mode
    pub fn as_str(&self) -> &'static str {
        match self {
            DepthRegisteredMode::Disabled => "disable",
            DepthRegisteredMode::FromDriver => "from_spot",
            DepthRegisteredMode::FromComponents => "from_nodelets",
        }
    }
}

impl fmt::Display for DepthRegisteredMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse the `depth_registered_mode` argument.
///
/// Matching is case-insensitive. Any unrecognized value falls back to
/// [`DepthRegisteredMode::Disabled`]; this never fails.
pub fn resolve_mode(raw: &str) -> DepthRegisteredMode {
    match raw.to_lowercase().as_str() {
        "from_spot" => DepthRegisteredMode::FromDriver,
        "from_nodelets" => DepthRegisteredMode::FromComponents,
        "disable" => DepthRegisteredMode::Disabled,
        other => {
            log::warn!(
                "Unrecognized depth_registered_mode '{}', registered depth is disabled",
                other
            );
            DepthRegisteredMode::Disabled
        }
    }
}

/// Point clouds need registered depth, so they are never generated when it is disabled.
pub fn resolve_point_cloud_policy(requested: bool, mode: DepthRegisteredMode) -> bool {
    requested && mode != DepthRegisteredMode::Disabled
}
