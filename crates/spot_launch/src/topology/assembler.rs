//! Topology assembly - combines cameras, modes and component builders into
//! the descriptor set handed to the execution substrate

use super::camera::{sources, CameraSource};
use super::component::{depth_registration_components, point_cloud_components, ComponentDescriptor};
use super::mode::{resolve_mode, resolve_point_cloud_policy, DepthRegisteredMode};
use super::topic::TopicPath;
use crate::resolver::{PackageResolver, ResolveError};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

const DRIVER_PACKAGE: &str = "spot_driver";
const DRIVER_EXECUTABLE: &str = "spot_ros2";
const DESCRIPTION_PACKAGE: &str = "spot_description";
const STATE_PUBLISHER: &str = "robot_state_publisher";
const CONTAINER_PACKAGE: &str = "rclcpp_components";
const CONTAINER_EXECUTABLE: &str = "component_container_mt";
const CONTAINER_NAME: &str = "container";
const OUTPUT_SCREEN: &str = "screen";

/// Typed inputs of a single compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub has_arm: bool,
    /// `has_arm` as given, forwarded to the robot description
    pub has_arm_raw: String,
    pub depth_registered_mode_raw: String,
    pub publish_point_clouds_raw: bool,
    /// Namespace of every node and component
    pub spot_name: String,
    pub tf_prefix: String,
    /// Parameter file merged into the driver parameters
    pub config_file: Option<PathBuf>,
    pub launch_rviz: bool,
    pub rviz_config_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            has_arm: false,
            has_arm_raw: "False".to_string(),
            depth_registered_mode_raw: "from_nodelets".to_string(),
            publish_point_clouds_raw: false,
            spot_name: String::new(),
            tf_prefix: String::new(),
            config_file: None,
            launch_rviz: false,
            rviz_config_file: String::new(),
        }
    }
}

/// A value in a node parameter map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    String(String),
    /// Evaluated by the substrate; the parameter is the command's stdout
    Command { command: Vec<String> },
}

/// One entry of a node's parameter list, applied in order.
///
/// Serialized as a bare path or a plain mapping, the shapes a node's
/// `parameters` list takes in a launch description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterSource {
    File(PathBuf),
    Values(IndexMap<String, ParameterValue>),
}

/// A standalone node process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub package: &'static str,
    pub executable: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub namespace: String,
    pub output: &'static str,
    pub parameters: Vec<ParameterSource>,
}

/// Another launch description included with fixed arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeDescriptor {
    pub launch_file: PathBuf,
    pub launch_arguments: IndexMap<String, String>,
}

/// Multi-threaded component container hosting every component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerDescriptor {
    pub name: &'static str,
    pub package: &'static str,
    pub executable: &'static str,
    pub namespace: String,
    pub output: &'static str,
    pub components: Vec<ComponentDescriptor>,
}

/// The compiled topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTopology {
    pub depth_registered_mode: DepthRegisteredMode,
    pub publish_point_clouds: bool,
    pub cameras: Vec<CameraSource>,
    pub tf_prefix: String,
    pub driver: NodeDescriptor,
    pub state_publisher: NodeDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rviz: Option<IncludeDescriptor>,
    pub container: ContainerDescriptor,
}

/// Launch actions in the order the substrate should start them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchAction<'a> {
    Node(&'a NodeDescriptor),
    Include(&'a IncludeDescriptor),
    Container(&'a ContainerDescriptor),
}

impl ResolvedTopology {
    pub fn actions(&self) -> Vec<LaunchAction<'_>> {
        let mut actions = vec![
            LaunchAction::Node(&self.driver),
            LaunchAction::Node(&self.state_publisher),
        ];
        actions.extend(self.rviz.as_ref().map(LaunchAction::Include));
        actions.push(LaunchAction::Container(&self.container));
        actions
    }

    pub fn components(&self) -> &[ComponentDescriptor] {
        &self.container.components
    }
}

/// Errors that can occur while assembling a topology
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("Failed to resolve {context}: {source}")]
    Resolve {
        context: String,
        #[source]
        source: ResolveError,
    },
}

/// Use `<spot_name>/` as the frame prefix when none is given.
pub fn default_tf_prefix(tf_prefix: &str, spot_name: &str) -> String {
    if tf_prefix.is_empty() && !spot_name.is_empty() {
        TopicPath::join([spot_name, ""]).to_string()
    } else {
        tf_prefix.to_string()
    }
}

/// Compile `config` into the topology to launch.
///
/// The only fallible steps are the resolver lookups; a failed lookup aborts
/// the whole compilation.
pub fn assemble<R>(config: &PipelineConfig, resolver: &R) -> Result<ResolvedTopology, AssembleError>
where
    R: PackageResolver + ?Sized,
{
    let cameras = sources(config.has_arm);
    let mode = resolve_mode(&config.depth_registered_mode_raw);
    let point_clouds = resolve_point_cloud_policy(config.publish_point_clouds_raw, mode);
    log::debug!(
        "Resolved depth_registered_mode={} publish_point_clouds={} cameras={}",
        mode,
        point_clouds,
        cameras.len()
    );

    let namespace = config.spot_name.as_str();
    let tf_prefix = default_tf_prefix(&config.tf_prefix, namespace);

    let driver = driver_node(config, mode);
    let state_publisher = state_publisher_node(config, &tf_prefix, resolver)?;

    let rviz = if config.launch_rviz {
        Some(rviz_include(config, resolver)?)
    } else {
        None
    };

    let registration = match mode {
        DepthRegisteredMode::FromComponents => depth_registration_components(&cameras, namespace),
        _ => Vec::new(),
    };
    let clouds = if point_clouds {
        point_cloud_components(&cameras, namespace)
    } else {
        Vec::new()
    };
    let components: Vec<ComponentDescriptor> = registration.into_iter().chain(clouds).collect();
    log::debug!("Container '{}' hosts {} components", CONTAINER_NAME, components.len());

    Ok(ResolvedTopology {
        depth_registered_mode: mode,
        publish_point_clouds: point_clouds,
        cameras,
        tf_prefix,
        driver,
        state_publisher,
        rviz,
        container: ContainerDescriptor {
            name: CONTAINER_NAME,
            package: CONTAINER_PACKAGE,
            executable: CONTAINER_EXECUTABLE,
            namespace: namespace.to_string(),
            output: OUTPUT_SCREEN,
            components,
        },
    })
}

fn driver_node(config: &PipelineConfig, mode: DepthRegisteredMode) -> NodeDescriptor {
    let mut parameters: Vec<ParameterSource> = config
        .config_file
        .iter()
        .cloned()
        .map(ParameterSource::File)
        .collect();

    let mut values = IndexMap::new();
    values.insert(
        "spot_name".to_string(),
        ParameterValue::String(config.spot_name.clone()),
    );
    values.insert(
        "publish_depth_registered".to_string(),
        ParameterValue::Bool(mode == DepthRegisteredMode::FromDriver),
    );
    parameters.push(ParameterSource::Values(values));

    NodeDescriptor {
        package: DRIVER_PACKAGE,
        executable: DRIVER_EXECUTABLE,
        name: Some(DRIVER_EXECUTABLE),
        namespace: config.spot_name.clone(),
        output: OUTPUT_SCREEN,
        parameters,
    }
}

fn state_publisher_node<R>(
    config: &PipelineConfig,
    tf_prefix: &str,
    resolver: &R,
) -> Result<NodeDescriptor, AssembleError>
where
    R: PackageResolver + ?Sized,
{
    let xacro = resolver
        .find_executable("xacro")
        .map_err(|source| AssembleError::Resolve {
            context: "robot description generator".to_string(),
            source,
        })?;
    let description_share = resolver
        .find_package_share(DESCRIPTION_PACKAGE)
        .map_err(|source| AssembleError::Resolve {
            context: "robot description package".to_string(),
            source,
        })?;

    let urdf = description_share.join("urdf").join("spot.urdf.xacro");
    let command = vec![
        xacro.to_string_lossy().into_owned(),
        urdf.to_string_lossy().into_owned(),
        format!("arm:={}", config.has_arm_raw),
        format!("tf_prefix:={}", tf_prefix),
    ];

    let mut values = IndexMap::new();
    values.insert(
        "robot_description".to_string(),
        ParameterValue::Command { command },
    );

    Ok(NodeDescriptor {
        package: STATE_PUBLISHER,
        executable: STATE_PUBLISHER,
        name: None,
        namespace: config.spot_name.clone(),
        output: OUTPUT_SCREEN,
        parameters: vec![ParameterSource::Values(values)],
    })
}

fn rviz_include<R>(config: &PipelineConfig, resolver: &R) -> Result<IncludeDescriptor, AssembleError>
where
    R: PackageResolver + ?Sized,
{
    let share = resolver
        .find_package_share(DRIVER_PACKAGE)
        .map_err(|source| AssembleError::Resolve {
            context: "rviz launch file".to_string(),
            source,
        })?;

    let mut launch_arguments = IndexMap::new();
    launch_arguments.insert("spot_name".to_string(), config.spot_name.clone());
    launch_arguments.insert(
        "rviz_config_file".to_string(),
        config.rviz_config_file.clone(),
    );

    Ok(IncludeDescriptor {
        launch_file: share.join("launch").join("rviz.launch.py"),
        launch_arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;

    fn resolver() -> StaticResolver {
        StaticResolver::new()
            .with_executable("xacro", "/opt/ros/bin/xacro")
            .with_package("spot_description", "/opt/ros/share/spot_description")
            .with_package("spot_driver", "/opt/ros/share/spot_driver")
    }

    fn driver_values(topology: &ResolvedTopology) -> &IndexMap<String, ParameterValue> {
        match topology.driver.parameters.last() {
            Some(ParameterSource::Values(values)) => values,
            other => panic!("expected driver parameter values, got {:?}", other),
        }
    }

    #[test]
    fn test_default_tf_prefix() {
        assert_eq!(default_tf_prefix("", "spot1"), "spot1/");
        assert_eq!(default_tf_prefix("custom", "spot1"), "custom");
        assert_eq!(default_tf_prefix("", ""), "");
    }

    #[test]
    fn test_defaults_register_depth_without_point_clouds() {
        let topology = assemble(&PipelineConfig::default(), &resolver()).unwrap();
        assert_eq!(topology.depth_registered_mode, DepthRegisteredMode::FromComponents);
        assert!(!topology.publish_point_clouds);
        assert_eq!(topology.components().len(), 5);
        assert!(topology.rviz.is_none());
    }

    #[test]
    fn test_publish_depth_registered_follows_mode() {
        let mut config = PipelineConfig {
            depth_registered_mode_raw: "from_spot".to_string(),
            ..Default::default()
        };
        let topology = assemble(&config, &resolver()).unwrap();
        assert_eq!(
            driver_values(&topology)["publish_depth_registered"],
            ParameterValue::Bool(true)
        );

        config.depth_registered_mode_raw = "from_nodelets".to_string();
        let topology = assemble(&config, &resolver()).unwrap();
        assert_eq!(
            driver_values(&topology)["publish_depth_registered"],
            ParameterValue::Bool(false)
        );
    }

    #[test]
    fn test_config_file_comes_first_in_driver_parameters() {
        let config = PipelineConfig {
            config_file: Some(PathBuf::from("/etc/spot/spot.yaml")),
            spot_name: "spot1".to_string(),
            ..Default::default()
        };
        let topology = assemble(&config, &resolver()).unwrap();
        assert_eq!(
            topology.driver.parameters[0],
            ParameterSource::File(PathBuf::from("/etc/spot/spot.yaml"))
        );
        assert_eq!(
            driver_values(&topology)["spot_name"],
            ParameterValue::String("spot1".to_string())
        );
    }

    #[test]
    fn test_robot_description_command() {
        let config = PipelineConfig {
            has_arm: true,
            has_arm_raw: "True".to_string(),
            spot_name: "spot1".to_string(),
            ..Default::default()
        };
        let topology = assemble(&config, &resolver()).unwrap();
        let ParameterSource::Values(values) = &topology.state_publisher.parameters[0] else {
            panic!("expected robot_description values");
        };
        assert_eq!(
            values["robot_description"],
            ParameterValue::Command {
                command: vec![
                    "/opt/ros/bin/xacro".to_string(),
                    "/opt/ros/share/spot_description/urdf/spot.urdf.xacro".to_string(),
                    "arm:=True".to_string(),
                    "tf_prefix:=spot1/".to_string(),
                ]
            }
        );
        assert_eq!(topology.state_publisher.namespace, "spot1");
    }

    #[test]
    fn test_rviz_include_passes_arguments_through() {
        let config = PipelineConfig {
            launch_rviz: true,
            spot_name: "spot1".to_string(),
            rviz_config_file: "/tmp/spot.rviz".to_string(),
            ..Default::default()
        };
        let topology = assemble(&config, &resolver()).unwrap();
        let rviz = topology.rviz.as_ref().unwrap();
        assert_eq!(
            rviz.launch_file,
            PathBuf::from("/opt/ros/share/spot_driver/launch/rviz.launch.py")
        );
        assert_eq!(rviz.launch_arguments["spot_name"], "spot1");
        assert_eq!(rviz.launch_arguments["rviz_config_file"], "/tmp/spot.rviz");
        assert_eq!(topology.actions().len(), 4);
    }

    #[test]
    fn test_rviz_package_only_resolved_when_included() {
        let resolver = StaticResolver::new()
            .with_executable("xacro", "/usr/bin/xacro")
            .with_package("spot_description", "/share/spot_description");

        assert!(assemble(&PipelineConfig::default(), &resolver).is_ok());

        let config = PipelineConfig {
            launch_rviz: true,
            ..Default::default()
        };
        let err = assemble(&config, &resolver).unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Resolve {
                source: ResolveError::PackageNotFound(ref p),
                ..
            } if p == "spot_driver"
        ));
    }

    #[test]
    fn test_missing_xacro_is_fatal() {
        let resolver = StaticResolver::new().with_package("spot_description", "/share");
        let err = assemble(&PipelineConfig::default(), &resolver).unwrap_err();
        assert!(err.to_string().contains("xacro"));
    }

    #[test]
    fn test_actions_order_without_rviz() {
        let topology = assemble(&PipelineConfig::default(), &resolver()).unwrap();
        let actions = topology.actions();
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], LaunchAction::Node(n) if n.executable == "spot_ros2"));
        assert!(matches!(actions[1], LaunchAction::Node(n) if n.executable == "robot_state_publisher"));
        assert!(matches!(actions[2], LaunchAction::Container(_)));
    }
}
