//! Spot Launch
//!
//! Compiles the Spot driver launch arguments into the set of nodes and
//! composable components an execution substrate has to start, together with
//! the topic remappings that wire the components to each other.
//!
//! # Overview
//!
//! - Body cameras (`frontleft`, `frontright`, `left`, `right`, `back`) and the
//!   `hand` camera on robots with an arm
//! - Depth registration either on the robot (`from_spot`), on the host through
//!   `depth_image_proc::RegisterNode` components (`from_nodelets`), or not at all
//! - Optional `depth_image_proc::PointCloudXyzrgbNode` components per camera
//!
//! # Example
//!
//! ```no_run
//! use spot_launch::{compile, AmentResolver, LaunchArguments};
//!
//! let args = LaunchArguments::new()
//!     .with_overrides([("has_arm", "True"), ("publish_point_clouds", "true")])
//!     .unwrap();
//! let topology = compile(&args, &AmentResolver::from_env()).unwrap();
//! assert_eq!(topology.components().len(), 12);
//! ```

pub mod cli;
pub mod config;
pub mod resolver;
pub mod topology;

pub use cli::{LaunchArgs, OutputFormat};
pub use config::{ArgDeclaration, ArgumentError, LaunchArguments, SubstitutionError, DECLARATIONS};
pub use resolver::{AmentResolver, PackageResolver, ResolveError, StaticResolver};
pub use topology::{
    assemble, AssembleError, ComponentDescriptor, ComponentKind, DepthRegisteredMode,
    PipelineConfig, ResolvedTopology,
};

/// Errors surfaced by the launch compiler
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("Failed to serialize topology as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize topology as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolve `args` and assemble the topology they describe
pub fn compile<R>(args: &LaunchArguments, resolver: &R) -> Result<ResolvedTopology, LaunchError>
where
    R: PackageResolver + ?Sized,
{
    let config = args.pipeline_config(resolver)?;
    Ok(assemble(&config, resolver)?)
}

/// Render a topology in the requested format
pub fn render(topology: &ResolvedTopology, format: OutputFormat) -> Result<String, LaunchError> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(topology)?,
        OutputFormat::Json => serde_json::to_string_pretty(topology)?,
        OutputFormat::Plan => topology.to_string(),
    })
}
