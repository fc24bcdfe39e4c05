//! Launch argument declarations, overrides and conversion into a pipeline config

use super::substitution::{SubstitutionContext, SubstitutionError};
use crate::resolver::PackageResolver;
use crate::topology::PipelineConfig;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// A declared launch argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgDeclaration {
    pub name: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Every argument the launch accepts, in declaration order
pub const DECLARATIONS: &[ArgDeclaration] = &[
    ArgDeclaration {
        name: "config_file",
        default: "",
        description: "Path to configuration file for the driver.",
    },
    ArgDeclaration {
        name: "has_arm",
        default: "False",
        description: "Whether spot has arm",
    },
    ArgDeclaration {
        name: "tf_prefix",
        default: "",
        description: "apply namespace prefix to robot links and joints",
    },
    ArgDeclaration {
        name: "launch_rviz",
        default: "False",
        description: "Launch RViz?",
    },
    ArgDeclaration {
        name: "rviz_config_file",
        default: "",
        description: "RViz config file",
    },
    ArgDeclaration {
        name: "depth_registered_mode",
        default: "from_nodelets",
        description: "One of [disable, from_spot, from_nodelets]. `disable` publishes no registered \
                      depth images, `from_spot` requests them from Spot through its SDK, \
                      `from_nodelets` registers them with RegisterNode components on the host.",
    },
    ArgDeclaration {
        name: "publish_point_clouds",
        default: "false",
        description: "If true, publish a point cloud for each registered depth and RGB camera pair. \
                      Requires depth_registered_mode other than `disable`.",
    },
    ArgDeclaration {
        name: "spot_name",
        default: "",
        description: "Name of Spot",
    },
];

/// Allow-list of strings that read as `true`; everything else is `false`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truthy {
    /// Exact, case-sensitive match
    Exact(&'static [&'static str]),
    /// ASCII case-insensitive match
    IgnoreCase(&'static [&'static str]),
}

impl Truthy {
    pub fn is_true(&self, value: &str) -> bool {
        match self {
            Truthy::Exact(allowed) => allowed.contains(&value),
            Truthy::IgnoreCase(allowed) => allowed.iter().any(|a| a.eq_ignore_ascii_case(value)),
        }
    }
}

pub const HAS_ARM_TRUTHY: Truthy = Truthy::Exact(&["true", "True"]);
pub const POINT_CLOUDS_TRUTHY: Truthy = Truthy::IgnoreCase(&["true"]);
/// Condition strings accepted by the launch substrate
pub const CONDITION_TRUTHY: Truthy = Truthy::IgnoreCase(&["true", "1"]);

/// Declared arguments with their current values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchArguments {
    values: IndexMap<String, String>,
}

impl Default for LaunchArguments {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchArguments {
    /// All arguments at their declared defaults
    pub fn new() -> Self {
        Self {
            values: DECLARATIONS
                .iter()
                .map(|d| (d.name.to_string(), d.default.to_string()))
                .collect(),
        }
    }

    /// Set a declared argument
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ArgumentError> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(ArgumentError::UnknownArgument(name.to_string())),
        }
    }

    /// Apply `(name, value)` overrides in order
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in overrides {
            self.set(name.as_ref(), value)?;
        }
        Ok(self)
    }

    /// Apply overrides from a YAML mapping of argument names to values.
    ///
    /// Values keep the scalar text as written, so `has_arm: TRUE` reads the
    /// same as `-a has_arm:=TRUE`. An empty or null value clears the argument.
    pub fn with_overrides_yaml(self, content: &str) -> Result<Self, ArgumentError> {
        let overrides: IndexMap<String, Option<String>> =
            serde_yaml::from_str(content).map_err(ArgumentError::Parse)?;
        self.with_overrides(
            overrides
                .into_iter()
                .map(|(k, v)| (k, v.unwrap_or_default())),
        )
    }

    /// Apply overrides from a YAML file
    pub fn with_overrides_file(self, path: impl AsRef<Path>) -> Result<Self, ArgumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ArgumentError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        self.with_overrides_yaml(&content)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand substitutions in every value
    pub fn resolve<R>(&self, resolver: &R) -> Result<IndexMap<String, String>, ArgumentError>
    where
        R: PackageResolver + ?Sized,
    {
        let ctx = SubstitutionContext::new().with_args(self.iter());
        self.values
            .iter()
            .map(|(name, value)| {
                ctx.substitute(value, resolver)
                    .map(|resolved| (name.clone(), resolved))
                    .map_err(|source| ArgumentError::Substitution {
                        name: name.clone(),
                        source,
                    })
            })
            .collect()
    }

    /// Resolve substitutions and interpret values as typed pipeline inputs
    pub fn pipeline_config<R>(&self, resolver: &R) -> Result<PipelineConfig, ArgumentError>
    where
        R: PackageResolver + ?Sized,
    {
        let mut resolved = self.resolve(resolver)?;
        let mut take = |name: &str| resolved.swap_remove(name).unwrap_or_default();

        let has_arm_raw = take("has_arm");
        let config_file = take("config_file");

        Ok(PipelineConfig {
            has_arm: HAS_ARM_TRUTHY.is_true(&has_arm_raw),
            has_arm_raw,
            depth_registered_mode_raw: take("depth_registered_mode"),
            publish_point_clouds_raw: POINT_CLOUDS_TRUTHY.is_true(&take("publish_point_clouds")),
            spot_name: take("spot_name"),
            tf_prefix: take("tf_prefix"),
            config_file: (!config_file.is_empty()).then(|| PathBuf::from(config_file)),
            launch_rviz: CONDITION_TRUTHY.is_true(&take("launch_rviz")),
            rviz_config_file: take("rviz_config_file"),
        })
    }
}

/// Errors that can occur while collecting launch arguments
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Failed to read overrides file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse overrides: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Substitution failed in argument '{name}': {source}")]
    Substitution {
        name: String,
        #[source]
        source: SubstitutionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use std::io::Write;

    #[test]
    fn test_defaults_match_declarations() {
        let args = LaunchArguments::new();
        assert_eq!(args.get("has_arm"), Some("False"));
        assert_eq!(args.get("depth_registered_mode"), Some("from_nodelets"));
        assert_eq!(args.get("publish_point_clouds"), Some("false"));
        assert_eq!(args.iter().count(), DECLARATIONS.len());
    }

    #[test]
    fn test_default_pipeline_config() {
        let config = LaunchArguments::new()
            .pipeline_config(&StaticResolver::new())
            .unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let result = LaunchArguments::new().with_overrides([("has_legs", "true")]);
        assert!(matches!(result, Err(ArgumentError::UnknownArgument(ref n)) if n == "has_legs"));
    }

    #[test]
    fn test_has_arm_allow_list() {
        assert!(HAS_ARM_TRUTHY.is_true("true"));
        assert!(HAS_ARM_TRUTHY.is_true("True"));
        // Only the two literal spellings count
        assert!(!HAS_ARM_TRUTHY.is_true("TRUE"));
        assert!(!HAS_ARM_TRUTHY.is_true("1"));
        assert!(!HAS_ARM_TRUTHY.is_true("yes"));
        assert!(!HAS_ARM_TRUTHY.is_true("false"));
    }

    #[test]
    fn test_point_cloud_flag_is_case_insensitive() {
        assert!(POINT_CLOUDS_TRUTHY.is_true("TRUE"));
        assert!(POINT_CLOUDS_TRUTHY.is_true("tRuE"));
        assert!(!POINT_CLOUDS_TRUTHY.is_true("1"));
        assert!(!POINT_CLOUDS_TRUTHY.is_true(""));
    }

    #[test]
    fn test_condition_flag() {
        assert!(CONDITION_TRUTHY.is_true("True"));
        assert!(CONDITION_TRUTHY.is_true("1"));
        assert!(!CONDITION_TRUTHY.is_true("on"));
    }

    #[test]
    fn test_overrides_yaml_stringifies_values() {
        let yaml = r#"
has_arm: true
spot_name: spot1
publish_point_clouds: "True"
"#;
        let args = LaunchArguments::new().with_overrides_yaml(yaml).unwrap();
        assert_eq!(args.get("has_arm"), Some("true"));
        assert_eq!(args.get("spot_name"), Some("spot1"));

        let config = args.pipeline_config(&StaticResolver::new()).unwrap();
        assert!(config.has_arm);
        assert!(config.publish_point_clouds_raw);
    }

    #[test]
    fn test_overrides_yaml_empty_values_clear_arguments() {
        let args = LaunchArguments::new()
            .with_overrides([("tf_prefix", "custom"), ("spot_name", "spot1")])
            .unwrap()
            .with_overrides_yaml("tf_prefix:\nspot_name: ~\nconfig_file: null\n")
            .unwrap();
        assert_eq!(args.get("tf_prefix"), Some(""));
        assert_eq!(args.get("spot_name"), Some(""));

        let config = args.pipeline_config(&StaticResolver::new()).unwrap();
        assert_eq!(config.config_file, None);
    }

    #[test]
    fn test_overrides_yaml_keeps_scalar_text() {
        let yaml = "spot_name: 1.0\nhas_arm: TRUE\nrviz_config_file: 042\n";
        let args = LaunchArguments::new().with_overrides_yaml(yaml).unwrap();
        assert_eq!(args.get("spot_name"), Some("1.0"));
        assert_eq!(args.get("rviz_config_file"), Some("042"));
        assert_eq!(args.get("has_arm"), Some("TRUE"));

        // Same allow-list as `-a has_arm:=TRUE`
        let from_yaml = args.pipeline_config(&StaticResolver::new()).unwrap();
        let from_cli = LaunchArguments::new()
            .with_overrides([("has_arm", "TRUE")])
            .unwrap()
            .pipeline_config(&StaticResolver::new())
            .unwrap();
        assert!(!from_yaml.has_arm);
        assert_eq!(from_yaml.has_arm, from_cli.has_arm);
        assert_eq!(from_yaml.has_arm_raw, "TRUE");
    }

    #[test]
    fn test_overrides_yaml_rejects_nested_values() {
        let result = LaunchArguments::new().with_overrides_yaml("spot_name: [a, b]\n");
        assert!(matches!(result, Err(ArgumentError::Parse(_))));
    }

    #[test]
    fn test_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth_registered_mode: from_spot").unwrap();

        let args = LaunchArguments::new()
            .with_overrides_file(file.path())
            .unwrap();
        assert_eq!(args.get("depth_registered_mode"), Some("from_spot"));
    }

    #[test]
    fn test_missing_overrides_file() {
        let result = LaunchArguments::new().with_overrides_file("/nonexistent/args.yaml");
        assert!(matches!(result, Err(ArgumentError::Io { .. })));
    }

    #[test]
    fn test_values_are_substituted_before_interpretation() {
        let resolver = StaticResolver::new().with_package("spot_driver", "/share/spot_driver");
        let args = LaunchArguments::new()
            .with_overrides([
                ("spot_name", "spot2"),
                ("config_file", "$(find-pkg-share spot_driver)/config/$(arg spot_name).yaml"),
            ])
            .unwrap();

        let config = args.pipeline_config(&resolver).unwrap();
        assert_eq!(
            config.config_file,
            Some(PathBuf::from("/share/spot_driver/config/spot2.yaml"))
        );
    }

    #[test]
    fn test_substitution_error_names_argument() {
        let args = LaunchArguments::new()
            .with_overrides([("tf_prefix", "$(arg nope)")])
            .unwrap();
        let err = args.pipeline_config(&StaticResolver::new()).unwrap_err();
        assert!(matches!(err, ArgumentError::Substitution { ref name, .. } if name == "tf_prefix"));
    }
}
