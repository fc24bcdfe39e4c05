//! Package and executable lookup against the host environment
//!
//! Topology assembly only reaches the host through [`PackageResolver`], so it
//! can be exercised with a [`StaticResolver`] and no installed workspace.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Marker directory of the ament resource index, relative to an install prefix
const PACKAGE_INDEX: &str = "share/ament_index/resource_index/packages";

/// Resolves package share directories and executables.
pub trait PackageResolver {
    /// Installed `share/<package>` directory of a package
    fn find_package_share(&self, package: &str) -> Result<PathBuf, ResolveError>;

    /// Absolute path of an executable
    fn find_executable(&self, name: &str) -> Result<PathBuf, ResolveError>;
}

/// Errors returned by a resolver
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Package '{0}' not found in any ament prefix")]
    PackageNotFound(String),

    #[error("Executable '{0}' not found in PATH")]
    ExecutableNotFound(String),
}

/// Resolver backed by `AMENT_PREFIX_PATH` and `PATH`
#[derive(Debug, Clone, Default)]
pub struct AmentResolver {
    /// Install prefixes, searched in order
    pub prefixes: Vec<PathBuf>,
    /// Directories searched for executables, in order
    pub search_path: Vec<PathBuf>,
}

impl AmentResolver {
    pub fn new(prefixes: Vec<PathBuf>, search_path: Vec<PathBuf>) -> Self {
        Self {
            prefixes,
            search_path,
        }
    }

    /// Capture the current process environment
    pub fn from_env() -> Self {
        let split = |var: &str| {
            std::env::var_os(var)
                .map(|value| std::env::split_paths(&value).collect::<Vec<_>>())
                .unwrap_or_default()
        };
        let resolver = Self::new(split("AMENT_PREFIX_PATH"), split("PATH"));
        log::debug!(
            "Resolver initialized with {} ament prefixes and {} PATH entries",
            resolver.prefixes.len(),
            resolver.search_path.len()
        );
        resolver
    }
}

impl PackageResolver for AmentResolver {
    fn find_package_share(&self, package: &str) -> Result<PathBuf, ResolveError> {
        self.prefixes
            .iter()
            .find(|prefix| prefix.join(PACKAGE_INDEX).join(package).is_file())
            .map(|prefix| prefix.join("share").join(package))
            .ok_or_else(|| ResolveError::PackageNotFound(package.to_string()))
    }

    fn find_executable(&self, name: &str) -> Result<PathBuf, ResolveError> {
        self.search_path
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(|| ResolveError::ExecutableNotFound(name.to_string()))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// In-memory resolver with fixed answers
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    pub packages: HashMap<String, PathBuf>,
    pub executables: HashMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package share directory
    pub fn with_package(mut self, package: impl Into<String>, share: impl Into<PathBuf>) -> Self {
        self.packages.insert(package.into(), share.into());
        self
    }

    /// Register an executable path
    pub fn with_executable(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.executables.insert(name.into(), path.into());
        self
    }
}

impl PackageResolver for StaticResolver {
    fn find_package_share(&self, package: &str) -> Result<PathBuf, ResolveError> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| ResolveError::PackageNotFound(package.to_string()))
    }

    fn find_executable(&self, name: &str) -> Result<PathBuf, ResolveError> {
        self.executables
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::ExecutableNotFound(name.to_string()))
    }
}
