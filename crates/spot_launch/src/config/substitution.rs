//! Substitution engine for $(arg), $(env), $(find-pkg-share) patterns

use crate::resolver::{PackageResolver, ResolveError};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching substitution patterns: $(type value)
static SUBSTITUTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([\w-]+)\s+([^)]+)\)|\$\(([\w-]+)\)").unwrap());

const MAX_ITERATIONS: usize = 10;

/// Substitution context containing all available variables
#[derive(Debug, Clone, Default)]
pub struct SubstitutionContext {
    /// Launch arguments
    pub args: HashMap<String, String>,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args<I, K, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.args
            .extend(args.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Substitute all patterns in a string, repeating until nothing changes
    pub fn substitute<R>(&self, input: &str, resolver: &R) -> Result<String, SubstitutionError>
    where
        R: PackageResolver + ?Sized,
    {
        let mut result = input.to_string();
        let mut last_result = String::new();
        let mut iterations = 0;

        while result != last_result && iterations < MAX_ITERATIONS {
            last_result = result.clone();
            result = self.substitute_once(&result, resolver)?;
            iterations += 1;
        }

        if iterations >= MAX_ITERATIONS && result.contains("$(") {
            return Err(SubstitutionError::MaxIterationsExceeded(input.to_string()));
        }

        Ok(result)
    }

    fn substitute_once<R>(&self, input: &str, resolver: &R) -> Result<String, SubstitutionError>
    where
        R: PackageResolver + ?Sized,
    {
        let mut error: Option<SubstitutionError> = None;

        let result = SUBSTITUTION_PATTERN.replace_all(input, |caps: &Captures| {
            if error.is_some() {
                return String::new();
            }

            match self.resolve_capture(caps, resolver) {
                Ok(value) => value,
                Err(e) => {
                    error = Some(e);
                    String::new()
                }
            }
        });

        if let Some(e) = error {
            return Err(e);
        }

        Ok(result.into_owned())
    }

    fn resolve_capture<R>(&self, caps: &Captures, resolver: &R) -> Result<String, SubstitutionError>
    where
        R: PackageResolver + ?Sized,
    {
        // $(type value)
        if let (Some(subst_type), Some(value)) = (caps.get(1), caps.get(2)) {
            return self.resolve_typed(subst_type.as_str(), value.as_str().trim(), resolver);
        }

        // $(type)
        if let Some(subst_type) = caps.get(3) {
            return self.resolve_typed(subst_type.as_str(), "", resolver);
        }

        Err(SubstitutionError::InvalidPattern(
            caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
        ))
    }

    fn resolve_typed<R>(
        &self,
        subst_type: &str,
        value: &str,
        resolver: &R,
    ) -> Result<String, SubstitutionError>
    where
        R: PackageResolver + ?Sized,
    {
        match subst_type {
            "arg" | "var" => self.resolve_arg(value),
            "env" => self.resolve_env(value),
            "find-pkg-share" => resolver
                .find_package_share(value)
                .map(|path| path.to_string_lossy().into_owned())
                .map_err(SubstitutionError::Resolve),
            _ => Err(SubstitutionError::UnknownType(subst_type.to_string())),
        }
    }

    fn resolve_arg(&self, name: &str) -> Result<String, SubstitutionError> {
        self.args
            .get(name)
            .cloned()
            .ok_or_else(|| SubstitutionError::UndefinedArg(name.to_string()))
    }

    fn resolve_env(&self, name: &str) -> Result<String, SubstitutionError> {
        std::env::var(name).map_err(|_| SubstitutionError::UndefinedEnv(name.to_string()))
    }
}

/// Errors that can occur during substitution
#[derive(Debug, thiserror::Error)]
pub enum SubstitutionError {
    #[error("Unknown substitution type: {0}")]
    UnknownType(String),

    #[error("Undefined argument: {0}")]
    UndefinedArg(String),

    #[error("Undefined environment variable: {0}")]
    UndefinedEnv(String),

    #[error("Invalid substitution pattern: {0}")]
    InvalidPattern(String),

    #[error("Maximum substitution iterations exceeded for: {0}")]
    MaxIterationsExceeded(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
