//! Environment configuration.
//!
//! The embedding application normally calls [`crate::Megazord::configure`]
//! directly. Deployments that cannot change code may instead set the
//! variables in [`env_vars`], read once through [`MegazordConfig::from_env`].

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable names.
pub mod env_vars {
    /// Name of the aggregate library to bind against.
    pub const LIBRARY: &str = "MEGAZORD_LIBRARY";
    /// Version embedded in that library.
    pub const VERSION: &str = "MEGAZORD_VERSION";
    /// Extra directories searched for aggregate libraries.
    pub const LIBRARY_PATH: &str = "MEGAZORD_LIBRARY_PATH";
    /// Emit CLI logs as JSON.
    pub const LOG_JSON: &str = "MEGAZORD_LOG_JSON";
}

/// An explicitly configured aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegazordConfig {
    pub library: String,
    pub version: String,
}

impl MegazordConfig {
    pub fn new(library: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            version: version.into(),
        }
    }

    /// Read the configured aggregate from the process environment.
    ///
    /// Returns `Ok(None)` when neither variable is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Read the configured aggregate through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let library = read_var(&lookup, env_vars::LIBRARY)?;
        let version = read_var(&lookup, env_vars::VERSION)?;

        match (library, version) {
            (Some(library), Some(version)) => Ok(Some(Self { library, version })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::Incomplete {
                set: env_vars::LIBRARY,
                missing: env_vars::VERSION,
            }),
            (None, Some(_)) => Err(ConfigError::Incomplete {
                set: env_vars::VERSION,
                missing: env_vars::LIBRARY,
            }),
        }
    }
}

fn read_var<F>(lookup: &F, name: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .into_string()
            .map(Some)
            .map_err(|_| ConfigError::NotUnicode(name)),
    }
}

/// Search directories listed in `MEGAZORD_LIBRARY_PATH`, in order.
pub fn search_paths_from_env() -> Vec<PathBuf> {
    std::env::var_os(env_vars::LIBRARY_PATH)
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default()
}

/// Whether `MEGAZORD_LOG_JSON` asks for JSON log output.
pub fn log_json() -> bool {
    std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}
