//! Fallback detection of the full aggregate.

use serde::Serialize;

use crate::error::LoadError;
use crate::loader::LibraryLoader;
use megazord_sdk::FULL_MEGAZORD_LIBRARY;

/// Result of probing the full aggregate for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "found", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The full aggregate could not be loaded.
    NotPresent,
    /// Loaded, and its version equals the expected one exactly.
    CompatibleVersion,
    /// Loaded, but the version differs or is absent.
    IncompatibleVersion(Option<String>),
}

/// Probes the conventionally named full aggregate.
pub struct VersionProbe<'a> {
    loader: &'a dyn LibraryLoader,
}

impl<'a> VersionProbe<'a> {
    pub fn new(loader: &'a dyn LibraryLoader) -> Self {
        Self { loader }
    }

    /// Name of the library this probe loads.
    pub fn library(&self) -> &'static str {
        FULL_MEGAZORD_LIBRARY
    }

    /// Compare the full aggregate's embedded version against
    /// `expected_version`.
    ///
    /// Versions are compared as opaque strings. The binding ABI is not stable
    /// across any version difference, so there is no semver leniency.
    pub fn probe_full_aggregate(&self, component: &str, expected_version: &str) -> ProbeOutcome {
        let library = match self.loader.load(FULL_MEGAZORD_LIBRARY) {
            Ok(library) => library,
            Err(e) => {
                tracing::debug!(component, error = %e, "Full megazord not present");
                return ProbeOutcome::NotPresent;
            }
        };

        let found = match library.query_version() {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(component, error = %e, "Full megazord has no version export");
                None
            }
        };

        match found {
            Some(found) if found == expected_version => ProbeOutcome::CompatibleVersion,
            found => ProbeOutcome::IncompatibleVersion(found),
        }
    }

    /// Embedded version of the full aggregate, without comparing it.
    pub fn embedded_version(&self) -> Result<Option<String>, LoadError> {
        crate::loader::read_version(self.loader, FULL_MEGAZORD_LIBRARY)
    }
}
