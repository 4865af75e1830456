//! Process-wide megazord state.
//!
//! The registry is the single source of truth for which aggregate has been
//! configured and which one is actually in use. Every read and write goes
//! through one mutex, and nothing inside the lock does I/O.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;

static GLOBAL_REGISTRY: Lazy<Arc<MegazordRegistry>> =
    Lazy::new(|| Arc::new(MegazordRegistry::new()));

#[derive(Debug, Default)]
struct RegistryState {
    configured_library: Option<String>,
    configured_version: Option<String>,
    library_in_use: Option<String>,
}

/// Point-in-time copy of the registry, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub configured_library: Option<String>,
    pub configured_version: Option<String>,
    pub library_in_use: Option<String>,
}

/// Which aggregate is configured and which one is in use.
///
/// `library_in_use` is written at most once and never cleared.
#[derive(Debug, Default)]
pub struct MegazordRegistry {
    state: Mutex<RegistryState>,
}

impl MegazordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> Arc<MegazordRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Record the aggregate chosen by the embedding application.
    ///
    /// Last write wins. Reconfiguring after a different library was committed
    /// is accepted but will make the next resolution fail.
    pub fn configure(&self, library: impl Into<String>, version: impl Into<String>) {
        let library = library.into();
        let version = version.into();

        let previous = {
            let mut state = self.state.lock();
            state.configured_library = Some(library.clone());
            state.configured_version = Some(version);
            state.library_in_use.clone()
        };

        if let Some(in_use) = previous.filter(|in_use| *in_use != library) {
            tracing::warn!(
                in_use = %in_use,
                library = %library,
                "Megazord reconfigured after another library was committed"
            );
        }
    }

    /// Configured library name and version, if any.
    pub fn configured(&self) -> (Option<String>, Option<String>) {
        let state = self.state.lock();
        (
            state.configured_library.clone(),
            state.configured_version.clone(),
        )
    }

    pub fn in_use(&self) -> Option<String> {
        self.state.lock().library_in_use.clone()
    }

    /// Commit `library` as the one in use unless a library is already
    /// committed. Returns the committed value either way.
    pub fn commit_in_use(&self, library: &str) -> String {
        let committed = {
            let mut state = self.state.lock();
            if let Some(in_use) = &state.library_in_use {
                return in_use.clone();
            }
            state.library_in_use = Some(library.to_string());
            library.to_string()
        };

        tracing::info!(library = %committed, "Committed megazord library");
        committed
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.lock();
        RegistrySnapshot {
            configured_library: state.configured_library.clone(),
            configured_version: state.configured_version.clone(),
            library_in_use: state.library_in_use.clone(),
        }
    }
}
