//! The resolution protocol.
//!
//! Given a component and the native version it was generated against, decide
//! which aggregate library it binds to:
//!
//! 1. an aggregate configured by the embedding application, if its version
//!    matches exactly;
//! 2. otherwise the full aggregate, if it is present and its embedded version
//!    matches exactly;
//! 3. never a library different from the one already in use.
//!
//! Probing happens outside the registry lock. Only the final
//! check-and-commit of the library in use is atomic.

use megazord_sdk::FULL_MEGAZORD_LIBRARY;

use crate::component::ComponentIdentity;
use crate::error::{MegazordError, Result};
use crate::loader::LibraryLoader;
use crate::probe::{ProbeOutcome, VersionProbe};
use crate::registry::MegazordRegistry;

/// Resolves components against a registry and a loader.
pub struct Resolver<'a> {
    registry: &'a MegazordRegistry,
    loader: &'a dyn LibraryLoader,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a MegazordRegistry, loader: &'a dyn LibraryLoader) -> Self {
        Self { registry, loader }
    }

    /// Name of the aggregate `component` must load its functions from.
    ///
    /// On success the name is committed as the library in use, if nothing was
    /// committed before. A failed resolution leaves the registry unchanged.
    pub fn resolve(&self, component: &ComponentIdentity) -> Result<String> {
        let result = self
            .candidate(component)
            .and_then(|candidate| self.commit(component, candidate));

        match &result {
            Ok(library) => {
                tracing::debug!(component = component.name(), library = %library, "Resolved megazord");
            }
            Err(e @ MegazordError::MultipleAggregatesInUse { .. }) => {
                tracing::error!(component = component.name(), kind = e.kind(), "{}", e);
            }
            Err(e) => {
                tracing::warn!(component = component.name(), kind = e.kind(), "{}", e);
            }
        }

        result
    }

    /// Steps 1-3: pick a candidate without touching `library_in_use`.
    fn candidate(&self, component: &ComponentIdentity) -> Result<String> {
        let name = component.name();
        let expected = component.expected_version();

        let (configured_library, configured_version) = self.registry.configured();

        let Some(library) = configured_library else {
            let probe = VersionProbe::new(self.loader);
            return match probe.probe_full_aggregate(name, expected) {
                ProbeOutcome::CompatibleVersion => Ok(FULL_MEGAZORD_LIBRARY.to_string()),
                ProbeOutcome::NotPresent => Err(MegazordError::NotInitialized {
                    component: name.to_string(),
                }),
                ProbeOutcome::IncompatibleVersion(found) => Err(MegazordError::VersionMismatch {
                    component: name.to_string(),
                    expected: expected.to_string(),
                    library: FULL_MEGAZORD_LIBRARY.to_string(),
                    found,
                }),
            };
        };

        if configured_version.as_deref() == Some(expected) {
            Ok(library)
        } else {
            Err(MegazordError::VersionMismatch {
                component: name.to_string(),
                expected: expected.to_string(),
                library,
                found: configured_version,
            })
        }
    }

    /// Step 4: commit the candidate, or check it against the committed one.
    fn commit(&self, component: &ComponentIdentity, candidate: String) -> Result<String> {
        let in_use = self.registry.commit_in_use(&candidate);
        if in_use == candidate {
            Ok(candidate)
        } else {
            Err(MegazordError::MultipleAggregatesInUse {
                component: component.name().to_string(),
                in_use,
                candidate,
            })
        }
    }
}
