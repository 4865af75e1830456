//! Runtime selection of the native aggregate ("megazord") library.
//!
//! Several binding modules, each versioned independently, load their native
//! functions from one shared aggregate library. This crate decides which
//! aggregate that is and guarantees no two modules in a process ever bind
//! against different native builds.
//!
//! # Architecture
//!
//! ```text
//!  Megazord::bind ──► Resolver::resolve ──► MegazordRegistry (configured / in use)
//!        │                   │
//!        │                   └──► VersionProbe ──► LibraryLoader (full aggregate)
//!        ▼
//!  LibraryLoader::load ──► FunctionTable::from_library ──► Binding<T>
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use megazord_core::{ComponentIdentity, Megazord};
//!
//! const LOGINS: ComponentIdentity = ComponentIdentity::from_static("logins", "0.6.0");
//!
//! // Once, in the embedding application:
//! Megazord::global().configure("lockbox", "0.6.0");
//!
//! // In the logins binding module:
//! let ffi = Megazord::global().bind::<LoginsFfi>(&LOGINS)?;
//! let count = ffi.call(|t| unsafe { (t.count)() })?;
//! ```

pub mod binding;
pub mod component;
pub mod config;
pub mod error;
pub mod loader;
pub mod probe;
pub mod registry;
pub mod resolve;

use std::sync::Arc;

use once_cell::sync::Lazy;

pub use binding::{Binding, FunctionTable};
pub use component::ComponentIdentity;
pub use config::MegazordConfig;
pub use error::{ConfigError, LoadError, MegazordError, Result};
pub use loader::{DylibLoader, LibraryLoader, NativeLibrary, StaticLibrary, StaticLoader};
pub use megazord_sdk::{FULL_MEGAZORD_LIBRARY, VERSION_SYMBOL};
pub use probe::{ProbeOutcome, VersionProbe};
pub use registry::{MegazordRegistry, RegistrySnapshot};
pub use resolve::Resolver;

static GLOBAL_MEGAZORD: Lazy<Megazord> = Lazy::new(|| {
    Megazord::new(
        MegazordRegistry::global(),
        Arc::new(DylibLoader::from_env()),
    )
});

/// Registry and loader used together to bind components.
pub struct Megazord {
    registry: Arc<MegazordRegistry>,
    loader: Arc<dyn LibraryLoader>,
}

impl Megazord {
    pub fn new(registry: Arc<MegazordRegistry>, loader: Arc<dyn LibraryLoader>) -> Self {
        Self { registry, loader }
    }

    /// The process-wide instance: the global registry and a [`DylibLoader`]
    /// searching `MEGAZORD_LIBRARY_PATH`.
    pub fn global() -> &'static Megazord {
        &GLOBAL_MEGAZORD
    }

    pub fn registry(&self) -> &Arc<MegazordRegistry> {
        &self.registry
    }

    pub fn loader(&self) -> &Arc<dyn LibraryLoader> {
        &self.loader
    }

    /// Name the aggregate every component should bind against.
    ///
    /// Call once, before any component binds.
    pub fn configure(&self, library: impl Into<String>, version: impl Into<String>) {
        self.registry.configure(library, version);
    }

    /// Apply `MEGAZORD_LIBRARY` / `MEGAZORD_VERSION` if set.
    ///
    /// Returns whether a configuration was applied.
    pub fn configure_from_env(&self) -> std::result::Result<bool, ConfigError> {
        match MegazordConfig::from_env()? {
            Some(config) => {
                tracing::info!(
                    library = %config.library,
                    version = %config.version,
                    "Configuring megazord from environment"
                );
                self.configure(config.library, config.version);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve the aggregate name for `component` without loading it.
    pub fn resolve(&self, component: &ComponentIdentity) -> Result<String> {
        Resolver::new(&self.registry, self.loader.as_ref()).resolve(component)
    }

    /// Resolve and load the function table for `component`.
    pub fn bind<T: FunctionTable>(&self, component: &ComponentIdentity) -> Result<Binding<T>> {
        binding::bind(&self.registry, self.loader.as_ref(), component)
    }

    pub fn library_in_use(&self) -> Option<String> {
        self.registry.in_use()
    }
}
