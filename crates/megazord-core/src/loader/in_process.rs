//! In-process symbol tables.
//!
//! Some hosts link the aggregate statically, so there is no file to open.
//! They register the exported functions by hand and serve them through the
//! same [`LibraryLoader`] seam as on-disk libraries.

use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::Arc;

use megazord_sdk::{VersionFn, VERSION_SYMBOL};
use parking_lot::RwLock;

use super::{LibraryLoader, NativeLibrary};
use crate::error::LoadError;

/// A named table of exported symbols.
#[derive(Debug, Clone)]
pub struct StaticLibrary {
    name: String,
    // Addresses are stored as integers so the table is Send + Sync.
    symbols: HashMap<String, usize>,
}

impl StaticLibrary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: HashMap::new(),
        }
    }

    /// Export `address` under `symbol`.
    pub fn with_symbol(mut self, symbol: impl Into<String>, address: *const c_void) -> Self {
        self.symbols.insert(symbol.into(), address as usize);
        self
    }

    /// Export the version-query function.
    pub fn with_version_fn(self, version_fn: VersionFn) -> Self {
        self.with_symbol(VERSION_SYMBOL, version_fn as *const c_void)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

impl NativeLibrary for StaticLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self, symbol: &str) -> Result<*const c_void, LoadError> {
        self.symbols
            .get(symbol)
            .map(|&address| address as *const c_void)
            .ok_or_else(|| LoadError::MissingSymbol {
                library: self.name.clone(),
                symbol: symbol.to_string(),
                reason: "not exported".to_string(),
            })
    }
}

/// Loader serving [`StaticLibrary`] tables registered in process.
#[derive(Default)]
pub struct StaticLoader {
    libraries: RwLock<HashMap<String, Arc<StaticLibrary>>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a library, replacing any previous one with the same name.
    pub fn register(&self, library: StaticLibrary) {
        self.libraries
            .write()
            .insert(library.name.clone(), Arc::new(library));
    }

    pub fn with_library(self, library: StaticLibrary) -> Self {
        self.register(library);
        self
    }

    /// Remove a library so later loads report it absent.
    pub fn unregister(&self, name: &str) -> bool {
        self.libraries.write().remove(name).is_some()
    }
}

impl LibraryLoader for StaticLoader {
    fn load(&self, name: &str) -> Result<Arc<dyn NativeLibrary>, LoadError> {
        match self.libraries.read().get(name) {
            Some(library) => Ok(library.clone()),
            None => Err(LoadError::NotFound {
                library: name.to_string(),
                reason: "not registered in process".to_string(),
            }),
        }
    }
}
