//! Shared-object loader for .so/.dylib/.dll aggregates.

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::Library;
use parking_lot::Mutex;

use super::{LibraryLoader, NativeLibrary};
use crate::config;
use crate::error::LoadError;

/// An aggregate opened from disk.
pub struct DylibLibrary {
    name: String,
    path: PathBuf,
    library: Library,
}

impl DylibLibrary {
    /// Path the library was opened from (a bare file name when the system
    /// search path found it).
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeLibrary for DylibLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self, symbol: &str) -> Result<*const c_void, LoadError> {
        // SAFETY: the symbol is read as an opaque address; callers type it.
        let address = unsafe { self.library.get::<*const c_void>(symbol.as_bytes()) }
            .map(|sym| *sym)
            .map_err(|e| LoadError::MissingSymbol {
                library: self.name.clone(),
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        if address.is_null() {
            return Err(LoadError::MissingSymbol {
                library: self.name.clone(),
                symbol: symbol.to_string(),
                reason: "symbol resolved to null".to_string(),
            });
        }

        Ok(address)
    }
}

/// Loader for aggregates shipped as shared libraries.
///
/// An aggregate name maps to the platform file name (`megazord` becomes
/// `libmegazord.so`, `libmegazord.dylib` or `megazord.dll`). Configured
/// search directories are tried first, in order, then the system search path.
///
/// Opened libraries are cached by name and never unloaded, so function
/// pointers handed to binding modules stay valid for the process lifetime.
pub struct DylibLoader {
    search_paths: Vec<PathBuf>,
    loaded: Mutex<HashMap<String, Arc<DylibLibrary>>>,
}

impl DylibLoader {
    /// Loader using only the system search path.
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Loader searching `MEGAZORD_LIBRARY_PATH` before the system path.
    pub fn from_env() -> Self {
        let mut loader = Self::new();
        for path in config::search_paths_from_env() {
            loader.add_search_path(path);
        }
        loader
    }

    /// Add a directory to search before the system path.
    pub fn add_search_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.add_search_path(path);
        self
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Path `name` was opened from, once it has been loaded.
    pub fn loaded_path(&self, name: &str) -> Option<PathBuf> {
        self.loaded
            .lock()
            .get(name)
            .map(|library| library.path().to_path_buf())
    }

    /// Paths tried for `name`, in order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let file_name = libloading::library_filename(name);

        let mut candidates: Vec<PathBuf> = self
            .search_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .filter(|path| path.is_file())
            .collect();
        candidates.push(PathBuf::from(file_name));
        candidates
    }
}

impl Default for DylibLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryLoader for DylibLoader {
    fn load(&self, name: &str) -> Result<Arc<dyn NativeLibrary>, LoadError> {
        if let Some(library) = self.loaded.lock().get(name) {
            return Ok(library.clone());
        }

        let mut last_error = None;
        for path in self.candidates(name) {
            // SAFETY: aggregate libraries run no initialisation code with
            // preconditions beyond those of any Rust cdylib.
            match unsafe { Library::new(&path) } {
                Ok(library) => {
                    tracing::debug!(library = name, path = %path.display(), "Loaded aggregate library");
                    let library = Arc::new(DylibLibrary {
                        name: name.to_string(),
                        path,
                        library,
                    });
                    // Another thread may have won the race; keep its handle.
                    let mut loaded = self.loaded.lock();
                    let library = loaded.entry(name.to_string()).or_insert(library).clone();
                    return Ok(library);
                }
                Err(e) => {
                    tracing::trace!(library = name, path = %path.display(), error = %e, "Candidate failed to load");
                    last_error = Some(e.to_string());
                }
            }
        }

        Err(LoadError::NotFound {
            library: name.to_string(),
            reason: last_error.unwrap_or_else(|| "no candidate paths".to_string()),
        })
    }
}
