//! Native library loading.
//!
//! The resolver never touches `dlopen` directly. It goes through
//! [`LibraryLoader`], which either hands back a [`NativeLibrary`] or reports
//! the library as absent. Absence is an ordinary outcome here, not a crash.
//!
//! Two loaders ship with the crate:
//! - [`DylibLoader`] opens shared objects from disk with `libloading`
//! - [`StaticLoader`] serves symbol tables registered in process, for
//!   aggregates linked statically into the host binary

pub mod dylib;
pub mod in_process;

use std::ffi::{c_void, CStr};
use std::mem;
use std::sync::Arc;

use megazord_sdk::{VersionFn, VERSION_SYMBOL};

use crate::error::LoadError;

pub use dylib::{DylibLibrary, DylibLoader};
pub use in_process::{StaticLibrary, StaticLoader};

/// A loaded library that can resolve exported symbols.
pub trait NativeLibrary: Send + Sync {
    /// Aggregate name the library was loaded under.
    fn name(&self) -> &str;

    /// Address of an exported symbol.
    fn symbol(&self, symbol: &str) -> Result<*const c_void, LoadError>;
}

/// Capability to open aggregate libraries by name.
pub trait LibraryLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<Arc<dyn NativeLibrary>, LoadError>;
}

impl dyn NativeLibrary {
    /// Resolve an exported function as a typed function pointer.
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type whose signature matches the real
    /// export, and the pointer must not outlive the library.
    pub unsafe fn function<F: Copy>(&self, symbol: &str) -> Result<F, LoadError> {
        debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*const c_void>());
        let address = self.symbol(symbol)?;
        // SAFETY: caller guarantees `F` is a function pointer of the export's type.
        Ok(unsafe { mem::transmute_copy::<*const c_void, F>(&address) })
    }

    /// Call the fixed version-query export.
    ///
    /// `Ok(None)` means the export exists but returned null.
    pub fn query_version(&self) -> Result<Option<String>, LoadError> {
        // SAFETY: every aggregate exports VERSION_SYMBOL with the VersionFn
        // signature; see `megazord_sdk::export_megazord_version!`.
        let version_fn: VersionFn = unsafe { self.function(VERSION_SYMBOL)? };
        let ptr = unsafe { version_fn() };
        if ptr.is_null() {
            return Ok(None);
        }
        // SAFETY: non-null results point at a static NUL-terminated string.
        let version = unsafe { CStr::from_ptr(ptr) };
        Ok(Some(version.to_string_lossy().into_owned()))
    }
}

/// Load `name` and read its embedded version.
pub fn read_version(loader: &dyn LibraryLoader, name: &str) -> Result<Option<String>, LoadError> {
    loader.load(name)?.query_version()
}
