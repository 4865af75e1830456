//! Binding modules to their resolved aggregate.
//!
//! A binding module describes the native functions it needs as a
//! [`FunctionTable`]. Binding resolves the aggregate, loads it, and builds the
//! table. When the resolved library cannot actually be loaded the binding is
//! still created, in the [`Binding::Unavailable`] state, and the failure is
//! reported on first use. Components that are bound but never exercised do
//! not fail startup.

use std::sync::Arc;

use crate::component::ComponentIdentity;
use crate::error::{LoadError, MegazordError, Result};
use crate::loader::{LibraryLoader, NativeLibrary};
use crate::registry::MegazordRegistry;
use crate::resolve::Resolver;

/// Typed view of the functions a component needs from its aggregate.
///
/// ```rust,ignore
/// struct LoginsFfi {
///     count: unsafe extern "C" fn() -> i64,
/// }
///
/// impl FunctionTable for LoginsFfi {
///     fn from_library(library: &Arc<dyn NativeLibrary>) -> Result<Self, LoadError> {
///         Ok(Self {
///             count: unsafe { library.function("logins_count")? },
///         })
///     }
/// }
/// ```
pub trait FunctionTable: Sized + Send + Sync {
    fn from_library(library: &Arc<dyn NativeLibrary>) -> std::result::Result<Self, LoadError>;
}

/// A component's function table, or the reason it has none.
#[derive(Debug)]
pub enum Binding<T> {
    Live(T),
    /// Always holds [`MegazordError::LibraryUnavailable`].
    Unavailable(MegazordError),
}

impl<T> Binding<T> {
    pub fn is_live(&self) -> bool {
        matches!(self, Binding::Live(_))
    }

    /// The function table, or the deferred load failure.
    pub fn get(&self) -> Result<&T> {
        match self {
            Binding::Live(table) => Ok(table),
            Binding::Unavailable(e) => Err(e.clone()),
        }
    }

    /// Run `f` against the function table.
    pub fn call<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        self.get().map(f)
    }

    pub fn into_inner(self) -> Result<T> {
        match self {
            Binding::Live(table) => Ok(table),
            Binding::Unavailable(e) => Err(e),
        }
    }
}

/// Resolve, load and bind `component`.
///
/// Resolution failures are returned immediately. Load failures, including a
/// symbol missing from the table, produce [`Binding::Unavailable`].
pub fn bind<T: FunctionTable>(
    registry: &MegazordRegistry,
    loader: &dyn LibraryLoader,
    component: &ComponentIdentity,
) -> Result<Binding<T>> {
    let library_name = Resolver::new(registry, loader).resolve(component)?;

    let table = loader
        .load(&library_name)
        .and_then(|library| T::from_library(&library));

    match table {
        Ok(table) => Ok(Binding::Live(table)),
        Err(e) => {
            tracing::warn!(
                component = component.name(),
                library = %library_name,
                error = %e,
                "Megazord library unavailable; calls will fail"
            );
            Ok(Binding::Unavailable(MegazordError::LibraryUnavailable {
                component: component.name().to_string(),
                library: library_name,
                reason: e.to_string(),
            }))
        }
    }
}
