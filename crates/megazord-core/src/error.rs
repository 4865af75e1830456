//! Error types for megazord resolution.
//!
//! Resolution failures are deliberately few and mutually exclusive. Each one
//! carries the name of the component that triggered it so the embedding
//! application can tell which binding module failed at startup.

/// Failure raised to a binding module while resolving or using its aggregate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MegazordError {
    /// No aggregate configured and the full aggregate is not present.
    #[error(
        "megazord not initialized for component `{component}`: \
         configure an aggregate library before binding"
    )]
    NotInitialized { component: String },

    /// The candidate aggregate was built from a different version than the
    /// component expects.
    #[error(
        "component `{component}` expects version {expected} but megazord `{library}` has version {}",
        .found.as_deref().unwrap_or("<none>")
    )]
    VersionMismatch {
        component: String,
        expected: String,
        library: String,
        found: Option<String>,
    },

    /// A second, different aggregate was computed after one was committed.
    #[error(
        "component `{component}` resolved megazord `{candidate}` but `{in_use}` is already in use; \
         refusing to mix native builds"
    )]
    MultipleAggregatesInUse {
        component: String,
        in_use: String,
        candidate: String,
    },

    /// The resolved aggregate could not be loaded. Raised when the binding is
    /// first used, not when it is created.
    #[error("megazord `{library}` is not available to component `{component}`: {reason}")]
    LibraryUnavailable {
        component: String,
        library: String,
        reason: String,
    },
}

impl MegazordError {
    /// Name of the component the failure is attributed to.
    pub fn component(&self) -> &str {
        match self {
            MegazordError::NotInitialized { component }
            | MegazordError::VersionMismatch { component, .. }
            | MegazordError::MultipleAggregatesInUse { component, .. }
            | MegazordError::LibraryUnavailable { component, .. } => component,
        }
    }

    /// Short machine-readable kind, used in structured log records.
    pub fn kind(&self) -> &'static str {
        match self {
            MegazordError::NotInitialized { .. } => "not_initialized",
            MegazordError::VersionMismatch { .. } => "version_mismatch",
            MegazordError::MultipleAggregatesInUse { .. } => "multiple_aggregates_in_use",
            MegazordError::LibraryUnavailable { .. } => "library_unavailable",
        }
    }
}

/// Failure of the native loading layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The library could not be opened under any candidate path.
    #[error("library `{library}` not found: {reason}")]
    NotFound { library: String, reason: String },

    /// The library was opened but does not export the symbol.
    #[error("symbol `{symbol}` missing from library `{library}`: {reason}")]
    MissingSymbol {
        library: String,
        symbol: String,
        reason: String,
    },
}

/// Invalid megazord configuration in the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{set} is set but {missing} is not; both must be configured together")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },

    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, MegazordError>;
