//! Megazord SDK
//!
//! Contract constants shared between aggregate ("megazord") libraries and the
//! hosts that bind against them. Hosts depend on this crate instead of on any
//! particular aggregate so the contract stays stable across native builds.
//!
//! # Exporting a version
//!
//! Every aggregate that wants to be found by fallback detection exports a
//! single zero-argument function returning its embedded version:
//!
//! ```rust,ignore
//! megazord_sdk::export_megazord_version!("0.6.0");
//! ```
//!
//! The host compares that string to the version each binding module was
//! generated against, byte for byte.

use std::os::raw::c_char;

#[macro_use]
pub mod macros;

/// Name of the full aggregate probed when the embedding application has not
/// configured one.
pub const FULL_MEGAZORD_LIBRARY: &str = "megazord";

/// Symbol of the version-query export.
pub const VERSION_SYMBOL: &str = "full_megazord_get_version";

/// Signature of the version-query export.
///
/// Returns a NUL-terminated string owned by the library, or null when the
/// library carries no version.
pub type VersionFn = unsafe extern "C" fn() -> *const c_char;

/// Re-exports used by the export macros.
#[doc(hidden)]
pub mod __private {
    pub use std::os::raw::c_char;
}
