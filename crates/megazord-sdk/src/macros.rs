//! Declarative macros for aggregate libraries.

/// Export the version-query function from an aggregate library.
///
/// With no argument the crate's own `CARGO_PKG_VERSION` is embedded.
///
/// # Example
///
/// ```rust,ignore
/// // In the aggregate's lib.rs
/// megazord_sdk::export_megazord_version!("0.6.0");
/// ```
#[macro_export]
macro_rules! export_megazord_version {
    () => {
        #[no_mangle]
        pub extern "C" fn full_megazord_get_version() -> *const $crate::__private::c_char {
            concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const $crate::__private::c_char
        }
    };
    ($version:literal) => {
        #[no_mangle]
        pub extern "C" fn full_megazord_get_version() -> *const $crate::__private::c_char {
            concat!($version, "\0").as_ptr() as *const $crate::__private::c_char
        }
    };
}
