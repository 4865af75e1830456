//! Aggregate containing a single `tabs` component.

megazord_sdk::export_megazord_version!("1.0");

#[no_mangle]
pub extern "C" fn tabs_count() -> i64 {
    42
}
