//! Command-specific CLI tests.

use std::path::{Path, PathBuf};

mod probe_test;
mod resolve_test;

/// Platform file name of aggregate `name`.
fn library_file_name(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.dll", name)
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", name)
    } else {
        format!("lib{}.so", name)
    }
}

/// Copy the `tabs-megazord` fixture cdylib, built alongside the test
/// binaries, into `dir` as aggregate `name`.
fn install_fixture(dir: &Path, name: &str) -> PathBuf {
    let file_name = library_file_name("megazord_tabs_fixture");
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    let fixture = [Some(deps), deps.parent()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| panic!("fixture {} not built under {:?}", file_name, deps));

    let target = dir.join(library_file_name(name));
    std::fs::copy(fixture, &target).unwrap();
    target
}
