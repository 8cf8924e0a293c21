//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary (`RUST_LOG` applies).
pub fn initialize_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cfgtree=trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Path of a fixture under `tests/data`.
pub fn data_path(file_name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(file_name)
}
