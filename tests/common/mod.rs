//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Write one markdown document into the wiki directory.
#[allow(dead_code)]
pub fn write_doc(dir: &Path, name: &str, raw: &str) {
    std::fs::write(dir.join(format!("{name}.md")), raw).unwrap();
}

/// Create a small interlinked wiki:
///
/// - `index` links to `alpha` and `beta`
/// - `alpha` links to `beta` (labeled) and a dangling `ghost`
/// - `beta` has no outbound links
/// - `2024-01-01` is a diary page linking to `alpha`
///
/// Returns the wiki directory path (e.g. `<temp_dir>/wiki/`).
#[allow(dead_code)]
pub fn create_test_wiki(temp_dir: &TempDir) -> PathBuf {
    let wiki = temp_dir.path().join("wiki");
    std::fs::create_dir(&wiki).unwrap();

    write_doc(
        &wiki,
        "index",
        "# Home\n\nStart at [[alpha]] or [[beta|the beta page]].\n",
    );
    write_doc(
        &wiki,
        "alpha",
        "# Alpha\n\nSee [[beta|more detail]] and the missing [[ghost]].\n",
    );
    write_doc(&wiki, "beta", "# Beta\n\nNothing links out of here.\n");
    write_doc(&wiki, "2024-01-01", "# Diary\n\nWorked on [[alpha]].\n");

    wiki
}
