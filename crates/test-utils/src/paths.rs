//! Temporary directories for local tile stores.

/// Creates a temporary directory for a test tile store.
///
/// # Returns
///
/// A `tempfile::TempDir` that will be automatically cleaned up.
pub fn temp_store_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("tile-store-")
        .tempdir()
        .expect("Failed to create temporary store directory")
}
