//! Utilities (data file loading).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Read a user-selected data file verbatim.
///
/// A file that does not exist yields `Ok(None)`: nothing is loaded and the
/// caller keeps whatever it was showing.
pub fn read_data_file(path: &Path) -> Result<Option<String>> {
    if path.is_dir() {
        bail!("'{}' is not a file", path.display());
    }
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "data file not found, nothing loaded");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read file '{}'", path.display())),
    }
}
