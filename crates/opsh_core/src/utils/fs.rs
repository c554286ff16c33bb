use std::path::{Path, PathBuf};

use crate::Context;

/// Converts a path to a string.
///
/// Non-unicode characters are replaced in the returned string.
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().to_string()
}

/// Resolves a path relative to a context's working directory.
///
/// Absolute paths are returned as-is.
pub fn resolve_path<P: AsRef<Path>>(context: &Context, path: P) -> PathBuf {
    context.pwd().join(path)
}
