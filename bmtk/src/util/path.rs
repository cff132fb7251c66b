// src/util/path.rs
use std::path::{Path, PathBuf};

/// Expands `~` and `$VAR` in a user supplied path; returns it unchanged when expansion fails
pub fn expand_path(p: &Path) -> PathBuf {
    let Some(s) = p.to_str() else {
        return p.to_path_buf();
    };
    match shellexpand::full(s) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => p.to_path_buf(),
    }
}
