//! Document discovery.
//!
//! Walks a documents root recursively and returns every file whose name ends
//! in the configured document extension. Assets, config files and anything
//! else are never returned, so they can never be rewritten.
//!
//! Symlinks to files are documents like any other; symlinked directories are
//! not descended into.
//!
//! Traversal errors are fatal: a missing root, a root that is a plain file, or
//! an unreadable subdirectory aborts the run rather than silently producing a
//! partial document set.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Documents directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Documents path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to walk documents directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Whether a file name is eligible for frontmatter injection.
///
/// Matching is on the raw name suffix, so `notes.MD` is not a document when
/// the extension is `md`.
pub fn is_document(file_name: &str, extension: &str) -> bool {
    file_name
        .strip_suffix(extension)
        .is_some_and(|rest| rest.ends_with('.'))
}

/// Collect every document under `root`.
///
/// Paths are joined onto `root` and returned sorted so reporting is stable;
/// nothing downstream relies on the order.
pub fn locate_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>, LocateError> {
    if !root.exists() {
        return Err(LocateError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LocateError::NotADirectory(root.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        // Symlinks count when they resolve to a regular file.
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        if !is_file {
            if entry.path_is_symlink() {
                debug!(path = %entry.path().display(), "ignoring symlink that is not a file");
            }
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_document(&name, extension) {
            documents.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "ignoring non-document file");
        }
    }

    documents.sort();
    Ok(documents)
}
