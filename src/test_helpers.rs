//! Shared test utilities for the chapter-frontmatter test suite.
//!
//! Builds throwaway document trees inside a `TempDir` and reads them back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &[
//!     ("index.md", "Welcome"),
//!     ("part-1/ch1.md", "# Chapter 1: Intro"),
//! ]);
//! run(tmp.path(), &handbook(), &Config::default(), false).unwrap();
//! assert!(read(&tmp.path().join("index.md")).starts_with("---"));
//! ```

use std::path::{Path, PathBuf};

use crate::frontmatter::Collection;

/// Write `(relative_path, content)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }
}

/// Read a file as UTF-8. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

/// Paths relative to `root`, `/`-separated, in the given order.
pub fn relative_paths(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap_or_else(|_| panic!("{} is not under {}", p.display(), root.display()))
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

/// The "Handbook" collection with base nav order 1.
pub fn handbook() -> Collection {
    Collection {
        doc_name: "Handbook".to_string(),
        nav_order: 1,
    }
}
