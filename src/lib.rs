//! # Chapter Frontmatter
//!
//! Prepends navigation frontmatter to a tree of markdown documents that make
//! up the chapters of a book, so a static site generator can render titles,
//! ordering and the parent/child hierarchy.
//!
//! # Pipeline
//!
//! ```text
//! 1. Locate   docs/      →  every `*.md` path       (recursive, read-only)
//! 2. Inject   each path  →  header + original text  (independent per file)
//! ```
//!
//! A run is one collection: a documents root, a display name and the index's
//! base nav order. The index document (`index.md`) takes its title and order
//! from those parameters; every other document is a chapter and carries its own
//! order and title in a `# Chapter N: Title` marker line.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`locate`] | Recursive discovery of document files under a root |
//! | [`marker`] | `# Chapter N: Title` marker line parser |
//! | [`frontmatter`] | Roles, derived metadata, header rendering and detection |
//! | [`inject`] | Per-document read → check → write, and the batch driver |
//! | [`config`] | Optional `frontmatter.toml` loading and validation |
//! | [`output`] | CLI output formatting of per-document status and the summary |
//!
//! # Design Decisions
//!
//! ## Re-runs Are Safe
//!
//! A document whose content (ignoring surrounding whitespace) already starts
//! with `---` is never touched. Running the tool twice with the same arguments
//! leaves every file byte-for-byte identical after the first run.
//!
//! ## No Silent Fallthrough
//!
//! A chapter without a valid marker line fails on its own: it is reported,
//! left untouched, and the rest of the batch still runs. The process exits
//! non-zero at the end so scripts notice.
//!
//! ## Atomic Rewrites
//!
//! Rewrites go to a temporary file beside the original and are renamed into
//! place, so an interrupted run never leaves a truncated chapter.

pub mod config;
pub mod frontmatter;
pub mod inject;
pub mod locate;
pub mod marker;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
