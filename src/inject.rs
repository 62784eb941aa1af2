//! Frontmatter injection.
//!
//! For each located document: read it once, leave it alone if it already opens
//! with a header, otherwise derive its metadata and rewrite it with the
//! generated header prepended.
//!
//! ## Per-document pipeline
//!
//! ```text
//! read ──▶ has header? ──yes──▶ AlreadyPresent
//!               │
//!               no
//!               ▼
//!          classify ──▶ derive metadata ──▶ prepend ──▶ atomic write
//! ```
//!
//! The header check runs before metadata derivation, so re-running on an
//! already-processed tree never trips over chapter markers.
//!
//! ## Crash safety
//!
//! New content is written to a temporary file in the same directory and then
//! renamed over the original. An interrupted run leaves either the untouched
//! original or the complete rewritten file, never a truncated one.
//!
//! ## Failure isolation
//!
//! Marker and I/O failures belong to a single document: [`run`] records them
//! in the [`Report`] and carries on with the rest of the batch. Only failing to
//! enumerate the documents root aborts a run.
//!
//! ## Parallel Processing
//!
//! Documents map to disjoint paths and share nothing but the read-only
//! [`Collection`] and [`Config`], so they are processed in parallel using
//! [rayon](https://docs.rs/rayon). Results keep the locator's path order.

use crate::config::Config;
use crate::frontmatter::{
    Collection, Metadata, Role, classify, derive_metadata, has_frontmatter, prepend_header,
};
use crate::locate::{LocateError, locate_documents};
use crate::marker::MarkerError;
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum InjectError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Chapter marker: {0}")]
    Marker(#[from] MarkerError),
}

/// What happened to a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectOutcome {
    /// Header written to disk.
    Written(Metadata),
    /// Dry run: header derived but nothing written.
    WouldWrite(Metadata),
    /// The document already opens with a header; untouched.
    AlreadyPresent(Role),
}

/// Per-document result of a run.
#[derive(Debug)]
pub struct DocumentResult {
    pub path: PathBuf,
    pub result: Result<InjectOutcome, InjectError>,
}

/// Results of one run over a documents root, in path order.
#[derive(Debug, Default)]
pub struct Report {
    pub documents: Vec<DocumentResult>,
}

impl Report {
    pub fn written(&self) -> usize {
        self.count(|r| {
            matches!(
                r,
                Ok(InjectOutcome::Written(_)) | Ok(InjectOutcome::WouldWrite(_))
            )
        })
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, Ok(InjectOutcome::AlreadyPresent(_))))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| r.is_err())
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    fn count(&self, pred: impl Fn(&Result<InjectOutcome, InjectError>) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.result)).count()
    }
}

/// Inject frontmatter into a single document.
///
/// With `dry_run`, the document is read and its metadata derived exactly as in
/// a real run, but the file is never written.
pub fn inject_document(
    path: &Path,
    collection: &Collection,
    config: &Config,
    dry_run: bool,
) -> Result<InjectOutcome, InjectError> {
    let role = classify(path, &config.index_file);
    let content = fs::read_to_string(path)?;

    if has_frontmatter(&content) {
        debug!(path = %path.display(), role = role.as_str(), "frontmatter already present");
        return Ok(InjectOutcome::AlreadyPresent(role));
    }

    let metadata = derive_metadata(role, &content, collection, &config.marker_prefix)?;
    debug!(
        path = %path.display(),
        role = role.as_str(),
        title = metadata.title(),
        nav_order = metadata.nav_order(),
        "derived metadata"
    );

    if dry_run {
        return Ok(InjectOutcome::WouldWrite(metadata));
    }

    let updated = prepend_header(&metadata, config, &content);
    write_atomic(path, &updated)?;
    Ok(InjectOutcome::Written(metadata))
}

/// Replace a file's content via a sibling temp file and rename.
///
/// Symlinks are resolved first so the link stays a link and its target is
/// rewritten. The original permissions carry over to the new file. Read-only
/// files are refused rather than silently replaced.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let resolved;
    let path = if fs::symlink_metadata(path)?.file_type().is_symlink() {
        resolved = fs::canonicalize(path)?;
        resolved.as_path()
    } else {
        path
    };
    let permissions = fs::metadata(path)?.permissions();
    if permissions.readonly() {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "file is read-only",
        ));
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Locate every document under `root` and inject frontmatter into each.
///
/// Fails only if the root cannot be enumerated; per-document failures are
/// collected in the returned [`Report`].
pub fn run(
    root: &Path,
    collection: &Collection,
    config: &Config,
    dry_run: bool,
) -> Result<Report, LocateError> {
    let paths = locate_documents(root, &config.extension)?;
    info!(
        root = %root.display(),
        documents = paths.len(),
        doc_name = %collection.doc_name,
        dry_run,
        "injecting frontmatter"
    );

    let documents = paths
        .into_par_iter()
        .map(|path| {
            let result = inject_document(&path, collection, config, dry_run);
            if let Err(err) = &result {
                warn!(path = %path.display(), error = %err, "document failed");
            }
            DocumentResult { path, result }
        })
        .collect();

    Ok(Report { documents })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{handbook, read, relative_paths, write_tree};
    use tempfile::TempDir;

    const INDEX_HEADER: &str =
        "---\nlayout: default\ntitle: \"Handbook\"\nnav_order: 1\nhas_children: true\n---\n\n";

    #[test]
    fn index_gets_collection_header() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "Welcome\n")]);
        let path = tmp.path().join("index.md");

        let outcome = inject_document(&path, &handbook(), &Config::default(), false).unwrap();

        assert_eq!(
            outcome,
            InjectOutcome::Written(Metadata::Index {
                title: "Handbook".to_string(),
                nav_order: 1,
            })
        );
        assert_eq!(read(&path), format!("{INDEX_HEADER}Welcome\n"));
    }

    #[test]
    fn index_framing_has_no_parent() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "")]);
        let path = tmp.path().join("index.md");
        let guide = Collection {
            doc_name: "Guide".to_string(),
            nav_order: 5,
        };

        inject_document(&path, &guide, &Config::default(), false).unwrap();

        let written = read(&path);
        assert!(written.contains("title: \"Guide\"\n"));
        assert!(written.contains("nav_order: 5\n"));
        assert!(written.contains("has_children: true\n"));
        assert!(!written.contains("parent:"));
    }

    #[test]
    fn chapter_gets_marker_header() {
        let tmp = TempDir::new().unwrap();
        let original = "# Chapter 3: Getting Started\n\nFirst steps.\n";
        write_tree(tmp.path(), &[("ch3.md", original)]);
        let path = tmp.path().join("ch3.md");

        inject_document(&path, &handbook(), &Config::default(), false).unwrap();

        assert_eq!(
            read(&path),
            format!(
                "---\nlayout: default\ntitle: \"Getting Started\"\nparent: \"Handbook\"\nnav_order: 3\n---\n\n{original}"
            )
        );
    }

    #[test]
    fn second_injection_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("ch1.md", "# Chapter 1: Intro\n")]);
        let path = tmp.path().join("ch1.md");

        inject_document(&path, &handbook(), &Config::default(), false).unwrap();
        let after_first = read(&path);
        let outcome = inject_document(&path, &handbook(), &Config::default(), false).unwrap();

        assert_eq!(outcome, InjectOutcome::AlreadyPresent(Role::Chapter));
        assert_eq!(read(&path), after_first);
    }

    #[test]
    fn existing_header_wins_over_missing_marker() {
        let tmp = TempDir::new().unwrap();
        let original = "\n  ---\ntitle: hand written\n---\nNo marker here\n";
        write_tree(tmp.path(), &[("notes.md", original)]);
        let path = tmp.path().join("notes.md");

        let outcome = inject_document(&path, &handbook(), &Config::default(), false).unwrap();

        assert_eq!(outcome, InjectOutcome::AlreadyPresent(Role::Chapter));
        assert_eq!(read(&path), original);
    }

    #[test]
    fn chapter_without_marker_is_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let original = "# Appendix\n\nNo chapter marker.\n";
        write_tree(tmp.path(), &[("appendix.md", original)]);
        let path = tmp.path().join("appendix.md");

        let result = inject_document(&path, &handbook(), &Config::default(), false);

        assert!(matches!(
            result,
            Err(InjectError::Marker(MarkerError::MissingMarker(_)))
        ));
        assert_eq!(read(&path), original);
    }

    #[test]
    fn dry_run_never_writes() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("ch2.md", "# Chapter 2: Setup\n")]);
        let path = tmp.path().join("ch2.md");

        let outcome = inject_document(&path, &handbook(), &Config::default(), true).unwrap();

        assert!(matches!(outcome, InjectOutcome::WouldWrite(_)));
        assert_eq!(read(&path), "# Chapter 2: Setup\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = inject_document(
            &tmp.path().join("gone.md"),
            &handbook(),
            &Config::default(),
            false,
        );
        assert!(matches!(result, Err(InjectError::Io(_))));
    }

    #[test]
    fn rewrite_leaves_no_temp_files_behind() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("index.md", "x"), ("ch1.md", "# Chapter 1: A\n")]);

        run(tmp.path(), &handbook(), &Config::default(), false).unwrap();

        let mut names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["ch1.md", "index.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("ch1.md", "# Chapter 1: A\n")]);
        let path = tmp.path().join("ch1.md");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        inject_document(&path, &handbook(), &Config::default(), false).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_chapter_rewrites_its_target() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        write_tree(outside.path(), &[("c.md", "# Chapter 3: Linked\n")]);
        let link = tmp.path().join("link.md");
        std::os::unix::fs::symlink(outside.path().join("c.md"), &link).unwrap();

        let report = run(tmp.path(), &handbook(), &Config::default(), false).unwrap();

        assert_eq!(report.written(), 1);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(read(&outside.path().join("c.md")).contains("title: \"Linked\"\n"));
    }

    #[test]
    fn empty_chapter_title_is_written() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("ch2.md", "# Chapter 2:\n")]);
        let path = tmp.path().join("ch2.md");

        inject_document(&path, &handbook(), &Config::default(), false).unwrap();

        assert!(read(&path).starts_with(
            "---\nlayout: default\ntitle: \"\"\nparent: \"Handbook\"\nnav_order: 2\n---\n\n"
        ));
    }

    #[test]
    fn read_only_file_is_refused() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("ch1.md", "# Chapter 1: A\n")]);
        let path = tmp.path().join("ch1.md");
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let result = inject_document(&path, &handbook(), &Config::default(), false);

        assert!(matches!(result, Err(InjectError::Io(_))));
        assert_eq!(read(&path), "# Chapter 1: A\n");
    }

    #[test]
    fn run_isolates_failures() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("index.md", "Home\n"),
                ("ch1.md", "# Chapter 1: Intro\n"),
                ("broken.md", "# Chapter one: Oops\n"),
                ("image.png", "not a document"),
            ],
        );

        let report = run(tmp.path(), &handbook(), &Config::default(), false).unwrap();

        assert_eq!(
            relative_paths(
                tmp.path(),
                &report.documents.iter().map(|d| d.path.clone()).collect::<Vec<_>>()
            ),
            vec!["broken.md", "ch1.md", "index.md"]
        );
        assert_eq!(report.written(), 2);
        assert_eq!(report.skipped(), 0);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
        assert_eq!(read(&tmp.path().join("broken.md")), "# Chapter one: Oops\n");
        assert_eq!(read(&tmp.path().join("image.png")), "not a document");
        assert!(read(&tmp.path().join("ch1.md")).starts_with("---\n"));
    }

    #[test]
    fn run_twice_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("index.md", "Home\n"), ("part/ch1.md", "# Chapter 1: Intro\n")],
        );

        run(tmp.path(), &handbook(), &Config::default(), false).unwrap();
        let index = read(&tmp.path().join("index.md"));
        let chapter = read(&tmp.path().join("part/ch1.md"));
        let report = run(tmp.path(), &handbook(), &Config::default(), false).unwrap();

        assert_eq!(report.skipped(), 2);
        assert_eq!(report.written(), 0);
        assert_eq!(read(&tmp.path().join("index.md")), index);
        assert_eq!(read(&tmp.path().join("part/ch1.md")), chapter);
    }

    #[test]
    fn run_honours_config_overrides() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("README.mdx", "Home\n"),
                ("one.mdx", "## Part 1: Basics\n"),
                ("index.md", "not scanned"),
            ],
        );
        let config = Config {
            layout: "book".to_string(),
            index_file: "README.mdx".to_string(),
            extension: "mdx".to_string(),
            marker_prefix: "## Part".to_string(),
            ..Config::default()
        };

        let report = run(tmp.path(), &handbook(), &config, false).unwrap();

        assert_eq!(report.written(), 2);
        let readme = read(&tmp.path().join("README.mdx"));
        assert!(readme.starts_with("---\nlayout: book\ntitle: \"Handbook\"\n"));
        assert!(readme.contains("has_children: true"));
        assert!(read(&tmp.path().join("one.mdx")).contains("title: \"Basics\"\n"));
        assert_eq!(read(&tmp.path().join("index.md")), "not scanned");
    }

    #[test]
    fn run_on_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        let result = run(
            &tmp.path().join("missing"),
            &handbook(),
            &Config::default(),
            false,
        );
        assert!(matches!(result, Err(LocateError::NotFound(_))));
    }
}
