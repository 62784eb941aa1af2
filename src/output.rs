//! CLI output formatting for injection runs.
//!
//! # Display Contract
//!
//! Every processed document gets exactly one status line. With `--verbose`,
//! written documents also get an indented context line with the derived
//! metadata:
//!
//! ```text
//! Wrote frontmatter for docs/index.md
//!     index 1 Handbook                     (--verbose only)
//! Wrote frontmatter for docs/ch1.md
//!     chapter 1 Intro                      (--verbose only)
//! Front matter already exists, skipping docs/ch2.md
//! Failed docs/appendix.md: Chapter marker: no line starting with "# Chapter" found
//!
//! 2 written, 1 skipped, 1 failed
//! ```
//!
//! Dry runs say `Would write frontmatter for ...` and `would write` in the
//! summary.
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` for testability; `print_*`
//! wrappers write to stdout. Format functions are pure — no I/O.

use crate::frontmatter::Metadata;
use crate::inject::{DocumentResult, InjectOutcome, Report};

/// Indented context line: role, nav order, title.
fn metadata_line(metadata: &Metadata) -> String {
    format!(
        "    {} {} {}",
        metadata.role().as_str(),
        metadata.nav_order(),
        metadata.title()
    )
}

/// Format the status line for one document, plus the metadata line when
/// `verbose` is set and a header was (or would be) written.
pub fn format_document(doc: &DocumentResult, verbose: bool) -> Vec<String> {
    let path = doc.path.display();
    let (status, metadata) = match &doc.result {
        Ok(InjectOutcome::Written(metadata)) => {
            (format!("Wrote frontmatter for {path}"), Some(metadata))
        }
        Ok(InjectOutcome::WouldWrite(metadata)) => {
            (format!("Would write frontmatter for {path}"), Some(metadata))
        }
        Ok(InjectOutcome::AlreadyPresent(_)) => {
            (format!("Front matter already exists, skipping {path}"), None)
        }
        Err(err) => (format!("Failed {path}: {err}"), None),
    };

    let mut lines = vec![status];
    if let Some(metadata) = metadata.filter(|_| verbose) {
        lines.push(metadata_line(metadata));
    }
    lines
}

/// Format a whole run: per-document lines, a blank line, then the summary.
pub fn format_report(report: &Report, dry_run: bool, verbose: bool) -> Vec<String> {
    let mut lines: Vec<String> = report
        .documents
        .iter()
        .flat_map(|doc| format_document(doc, verbose))
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let verb = if dry_run { "would write" } else { "written" };
    lines.push(format!(
        "{} {}, {} skipped, {} failed",
        report.written(),
        verb,
        report.skipped(),
        report.failed()
    ));
    lines
}

/// Print a run report to stdout.
pub fn print_report(report: &Report, dry_run: bool, verbose: bool) {
    for line in format_report(report, dry_run, verbose) {
        println!("{}", line);
    }
}
