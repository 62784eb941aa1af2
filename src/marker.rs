//! Chapter marker line parsing.
//!
//! A chapter document carries its own ordering and title in a heading such as:
//!
//! ```text
//! # Chapter 3: Getting Started
//! ```
//!
//! The part before the first colon ends with the chapter number; the segment
//! between the first and second colon is the title, possibly empty. Anything
//! after a second colon is dropped. Surrounding whitespace is ignored on both
//! sides, so `#  Chapter 3 :   Getting Started  ` parses the same way.
//!
//! Only the first line carrying the marker prefix is considered. If that line
//! is malformed the document fails; later lines are never tried.

use thiserror::Error;

/// Ordering and title extracted from a chapter marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub nav_order: i64,
    pub title: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("no line starting with \"{0}\" found")]
    MissingMarker(String),
    #[error("marker line has no ':' separating number and title: {0:?}")]
    MissingColon(String),
    #[error("marker line has no chapter number before ':': {0:?}")]
    MissingNumber(String),
    #[error("chapter number {0:?} is not an integer")]
    InvalidNumber(String),
}

/// Parse a single marker line into its chapter number and title.
///
/// - `"# Chapter 3: Getting Started"` → `(3, "Getting Started")`
/// - `"# Chapter 12:  Time: A History "` → `(12, "Time")`
/// - `"# Chapter 2:"` → `(2, "")`
/// - `"# Chapter 3 Getting Started"` → `MissingColon`
/// - `"# Chapter three: Intro"` → `InvalidNumber("three")`
pub fn parse_marker_line(line: &str) -> Result<Marker, MarkerError> {
    let (head, tail) = line
        .split_once(':')
        .ok_or_else(|| MarkerError::MissingColon(line.to_string()))?;

    let token = head
        .split_whitespace()
        .next_back()
        .ok_or_else(|| MarkerError::MissingNumber(line.to_string()))?;
    let nav_order = token
        .parse::<i64>()
        .map_err(|_| MarkerError::InvalidNumber(token.to_string()))?;

    let title = tail.split(':').next().unwrap_or_default().trim();

    Ok(Marker {
        nav_order,
        title: title.to_string(),
    })
}

/// Find the first line starting with `prefix` and parse it.
pub fn find_marker(content: &str, prefix: &str) -> Result<Marker, MarkerError> {
    let line = content
        .lines()
        .find(|line| line.starts_with(prefix))
        .ok_or_else(|| MarkerError::MissingMarker(prefix.to_string()))?;
    parse_marker_line(line)
}
