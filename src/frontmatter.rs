//! Frontmatter model: document roles, derived metadata and header rendering.
//!
//! Every document in a collection plays one of two roles, decided solely by its
//! file name:
//!
//! - **Index**: the collection landing page (`index.md` by default). Its title
//!   and ordering come from the invocation, and it always has children.
//! - **Chapter**: every other document. Title and ordering come from the
//!   chapter's own marker line (see [`crate::marker`]), and its parent is the
//!   collection.
//!
//! ## Header format
//!
//! Headers are plain text, not serializer output, because the downstream site
//! generator's navigation depends on this exact shape:
//!
//! ```text
//! ---                        ---
//! layout: default            layout: default
//! title: "Handbook"          title: "Intro"
//! nav_order: 1               parent: "Handbook"
//! has_children: true         nav_order: 1
//! ---                        ---
//! ```
//!
//! Each header is followed by one blank line and then the original content.

use crate::config::Config;
use crate::marker::{MarkerError, find_marker};
use std::path::Path;

/// Delimiter line that opens and closes a header block.
pub const DELIMITER: &str = "---";

/// Shared, read-only parameters of one scanned documents root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Display name: index title and chapter parent.
    pub doc_name: String,
    /// Ordering value of the index document.
    pub nav_order: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Index,
    Chapter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Index => "index",
            Role::Chapter => "chapter",
        }
    }
}

/// Classify a document by its base name.
pub fn classify(path: &Path, index_file: &str) -> Role {
    match path.file_name() {
        Some(name) if name == index_file => Role::Index,
        _ => Role::Chapter,
    }
}

/// Metadata written into a header, one variant per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadata {
    Index {
        title: String,
        nav_order: i64,
    },
    Chapter {
        title: String,
        parent: String,
        nav_order: i64,
    },
}

impl Metadata {
    pub fn role(&self) -> Role {
        match self {
            Metadata::Index { .. } => Role::Index,
            Metadata::Chapter { .. } => Role::Chapter,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Metadata::Index { title, .. } | Metadata::Chapter { title, .. } => title,
        }
    }

    pub fn nav_order(&self) -> i64 {
        match self {
            Metadata::Index { nav_order, .. } | Metadata::Chapter { nav_order, .. } => *nav_order,
        }
    }
}

/// Derive a document's metadata from its role, content and collection.
///
/// Index metadata never looks at the content; chapter metadata comes entirely
/// from the first marker line.
pub fn derive_metadata(
    role: Role,
    content: &str,
    collection: &Collection,
    marker_prefix: &str,
) -> Result<Metadata, MarkerError> {
    match role {
        Role::Index => Ok(Metadata::Index {
            title: collection.doc_name.clone(),
            nav_order: collection.nav_order,
        }),
        Role::Chapter => {
            let marker = find_marker(content, marker_prefix)?;
            Ok(Metadata::Chapter {
                title: marker.title,
                parent: collection.doc_name.clone(),
                nav_order: marker.nav_order,
            })
        }
    }
}

/// Whether the content already opens with a header block.
///
/// Leading whitespace and blank lines are ignored.
pub fn has_frontmatter(content: &str) -> bool {
    content.trim().starts_with(DELIMITER)
}

/// Escape a value for a double-quoted header scalar.
///
/// Ordinary titles pass through untouched; only `\` and `"` are escaped. An
/// unescaped `"` would end the YAML scalar early and a stray `\` would start an
/// escape sequence, either of which makes the header invalid YAML for the site
/// generator.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Render the header block, including its closing delimiter line.
pub fn render_header(metadata: &Metadata, config: &Config) -> String {
    let fields = match metadata {
        Metadata::Index { title, nav_order } => format!(
            "title: {}\nnav_order: {nav_order}\nhas_children: true\n",
            quote(title)
        ),
        Metadata::Chapter {
            title,
            parent,
            nav_order,
        } => format!(
            "title: {}\nparent: {}\nnav_order: {nav_order}\n",
            quote(title),
            quote(parent)
        ),
    };
    format!(
        "{DELIMITER}\nlayout: {}\n{fields}{DELIMITER}\n",
        config.layout
    )
}

/// Header, one blank line, then the original content unchanged.
pub fn prepend_header(metadata: &Metadata, config: &Config, content: &str) -> String {
    let header = render_header(metadata, config);
    let mut out = String::with_capacity(header.len() + 1 + content.len());
    out.push_str(&header);
    out.push('\n');
    out.push_str(content);
    out
}
