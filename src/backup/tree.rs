//! Tree view of a snapshot
//!
//! ```text
//! kvdb.snap
//! ├── sessions
//! │   └── ... empty map ...
//! └── users
//!     ├── alice: hello
//!     └── bob: hi
//! ```

use std::path::Path;

use crate::error::Result;
use crate::storage::Namespaces;

use super::snapshot;

const EMPTY_DATABASE: &str = "Database is empty.";
const EMPTY_MAP: &str = "... empty map ...";

/// Render namespaces as a tree rooted at `root`, sorted by name
pub fn render_tree(root: &str, namespaces: &Namespaces) -> String {
    let mut out = String::from(root);
    out.push('\n');

    let mut names: Vec<&String> = namespaces.keys().collect();
    names.sort();

    for (i, name) in names.iter().enumerate() {
        let last_branch = i + 1 == names.len();
        let (branch, indent) = if last_branch {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        out.push_str(branch);
        out.push_str(name);
        out.push('\n');

        let keys = &namespaces[*name];
        if keys.is_empty() {
            out.push_str(indent);
            out.push_str("└── ");
            out.push_str(EMPTY_MAP);
            out.push('\n');
            continue;
        }

        let mut entries: Vec<(&String, &String)> = keys.iter().collect();
        entries.sort();

        for (j, (key, value)) in entries.iter().enumerate() {
            let leaf = if j + 1 == entries.len() { "└── " } else { "├── " };
            out.push_str(indent);
            out.push_str(leaf);
            out.push_str(&format!("{}: {}\n", key, value));
        }
    }

    out
}

/// Load a snapshot read-only and render it
///
/// A missing, empty, or namespace-less snapshot renders as
/// `Database is empty.`
pub fn overview(path: &Path) -> Result<String> {
    let namespaces = snapshot::load(path)?.unwrap_or_default();
    if namespaces.is_empty() {
        return Ok(format!("{}\n", EMPTY_DATABASE));
    }

    let root = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(render_tree(&root, &namespaces))
}
