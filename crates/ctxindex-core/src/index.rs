//! Compressed docs index.
//!
//! The index is a pipe-delimited summary of a scanned tree, small enough to
//! paste at the top of a CLAUDE.md:
//!
//! ```text
//! [Project Docs Index]|root:./.claude
//! |IMPORTANT:Prefer retrieval-led reasoning over pre-training-led reasoning
//! |root:{CLAUDE.md}
//! |skills/deploy:{SKILL.md,checklist.md}
//! ```
//!
//! One line is emitted per directory that directly holds files, in scan
//! order. Output depends only on the tree, so equal trees render to equal
//! bytes.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::node::ScanNode;
use crate::tokens::estimate_tokens;

/// Root label used when the caller does not supply one.
pub const DEFAULT_ROOT_LABEL: &str = "./.claude";

/// First token of the header line.
pub const INDEX_HEADER: &str = "[Project Docs Index]";

/// Fixed instruction line emitted after the header.
pub const RETRIEVAL_INSTRUCTION: &str =
    "|IMPORTANT:Prefer retrieval-led reasoning over pre-training-led reasoning";

/// Label for the top directory's own files.
const ROOT_GROUP: &str = "root";

/// Render a tree as a compressed index.
pub fn serialize_index(node: &ScanNode, root_label: &str) -> String {
    let mut lines = vec![
        format!("{INDEX_HEADER}|root:{root_label}"),
        RETRIEVAL_INSTRUCTION.to_string(),
    ];

    for (path, files) in index_groups(node) {
        lines.push(format!("|{path}:{{{}}}", files.iter().join(",")));
    }

    lines.join("\n")
}

/// Directories that directly hold files, with their file names, in scan order.
///
/// The top directory is labeled `root`; nested ones use `/`-joined relative paths.
pub fn index_groups(node: &ScanNode) -> Vec<(String, Vec<&str>)> {
    let mut groups = Vec::new();
    collect_groups(node, "", &mut groups);
    groups
}

fn collect_groups<'a>(node: &'a ScanNode, path: &str, groups: &mut Vec<(String, Vec<&'a str>)>) {
    if !node.files.is_empty() {
        let label = if path.is_empty() { ROOT_GROUP } else { path };
        let names = node.files.iter().map(|f| f.name.as_str()).collect();
        groups.push((label.to_string(), names));
    }

    for (name, child) in &node.dirs {
        let sub = if path.is_empty() {
            name.to_string()
        } else {
            format!("{path}/{name}")
        };
        collect_groups(child, &sub, groups);
    }
}

/// Size of a rendered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Length in characters.
    pub chars: u64,
    /// Estimated tokens.
    pub tokens: u64,
}

impl IndexStats {
    /// Measure a rendered index.
    pub fn measure(index: &str) -> Self {
        Self {
            chars: index.chars().count() as u64,
            tokens: estimate_tokens(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::FileEntry;

    fn project_tree() -> ScanNode {
        let mut lib = ScanNode::new();
        lib.push_file(FileEntry::new("common.sh", 10, 2));

        let mut scripts = ScanNode::new();
        scripts.insert_dir("lib", lib);

        let mut skills = ScanNode::new();
        skills.push_file(FileEntry::new("SKILL.md", 300, 75));
        skills.push_file(FileEntry::new("notes.md", 40, 10));

        let mut root = ScanNode::new();
        root.push_file(FileEntry::new("CLAUDE.md", 1200, 300));
        root.insert_dir("scripts", scripts);
        root.insert_dir("skills", skills);
        root
    }

    #[test]
    fn test_serialize_layout() {
        let index = serialize_index(&project_tree(), DEFAULT_ROOT_LABEL);
        assert_eq!(
            index,
            "[Project Docs Index]|root:./.claude\n\
             |IMPORTANT:Prefer retrieval-led reasoning over pre-training-led reasoning\n\
             |root:{CLAUDE.md}\n\
             |scripts/lib:{common.sh}\n\
             |skills:{SKILL.md,notes.md}"
        );
    }

    #[test]
    fn test_dir_without_files_has_no_line() {
        let index = serialize_index(&project_tree(), "./.claude");
        assert!(!index.contains("|scripts:"));
        assert!(index.contains("|scripts/lib:{common.sh}"));
    }

    #[test]
    fn test_empty_tree_is_header_only() {
        let index = serialize_index(&ScanNode::new(), "./docs");
        assert_eq!(index.lines().count(), 2);
        assert!(index.starts_with("[Project Docs Index]|root:./docs\n"));
        assert!(!index.ends_with('\n'));
    }

    #[test]
    fn test_deterministic() {
        let a = serialize_index(&project_tree(), DEFAULT_ROOT_LABEL);
        let b = serialize_index(&project_tree().clone(), DEFAULT_ROOT_LABEL);
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_stats() {
        let stats = IndexStats::measure("abcdefgh");
        assert_eq!(stats.chars, 8);
        assert_eq!(stats.tokens, 2);

        // 16 bytes, 15 characters
        let stats = IndexStats::measure("|docs:{café.md}");
        assert_eq!(stats.chars, 15);
        assert_eq!(stats.tokens, 3);
    }
}
