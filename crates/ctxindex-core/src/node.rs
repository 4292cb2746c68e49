//! Scanned directory tree types.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tree::ScanTotals;

/// A file that passed the allowlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name (not full path).
    pub name: CompactString,

    /// Size in bytes, from filesystem metadata.
    pub size: u64,

    /// Estimated tokens; zero when the file could not be read as UTF-8 text.
    pub tokens: u64,
}

impl FileEntry {
    /// Create a new file entry.
    pub fn new(name: impl Into<CompactString>, size: u64, tokens: u64) -> Self {
        Self {
            name: name.into(),
            size,
            tokens,
        }
    }
}

/// One scanned directory.
///
/// Files and subdirectories keep the order they were inserted in, which is
/// the sorted order the scanner visits them in. Hidden entries never appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanNode {
    /// Direct child files.
    pub files: Vec<FileEntry>,

    /// Child directories keyed by directory name.
    pub dirs: IndexMap<CompactString, ScanNode>,
}

impl ScanNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file entry.
    pub fn push_file(&mut self, entry: FileEntry) {
        self.files.push(entry);
    }

    /// Attach a child directory, even if it is empty.
    pub fn insert_dir(&mut self, name: impl Into<CompactString>, node: ScanNode) {
        self.dirs.insert(name.into(), node);
    }

    /// Look up a direct child directory.
    pub fn dir(&self, name: &str) -> Option<&ScanNode> {
        self.dirs.get(name)
    }

    /// True when the node has no files and no subdirectories.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Sum of file count, bytes and tokens over this node and all descendants.
    pub fn totals(&self) -> (u64, u64, u64) {
        let stats = self.stats();
        (stats.files, stats.bytes, stats.tokens)
    }

    /// Full aggregate statistics over this node and all descendants.
    pub fn stats(&self) -> ScanTotals {
        let mut totals = ScanTotals::new();
        self.accumulate(&mut totals);
        totals
    }

    fn accumulate(&self, totals: &mut ScanTotals) {
        for file in &self.files {
            totals.record_file(file);
        }
        for child in self.dirs.values() {
            totals.record_dir();
            child.accumulate(totals);
        }
    }

    /// Iterate over every file in the subtree with its `/`-joined directory path.
    ///
    /// The root directory's files carry an empty path.
    pub fn walk_files(&self) -> Vec<(String, &FileEntry)> {
        let mut out = Vec::new();
        self.collect_files("", &mut out);
        out
    }

    fn collect_files<'a>(&'a self, path: &str, out: &mut Vec<(String, &'a FileEntry)>) {
        for file in &self.files {
            out.push((path.to_string(), file));
        }
        for (name, child) in &self.dirs {
            let sub = if path.is_empty() {
                name.to_string()
            } else {
                format!("{path}/{name}")
            };
            child.collect_files(&sub, out);
        }
    }
}
