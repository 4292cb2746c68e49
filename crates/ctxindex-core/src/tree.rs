//! Scan result container and statistics.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScanConfig;
use crate::error::ScanWarning;
use crate::node::{FileEntry, ScanNode};

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTotals {
    /// Total number of files.
    pub files: u64,
    /// Total size in bytes.
    pub bytes: u64,
    /// Total estimated tokens.
    pub tokens: u64,
    /// Number of directories below the root.
    pub directories: u64,
}

impl ScanTotals {
    /// Create new empty totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update totals with a file entry.
    pub fn record_file(&mut self, entry: &FileEntry) {
        self.files += 1;
        self.bytes += entry.size;
        self.tokens += entry.tokens;
    }

    /// Record a directory.
    pub fn record_dir(&mut self) {
        self.directories += 1;
    }
}

/// Complete scan of one directory with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root node of the tree.
    pub root: ScanNode,

    /// Directory that was scanned.
    pub root_path: PathBuf,

    /// Whether the root directory existed.
    pub root_exists: bool,

    /// When this scan was performed.
    pub scanned_at: DateTime<Utc>,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Scan configuration used.
    pub config: ScanConfig,

    /// Summary statistics.
    pub totals: ScanTotals,

    /// Warnings encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl ScanResult {
    /// Create a new scan result; totals are computed from the tree.
    pub fn new(
        root: ScanNode,
        root_path: PathBuf,
        root_exists: bool,
        config: ScanConfig,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        let totals = root.stats();
        Self {
            root,
            root_path,
            root_exists,
            scanned_at: Utc::now(),
            scan_duration,
            config,
            totals,
            warnings,
        }
    }

    /// Get the total number of files.
    pub fn total_files(&self) -> u64 {
        self.totals.files
    }

    /// Get the total estimated tokens.
    pub fn total_tokens(&self) -> u64 {
        self.totals.tokens
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
