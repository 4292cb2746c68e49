//! Documentation tree scanner for ctxindex.
//!
//! This crate walks a directory (usually a project's `.claude/` folder) and
//! builds a [`ScanNode`] tree of the files an agent would read as context,
//! with a byte size and a token estimate for each.
//!
//! # Overview
//!
//! - **Allowlists**: files are kept when their extension (case-insensitive)
//!   or their exact name is allowed
//! - **Hidden entries** (leading `.`) are never listed or descended into
//! - **Deterministic**: directories are read serially in file-name order
//! - **Soft failures**: unreadable or non-UTF-8 files count as zero tokens
//!   and are recorded as warnings; they never abort the scan
//!
//! # Example
//!
//! ```rust,no_run
//! use ctxindex_scan::{DocScanner, ScanConfig};
//!
//! let config = ScanConfig::new("/path/to/project/.claude");
//! let result = DocScanner::new().scan(&config).unwrap();
//!
//! println!("Total files: {}", result.total_files());
//! println!("Total tokens: ~{}", result.total_tokens());
//! ```

mod scanner;

pub use scanner::DocScanner;

// Re-export core types for convenience
pub use ctxindex_core::{
    FileEntry, ScanConfig, ScanError, ScanNode, ScanResult, ScanTotals, ScanWarning, WarningKind,
};
