//! Core types for ctxindex.
//!
//! This crate provides the data structures shared by the scanner and the
//! analyzers: the scanned directory tree, scan configuration, errors, the
//! character-based token estimator, and the two renderers that turn a tree
//! into text (the human-readable structure report and the compressed,
//! pipe-delimited docs index).

mod config;
mod error;
mod index;
mod node;
mod report;
mod tokens;
mod tree;

pub use config::{DEFAULT_EXACT_NAMES, DEFAULT_EXTENSIONS, ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use index::{
    DEFAULT_ROOT_LABEL, INDEX_HEADER, IndexStats, RETRIEVAL_INSTRUCTION, index_groups,
    serialize_index,
};
pub use node::{FileEntry, ScanNode};
pub use report::{format_node, format_number, format_report};
pub use tokens::{
    CHARS_PER_TOKEN, estimate_text_tokens, estimate_tokens, estimate_tokens_from_len,
    normalize_newlines,
};
pub use tree::{ScanResult, ScanTotals};
