//! Analysis for ctxindex.
//!
//! This crate turns a scanned documentation tree into advice:
//!
//! - **CLAUDE.md analysis** - size, token estimate, and whether the file
//!   already embeds a docs index and a retrieval-led reasoning instruction
//! - **Recommendations** - fixed, ordered rules over that analysis
//! - **Project pipeline** - resolves `.claude/` (falling back to the project
//!   root), scans it, renders the report and index, and recommends
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use ctxindex_analyze::ProjectAnalyzer;
//!
//! let report = ProjectAnalyzer::new().analyze(Path::new("/path/to/project")).unwrap();
//!
//! for rec in &report.recommendations {
//!     println!("[{}] {}: {}", rec.priority, rec.category, rec.issue);
//! }
//! println!("{}", report.index);
//! ```

pub mod config_md;
mod project;
mod recommend;

pub use config_md::{ConfigAnalysis, ConfigAnalyzer};
pub use project::{ProjectAnalyzer, ProjectConfig, ProjectReport};
pub use recommend::{
    Category, Priority, RecommendConfig, RecommendConfigBuilder, Recommendation, Recommender,
};

// Re-export core types
pub use ctxindex_core::{ScanNode, ScanTotals};
