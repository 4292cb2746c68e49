//! CLAUDE.md inspection.
//!
//! Looks for the project's persistent configuration file and checks for two
//! heuristic markers:
//! - an embedded docs index (`[` and `Index` near the top of the file)
//! - an instruction to prefer retrieval-led reasoning

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ctxindex_core::{estimate_tokens, normalize_newlines};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "CLAUDE.md";

/// Directory checked when the project root has no configuration file.
pub const CONFIG_DIR_NAME: &str = ".claude";

/// Number of leading characters searched for the index marker.
pub const INDEX_MARKER_WINDOW: usize = 500;

/// Number of characters kept in the preview.
pub const PREVIEW_CHARS: usize = 200;

/// Result of inspecting the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigAnalysis {
    /// File that was inspected, if one was found.
    pub path: Option<PathBuf>,
    /// Whether the file exists.
    pub exists: bool,
    /// Size in bytes of the UTF-8 content.
    pub size_bytes: u64,
    /// Estimated tokens.
    pub tokens: u64,
    /// Whether an index marker appears near the top.
    pub has_index: bool,
    /// Whether a retrieval-led reasoning instruction appears anywhere.
    pub has_retrieval_instruction: bool,
    /// First characters of the file, with `...` appended when truncated.
    pub preview: String,
}

impl ConfigAnalysis {
    /// Analysis for a project without a configuration file.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Analyze configuration file content already in memory.
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Self {
        let head: String = content.chars().take(INDEX_MARKER_WINDOW).collect();
        let lower = content.to_lowercase();

        Self {
            path: Some(path.into()),
            exists: true,
            size_bytes: content.len() as u64,
            tokens: estimate_tokens(content),
            has_index: head.contains('[') && head.contains("Index"),
            has_retrieval_instruction: lower.contains("retrieval-led")
                || lower.contains("retrieval led"),
            preview: preview(content),
        }
    }
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Locates and inspects a project's CLAUDE.md.
#[derive(Debug, Default)]
pub struct ConfigAnalyzer;

impl ConfigAnalyzer {
    /// Create a new analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Find the configuration file: `<root>/CLAUDE.md`, then `<root>/.claude/CLAUDE.md`.
    pub fn locate(&self, root: &Path) -> Option<PathBuf> {
        [
            root.join(CONFIG_FILE_NAME),
            root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    /// Inspect the project's configuration file.
    ///
    /// Content that is not valid UTF-8 is decoded lossily and line endings
    /// are normalised to `\n` before measuring. A file that exists but cannot
    /// be read is reported as existing with zero metrics.
    pub fn analyze(&self, root: &Path) -> ConfigAnalysis {
        let Some(path) = self.locate(root) else {
            debug!(root = %root.display(), "no {CONFIG_FILE_NAME} found");
            return ConfigAnalysis::missing();
        };

        match std::fs::read(&path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes);
                ConfigAnalysis::from_content(path, &normalize_newlines(&content))
            }
            Err(err) => {
                warn!(path = %path.display(), "failed to read {CONFIG_FILE_NAME}: {err}");
                ConfigAnalysis {
                    path: Some(path),
                    exists: true,
                    ..ConfigAnalysis::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing() {
        let temp = TempDir::new().unwrap();
        let analysis = ConfigAnalyzer::new().analyze(temp.path());
        assert_eq!(analysis, ConfigAnalysis::missing());
        assert!(!analysis.exists);
        assert_eq!(analysis.tokens, 0);
    }

    #[test]
    fn test_root_file_wins() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".claude")).unwrap();
        fs::write(temp.path().join("CLAUDE.md"), "root").unwrap();
        fs::write(temp.path().join(".claude/CLAUDE.md"), "nested").unwrap();

        let analysis = ConfigAnalyzer::new().analyze(temp.path());
        assert_eq!(analysis.path, Some(temp.path().join("CLAUDE.md")));
        assert_eq!(analysis.preview, "root");
    }

    #[test]
    fn test_falls_back_to_claude_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".claude")).unwrap();
        fs::write(temp.path().join(".claude/CLAUDE.md"), "nested").unwrap();

        let analysis = ConfigAnalyzer::new().analyze(temp.path());
        assert!(analysis.exists);
        assert_eq!(analysis.preview, "nested");
    }

    #[test]
    fn test_index_marker_window() {
        let near = ConfigAnalysis::from_content("CLAUDE.md", "[Project Docs Index]|root:./.claude");
        assert!(near.has_index);

        let far = format!("{}[Project Docs Index]", "x".repeat(INDEX_MARKER_WINDOW));
        assert!(!ConfigAnalysis::from_content("CLAUDE.md", &far).has_index);

        // both pieces are needed
        assert!(!ConfigAnalysis::from_content("CLAUDE.md", "[link] only").has_index);
        assert!(!ConfigAnalysis::from_content("CLAUDE.md", "Index only").has_index);
    }

    #[test]
    fn test_retrieval_marker_case_insensitive() {
        for text in [
            "Prefer Retrieval-Led reasoning",
            "prefer RETRIEVAL LED reasoning",
            "...\n\nretrieval-led",
        ] {
            assert!(ConfigAnalysis::from_content("CLAUDE.md", text).has_retrieval_instruction);
        }
        assert!(!ConfigAnalysis::from_content("CLAUDE.md", "retrieval based").has_retrieval_instruction);
    }

    #[test]
    fn test_size_is_utf8_bytes() {
        let analysis = ConfigAnalysis::from_content("CLAUDE.md", "héllo wörld");
        assert_eq!(analysis.size_bytes, 13);
        assert_eq!(analysis.tokens, 2);
    }

    #[test]
    fn test_preview_truncation() {
        let short = ConfigAnalysis::from_content("CLAUDE.md", &"a".repeat(PREVIEW_CHARS));
        assert_eq!(short.preview.len(), PREVIEW_CHARS);

        let long = ConfigAnalysis::from_content("CLAUDE.md", &"a".repeat(PREVIEW_CHARS + 1));
        assert_eq!(long.preview, format!("{}...", "a".repeat(PREVIEW_CHARS)));
    }

    #[test]
    fn test_crlf_measured_as_lf() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("CLAUDE.md"), "# Docs\r\nuse retrieval-led\r\n").unwrap();

        let analysis = ConfigAnalyzer::new().analyze(temp.path());
        assert_eq!(analysis.size_bytes, 25);
        assert_eq!(analysis.tokens, 6);
        assert_eq!(analysis.preview, "# Docs\nuse retrieval-led\n");
        assert!(analysis.has_retrieval_instruction);
    }
}
