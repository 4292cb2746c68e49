//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// File extensions included by default (lowercase, with leading dot).
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".md", ".mdx", ".txt", ".py", ".sh", ".json", ".yaml", ".yml",
];

/// File names included regardless of their extension.
pub const DEFAULT_EXACT_NAMES: &[&str] = &["CLAUDE.md", "SKILL.md", "README.md"];

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Directory to scan.
    pub root: PathBuf,

    /// Allowed file extensions, compared case-insensitively.
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File names that are always included, even when the extension is not allowed.
    #[builder(default = "default_exact_names()")]
    #[serde(default = "default_exact_names")]
    pub exact_names: Vec<String>,

    /// Entry names to skip (glob syntax, matched against the name only).
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links to files and directories.
    #[builder(default = "true")]
    #[serde(default = "default_follow_symlinks")]
    pub follow_symlinks: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_exact_names() -> Vec<String> {
    DEFAULT_EXACT_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_follow_symlinks() -> bool {
    true
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }

        if let Some(ref extensions) = self.extensions {
            if let Some(bad) = extensions.iter().find(|e| !e.starts_with('.')) {
                return Err(format!("Extension must start with '.': {bad}"));
            }
        }

        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Bad ignore pattern {pattern}: {e}"))?;
            }
        }

        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with the default allowlists for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: default_extensions(),
            exact_names: default_exact_names(),
            ignore_patterns: Vec::new(),
            follow_symlinks: true,
            max_depth: None,
        }
    }

    /// Same configuration pointed at a different root.
    pub fn with_root(&self, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..self.clone()
        }
    }

    /// Check whether a file name passes the allowlists.
    ///
    /// An exact-name match wins even when the extension is not allowed.
    pub fn is_allowed(&self, name: &str) -> bool {
        if self.exact_names.iter().any(|n| n == name) {
            return true;
        }

        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => self
                .extensions
                .iter()
                .any(|allowed| {
                    allowed
                        .strip_prefix('.')
                        .unwrap_or(allowed)
                        .eq_ignore_ascii_case(ext)
                }),
            _ => false,
        }
    }

    /// Hidden entries (leading `.`) are never scanned.
    pub fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_matcher(&self) -> Result<GlobSet, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| ScanError::invalid_config(format!("{pattern}: {e}")))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ScanError::invalid_config(e.to_string()))
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
