//! Whole-project analysis pipeline.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use ctxindex_core::{
    DEFAULT_ROOT_LABEL, IndexStats, ScanConfig, ScanError, ScanResult, format_report,
    serialize_index,
};
use ctxindex_scan::DocScanner;

use crate::config_md::{CONFIG_DIR_NAME, ConfigAnalysis, ConfigAnalyzer};
use crate::recommend::{RecommendConfig, Recommendation, Recommender};

/// Settings for a project analysis run.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Root label written into the index header.
    pub root_label: String,
    /// Scan settings; the root is replaced by the resolved scan directory.
    pub scan: ScanConfig,
    /// Recommendation thresholds.
    pub recommend: RecommendConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            scan: ScanConfig::default(),
            recommend: RecommendConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index root label.
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Set the scan settings.
    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Set the recommendation thresholds.
    pub fn with_recommend_config(mut self, recommend: RecommendConfig) -> Self {
        self.recommend = recommend;
        self
    }
}

/// Everything produced for one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    /// Canonical project root.
    pub project_path: PathBuf,
    /// Directory that was scanned.
    pub scan_dir: PathBuf,
    /// True when `.claude/` was missing and the project root was scanned instead.
    pub fell_back: bool,
    /// Scan tree, totals and warnings.
    pub scan: ScanResult,
    /// Indented structure report lines.
    pub structure: Vec<String>,
    /// CLAUDE.md inspection.
    pub config_file: ConfigAnalysis,
    /// Advice, in rule order.
    pub recommendations: Vec<Recommendation>,
    /// Compressed docs index.
    pub index: String,
    /// Size of the compressed index.
    pub index_stats: IndexStats,
}

impl ProjectReport {
    /// Write the compressed index to a file.
    pub fn write_index(&self, path: &Path) -> Result<(), ScanError> {
        std::fs::write(path, &self.index).map_err(|source| ScanError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Runs scan, aggregation, rendering, CLAUDE.md analysis and recommendations.
pub struct ProjectAnalyzer {
    config: ProjectConfig,
    scanner: DocScanner,
    config_analyzer: ConfigAnalyzer,
}

impl ProjectAnalyzer {
    /// Create a new analyzer with default config.
    pub fn new() -> Self {
        Self::with_config(ProjectConfig::default())
    }

    /// Create a new analyzer with custom config.
    pub fn with_config(config: ProjectConfig) -> Self {
        Self {
            config,
            scanner: DocScanner::new(),
            config_analyzer: ConfigAnalyzer::new(),
        }
    }

    /// Pick the directory to scan: `<project>/.claude`, or the project itself.
    ///
    /// Returns the directory and whether the fallback was taken.
    pub fn resolve_scan_dir(project: &Path) -> (PathBuf, bool) {
        let claude_dir = project.join(CONFIG_DIR_NAME);
        if claude_dir.exists() {
            (claude_dir, false)
        } else {
            warn!(
                path = %claude_dir.display(),
                "no .claude directory found, scanning project root"
            );
            (project.to_path_buf(), true)
        }
    }

    /// Analyze a project.
    ///
    /// Fails only when the project path does not exist (or the scan
    /// configuration is invalid).
    pub fn analyze(&self, project: &Path) -> Result<ProjectReport, ScanError> {
        let project_path = project
            .canonicalize()
            .map_err(|e| ScanError::io(project, e))?;

        let (scan_dir, fell_back) = Self::resolve_scan_dir(&project_path);
        info!(project = %project_path.display(), scan_dir = %scan_dir.display(), "analyzing project");

        let scan = self.scanner.scan(&self.config.scan.with_root(&scan_dir))?;
        let structure = format_report(&scan.root);
        let index = serialize_index(&scan.root, &self.config.root_label);
        let index_stats = IndexStats::measure(&index);

        let config_file = self.config_analyzer.analyze(&project_path);
        let recommendations = Recommender::with_config(self.config.recommend.clone())
            .recommend(&scan.totals, &config_file);

        info!(
            files = scan.totals.files,
            tokens = scan.totals.tokens,
            recommendations = recommendations.len(),
            "analysis complete"
        );

        Ok(ProjectReport {
            project_path,
            scan_dir,
            fell_back,
            scan,
            structure,
            config_file,
            recommendations,
            index,
            index_stats,
        })
    }
}

impl Default for ProjectAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_project_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = ProjectAnalyzer::new()
            .analyze(&temp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[test]
    fn test_resolve_prefers_claude_dir() {
        let temp = TempDir::new().unwrap();
        let (dir, fell_back) = ProjectAnalyzer::resolve_scan_dir(temp.path());
        assert_eq!(dir, temp.path());
        assert!(fell_back);

        fs::create_dir(temp.path().join(".claude")).unwrap();
        let (dir, fell_back) = ProjectAnalyzer::resolve_scan_dir(temp.path());
        assert_eq!(dir, temp.path().join(".claude"));
        assert!(!fell_back);
    }

    #[test]
    fn test_custom_root_label() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "hello").unwrap();

        let config = ProjectConfig::new().with_root_label("./docs");
        let report = ProjectAnalyzer::with_config(config).analyze(temp.path()).unwrap();
        assert!(report.index.starts_with("[Project Docs Index]|root:./docs\n"));
    }

    #[test]
    fn test_write_index() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("README.md"), "hello").unwrap();

        let report = ProjectAnalyzer::new().analyze(temp.path()).unwrap();
        let out = temp.path().join("index.txt");
        report.write_index(&out).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), report.index);
    }
}
