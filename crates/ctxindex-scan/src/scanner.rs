//! JWalk-based documentation tree scanner.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use compact_str::CompactString;
use globset::GlobSet;
use jwalk::{DirEntry, Parallelism, WalkDirGeneric};
use tracing::{debug, warn};

use ctxindex_core::{
    FileEntry, ScanConfig, ScanError, ScanNode, ScanResult, ScanWarning, WarningKind,
    estimate_text_tokens,
};

/// Walk state: a directory entry carries the target of a detected symlink loop.
type LinkState = ((), Option<PathBuf>);

/// Serial, sorted directory scanner.
///
/// Every directory is read in file-name order, so two scans of the same
/// tree always produce the same `ScanNode`.
#[derive(Debug, Default)]
pub struct DocScanner;

impl DocScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan a directory with the default allowlists.
    ///
    /// A missing directory yields an empty node.
    pub fn scan_dir(&self, dir: impl Into<PathBuf>) -> ScanNode {
        match self.scan(&ScanConfig::new(dir)) {
            Ok(result) => result.root,
            Err(err) => {
                warn!("scan failed: {err}");
                ScanNode::new()
            }
        }
    }

    /// Perform a scan of the configured root.
    ///
    /// Only an invalid ignore pattern is an error. Per-file failures are
    /// recorded as warnings and reported as zero size or zero tokens.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanResult, ScanError> {
        let start = Instant::now();
        let ignore = config.ignore_matcher()?;
        let mut warnings = Vec::new();

        if !config.root.exists() {
            debug!(root = %config.root.display(), "scan root does not exist");
            return Ok(ScanResult::new(
                ScanNode::new(),
                config.root.clone(),
                false,
                config.clone(),
                start.elapsed(),
                warnings,
            ));
        }

        let root_path = config
            .root
            .canonicalize()
            .unwrap_or_else(|_| config.root.clone());

        if !root_path.is_dir() {
            warn!(root = %root_path.display(), "scan root is not a directory");
            warnings.push(ScanWarning::new(
                &root_path,
                "Scan root is not a directory",
                WarningKind::WalkError,
            ));
            return Ok(ScanResult::new(
                ScanNode::new(),
                root_path,
                true,
                config.clone(),
                start.elapsed(),
                warnings,
            ));
        }

        let entries = self.collect_entries(config, &root_path, &ignore, &mut warnings);
        let root_node = self.build_tree(&root_path, entries);

        Ok(ScanResult::new(
            root_node,
            root_path,
            true,
            config.clone(),
            start.elapsed(),
            warnings,
        ))
    }

    /// Collect allowed files and all visible directories, grouped by parent.
    fn collect_entries(
        &self,
        config: &ScanConfig,
        root_path: &Path,
        ignore: &GlobSet,
        warnings: &mut Vec<ScanWarning>,
    ) -> HashMap<PathBuf, Vec<EntryInfo>> {
        // Hidden and ignored entries are pruned before descent; the root itself is kept.
        let prune = ignore.clone();
        let follow = config.follow_symlinks;
        let walk_root = root_path.to_path_buf();
        let walker = WalkDirGeneric::<LinkState>::new(root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(follow)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, dir, _state, children| {
                children.retain(|entry| match entry {
                    Ok(e) => e.depth == 0 || !is_skipped(&e.file_name, &prune),
                    Err(_) => true,
                });
                if follow {
                    for entry in children.iter_mut().flatten() {
                        if let Some(target) = loop_target(&walk_root, dir, entry) {
                            entry.read_children_path = None;
                            entry.client_state = Some(target);
                        }
                    }
                }
            });

        // Map from parent path to children, in walk order
        let mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>> = HashMap::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    warn!(path = %path.display(), "walk error: {err}");
                    warnings.push(ScanWarning::new(path, err.to_string(), WarningKind::WalkError));
                    continue;
                }
            };

            let path = entry.path();
            if let Some(target) = &entry.client_state {
                warn!(path = %path.display(), target = %target.display(), "skipping symlink loop");
                warnings.push(ScanWarning::symlink_loop(&path, target));
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();

            let Some(parent) = path.parent().map(Path::to_path_buf) else {
                continue;
            };

            let file_type = entry.file_type();

            if file_type.is_dir() {
                if let Some(err) = &entry.read_children_error {
                    warn!(path = %path.display(), "cannot read directory: {err}");
                    warnings.push(ScanWarning::new(&path, err.to_string(), WarningKind::WalkError));
                }
                entries_by_parent.entry(parent).or_default().push(EntryInfo {
                    name: file_name.into(),
                    path,
                    kind: EntryKind::Dir,
                });
            } else if file_type.is_file() {
                if !config.is_allowed(&file_name) {
                    debug!(path = %path.display(), "skipping file outside allowlist");
                    continue;
                }

                let (size, tokens) = measure_file(&path, warnings);

                entries_by_parent.entry(parent).or_default().push(EntryInfo {
                    name: file_name.into(),
                    path,
                    kind: EntryKind::File { size, tokens },
                });
            } else {
                debug!(path = %path.display(), "skipping symlink or special file");
            }
        }

        entries_by_parent
    }

    /// Build tree structure from collected entries.
    fn build_tree(
        &self,
        root_path: &Path,
        mut entries_by_parent: HashMap<PathBuf, Vec<EntryInfo>>,
    ) -> ScanNode {
        self.build_node(root_path, &mut entries_by_parent)
    }

    /// Recursively build a node and its children.
    fn build_node(
        &self,
        path: &Path,
        entries_by_parent: &mut HashMap<PathBuf, Vec<EntryInfo>>,
    ) -> ScanNode {
        let mut node = ScanNode::new();

        // Get children for this path
        let children_entries = entries_by_parent.remove(path).unwrap_or_default();

        for entry in children_entries {
            match entry.kind {
                EntryKind::Dir => {
                    let child_node = self.build_node(&entry.path, entries_by_parent);
                    node.insert_dir(entry.name, child_node);
                }
                EntryKind::File { size, tokens } => {
                    node.push_file(FileEntry::new(entry.name, size, tokens));
                }
            }
        }

        node
    }
}

/// Hidden entries and entries matching an ignore pattern are never scanned.
fn is_skipped(name: &OsStr, ignore: &GlobSet) -> bool {
    let name = name.to_string_lossy();
    ScanConfig::is_hidden(&name) || ignore.is_match(&*name)
}

/// Canonical target of a followed directory link that contains `dir` or
/// any directory between it and `root`.
///
/// Descending into such a link would revisit that directory forever.
fn loop_target(root: &Path, dir: &Path, entry: &DirEntry<LinkState>) -> Option<PathBuf> {
    if entry.depth == 0 || !entry.path_is_symlink() || !entry.file_type.is_dir() {
        return None;
    }
    let target = entry.path().canonicalize().ok()?;
    dir.ancestors()
        .take_while(|a| a.starts_with(root))
        .filter_map(|a| a.canonicalize().ok())
        .any(|a| a.starts_with(&target))
        .then_some(target)
}

/// Size and token estimate of one file. A failed stat or read counts as zero.
fn measure_file(path: &Path, warnings: &mut Vec<ScanWarning>) -> (u64, u64) {
    let size = match std::fs::metadata(path) {
        Ok(m) => m.len(),
        Err(err) => {
            warn!(path = %path.display(), "metadata error: {err}");
            warnings.push(ScanWarning::metadata_error(path, &err));
            0
        }
    };
    (size, file_tokens(path, warnings))
}

/// Read a file and estimate its tokens, or zero when it is not readable text.
fn file_tokens(path: &Path, warnings: &mut Vec<ScanWarning>) -> u64 {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), "read error: {err}");
            warnings.push(ScanWarning::read_error(path, &err));
            return 0;
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) => estimate_text_tokens(&text),
        Err(_) => {
            debug!(path = %path.display(), "not valid UTF-8, counting zero tokens");
            warnings.push(ScanWarning::not_utf8(path));
            0
        }
    }
}

/// Temporary struct for collecting entry information.
struct EntryInfo {
    name: CompactString,
    path: PathBuf,
    kind: EntryKind,
}

enum EntryKind {
    Dir,
    File { size: u64, tokens: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("skills")).unwrap();
        fs::create_dir(root.join("skills/deploy")).unwrap();
        fs::create_dir(root.join("agents")).unwrap();
        fs::create_dir(root.join(".cache")).unwrap();

        fs::write(root.join("CLAUDE.md"), "a".repeat(40)).unwrap();
        fs::write(root.join("notes.log"), "ignored").unwrap();
        fs::write(root.join(".hidden.md"), "secret").unwrap();
        fs::write(root.join("skills/deploy/SKILL.md"), "b".repeat(12)).unwrap();
        fs::write(root.join("skills/deploy/run.sh"), "echo hi").unwrap();
        fs::write(root.join(".cache/page.md"), "cached").unwrap();

        temp
    }

    #[test]
    fn test_basic_scan() {
        let temp = create_test_tree();
        let result = DocScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        assert!(result.root_exists);
        assert_eq!(result.totals.files, 3);
        assert_eq!(result.totals.tokens, 10 + 3 + 1);

        let names: Vec<&str> = result.root.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["CLAUDE.md"]);
        assert_eq!(result.root.files[0].size, 40);
    }

    #[test]
    fn test_dirs_sorted_and_hidden_skipped() {
        let temp = create_test_tree();
        let node = DocScanner::new().scan_dir(temp.path());

        let dirs: Vec<&str> = node.dirs.keys().map(|k| k.as_str()).collect();
        assert_eq!(dirs, vec!["agents", "skills"]);
        assert!(node.dir("agents").unwrap().is_empty());

        let deploy = node.dir("skills").unwrap().dir("deploy").unwrap();
        let files: Vec<&str> = deploy.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(files, vec!["SKILL.md", "run.sh"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let result = DocScanner::new()
            .scan(&ScanConfig::new(temp.path().join("nope")))
            .unwrap();

        assert!(!result.root_exists);
        assert!(result.root.is_empty());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_non_utf8_counts_zero_tokens() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("blob.txt"), [0xffu8, 0xfe, 0x00, 0x80, 0x81]).unwrap();

        let result = DocScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();
        let file = &result.root.files[0];
        assert_eq!(file.size, 5);
        assert_eq!(file.tokens, 0);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::NotUtf8)
        );
    }

    #[test]
    fn test_ignore_patterns() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["skills".to_string()])
            .build()
            .unwrap();

        let result = DocScanner::new().scan(&config).unwrap();
        assert!(result.root.dir("skills").is_none());
        assert_eq!(result.totals.files, 1);
    }

    #[test]
    fn test_root_is_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("CLAUDE.md");
        fs::write(&file, "hello").unwrap();

        let result = DocScanner::new().scan(&ScanConfig::new(&file)).unwrap();
        assert!(result.root.is_empty());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_failed_stat_counts_zero() {
        let temp = TempDir::new().unwrap();
        let mut warnings = Vec::new();

        let (size, tokens) = measure_file(&temp.path().join("vanished.md"), &mut warnings);
        assert_eq!((size, tokens), (0, 0));

        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::MetadataError, WarningKind::ReadError]);
    }

    #[test]
    fn test_crlf_file_estimated_like_lf() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("crlf.md"), "ab\r\ncd\r\n").unwrap();
        fs::write(temp.path().join("lf.md"), "ab\ncd\n").unwrap();

        let result = DocScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();
        let files = &result.root.files;
        assert_eq!(files[0].name, "crlf.md");
        assert_eq!(files[0].size, 8);
        assert_eq!(files[0].tokens, 1);
        assert_eq!(files[1].tokens, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_does_not_stop_siblings() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("CLAUDE.md"), "a".repeat(8)).unwrap();
        symlink(temp.path().join("gone.md"), temp.path().join("broken.md")).unwrap();
        fs::write(temp.path().join("notes.md"), "b".repeat(4)).unwrap();

        let result = DocScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        let names: Vec<&str> = result.root.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["CLAUDE.md", "notes.md"]);
        assert_eq!(result.totals.tokens, 3);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::WalkError && w.path.ends_with("broken.md"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_self_loop_is_skipped() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("skills")).unwrap();
        fs::write(temp.path().join("skills/SKILL.md"), "s".repeat(8)).unwrap();
        symlink("..", temp.path().join("skills/up")).unwrap();
        symlink(".", temp.path().join("here")).unwrap();

        let result = DocScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();
        let skills = result.root.dir("skills").unwrap();

        assert!(result.root.dir("here").is_none());
        assert!(skills.dir("up").is_none());
        assert_eq!(result.totals.files, 1);
        assert_eq!(
            result
                .warnings
                .iter()
                .filter(|w| w.kind == WarningKind::WalkError)
                .count(),
            2
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed_when_disabled() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("real.md"), "r").unwrap();
        symlink(temp.path().join("real.md"), temp.path().join("link.md")).unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .follow_symlinks(false)
            .build()
            .unwrap();
        let result = DocScanner::new().scan(&config).unwrap();

        let names: Vec<&str> = result.root.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["real.md"]);
        assert!(!result.has_warnings());
    }
}
