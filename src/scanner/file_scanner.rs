use crate::config::ScanConfig;
use crate::error::Result;
use crate::scanner::glob_pattern::GlobPattern;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFile {
    /// Path as the pattern spelled it: root joined with the matched remainder.
    pub path: PathBuf,
    pub size: u64,
}

impl ScanFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

pub struct FileScanner {
    pattern: GlobPattern,
    include_hidden: bool,
    follow_links: bool,
}

impl FileScanner {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            pattern: GlobPattern::new(&config.pattern)?,
            include_hidden: config.include_hidden,
            follow_links: config.follow_links,
        })
    }

    pub fn pattern(&self) -> &GlobPattern {
        &self.pattern
    }

    /// Resolves the pattern into a sorted, fixed list of regular files.
    /// Matching nothing is not an error.
    pub fn scan(&self) -> Result<Vec<ScanFile>> {
        if self.pattern.is_literal() {
            return Ok(self.scan_literal());
        }

        let root = self.pattern.root();
        let walk_root = if root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            root
        };

        if !walk_root.is_dir() {
            debug!(root = %walk_root.display(), "pattern root is not a directory");
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(walk_root)
            .min_depth(1)
            .follow_links(self.follow_links);
        if let Some(max_depth) = self.pattern.max_depth() {
            walker = walker.max_depth(max_depth);
        }

        let mut files = Vec::new();

        for entry in walker.into_iter().filter_entry(|e| self.should_traverse(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        warn!("Permission denied while scanning: {}", err);
                    } else {
                        warn!("Scan error: {}", err);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(relative) = relative_key(entry.path(), walk_root) else {
                continue;
            };

            if !self.pattern.matches_relative(&relative) {
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    warn!("Cannot read metadata for {}: {}", entry.path().display(), err);
                    0
                }
            };

            files.push(ScanFile::new(root.join(&relative), size));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(pattern = self.pattern.as_str(), count = files.len(), "scan finished");

        Ok(files)
    }

    fn scan_literal(&self) -> Vec<ScanFile> {
        let path = self.pattern.root();
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => {
                vec![ScanFile::new(path.to_path_buf(), metadata.len())]
            }
            _ => Vec::new(),
        }
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        if self.include_hidden || entry.depth() == 0 {
            return true;
        }

        match entry.file_name().to_str() {
            Some(name) if name.starts_with('.') => {
                self.pattern.names_hidden(entry.depth(), name)
            }
            _ => true,
        }
    }

    pub fn get_statistics(&self, files: &[ScanFile]) -> ScanStatistics {
        let (largest_file_size, largest_file_path) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, f.path.clone()))
            .unwrap_or((0, PathBuf::new()));

        ScanStatistics {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            largest_file_size,
            largest_file_path,
        }
    }
}

/// `/`-joined path of `path` below `root`, or `None` if it escapes the root.
fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    Some(parts.join("/"))
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_path: PathBuf,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_path.display(),
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
