use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use glimpse_protocol::models::{CatalogEntry, EntryKind, IndexProgress};
use tokio::sync::watch;

use crate::policy::PolicyEvaluator;
use crate::settings::IndexMode;

const WARNING_SAMPLE_LIMIT: usize = 5;
const PROGRESS_REPORT_EVERY: u64 = 1_000;

/// Unreadable paths skipped during a walk, with a bounded sample for logs.
#[derive(Debug, Default, Clone)]
pub struct ScanWarnings {
    pub skipped_paths: u64,
    pub sample_paths: Vec<String>,
}

impl ScanWarnings {
    fn record(&mut self, path: &Path) {
        self.skipped_paths = self.skipped_paths.saturating_add(1);
        if self.sample_paths.len() < WARNING_SAMPLE_LIMIT {
            self.sample_paths.push(path.to_string_lossy().to_string());
        }
    }

    pub fn merge(&mut self, other: ScanWarnings) {
        self.skipped_paths = self.skipped_paths.saturating_add(other.skipped_paths);
        for sample in other.sample_paths {
            if self.sample_paths.len() >= WARNING_SAMPLE_LIMIT {
                break;
            }
            self.sample_paths.push(sample);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skipped_paths == 0
    }
}

/// Shared entry counter feeding the progress stream while walkers run on
/// blocking threads.
#[derive(Debug)]
pub struct ProgressReporter {
    entries: AtomicU64,
    tx: watch::Sender<IndexProgress>,
}

impl ProgressReporter {
    pub fn new(tx: watch::Sender<IndexProgress>) -> Self {
        tx.send_replace(IndexProgress::default());
        Self {
            entries: AtomicU64::new(0),
            tx,
        }
    }

    /// Counts one admitted entry and publishes a snapshot every
    /// `PROGRESS_REPORT_EVERY` entries. `send_replace` keeps the latest
    /// snapshot available to consumers that subscribe later.
    pub fn tick(&self) {
        let count = self.entries.fetch_add(1, Ordering::Relaxed) + 1;
        if count.is_multiple_of(PROGRESS_REPORT_EVERY) {
            self.tx.send_replace(IndexProgress {
                entries_indexed: count,
            });
        }
    }

    /// Publishes the final count once a build settles.
    pub fn complete(&self, entries_indexed: u64) {
        self.tx.send_replace(IndexProgress { entries_indexed });
    }
}

/// Walks one root breadth-first and returns every admitted entry under it.
/// The root itself is never indexed. Unreadable directories are counted and
/// skipped instead of failing the build.
pub fn scan_root(
    root: &Path,
    policy: &PolicyEvaluator,
    mode: IndexMode,
    reporter: &ProgressReporter,
) -> (Vec<CatalogEntry>, ScanWarnings) {
    let mut entries = Vec::new();
    let mut warnings = ScanWarnings::default();

    if policy.is_excluded(root) {
        return (entries, warnings);
    }
    if !root.is_dir() {
        warnings.record(root);
        return (entries, warnings);
    }

    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(current_dir) = queue.pop_front() {
        let dir_entries = match fs::read_dir(&current_dir) {
            Ok(dir_entries) => dir_entries,
            Err(_error) => {
                warnings.record(current_dir.as_path());
                continue;
            }
        };

        for dir_entry in dir_entries {
            let Ok(dir_entry) = dir_entry else {
                warnings.record(current_dir.as_path());
                continue;
            };
            let path = dir_entry.path();
            let file_type = match dir_entry.file_type() {
                Ok(file_type) => file_type,
                Err(_error) => {
                    warnings.record(path.as_path());
                    continue;
                }
            };
            if file_type.is_symlink() {
                continue;
            }
            if policy.is_excluded(path.as_path()) {
                continue;
            }
            let is_dir = file_type.is_dir();
            if !policy.is_admissible(path.as_path(), is_dir, mode) {
                continue;
            }

            let kind = EntryKind::for_path(path.as_path(), is_dir);
            let name = dir_entry.file_name().to_string_lossy().to_string();
            entries.push(CatalogEntry::new(
                path.to_string_lossy().to_string(),
                name,
                kind,
            ));
            reporter.tick();

            // Application bundles that are directories are leaves.
            if kind == EntryKind::Folder {
                queue.push_back(path);
            }
        }
    }

    (entries, warnings)
}

#[cfg(test)]
#[path = "../tests/scan/scan_tests.rs"]
mod tests;
