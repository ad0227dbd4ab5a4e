use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use glimpse_infra::blocking::run_blocking;
use glimpse_infra::time::now_unix_ms;
use glimpse_protocol::AppResult;
use glimpse_protocol::models::IndexProgress;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::cache::CatalogCache;
use crate::catalog::{Catalog, CatalogHandle};
use crate::policy::PolicyEvaluator;
use crate::scan::{ProgressReporter, ScanWarnings, scan_root};
use crate::settings::{
    SearchSettingsRecord, default_application_roots, load_settings, save_settings,
};
use crate::usage::UsageCounters;

/// Why a rebuild was requested; logged with every refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Startup,
    Manual,
    Scheduled,
}

impl RefreshReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshReason::Startup => "startup",
            RefreshReason::Manual => "manual",
            RefreshReason::Scheduled => "scheduled",
        }
    }
}

/// Owns the published catalog, the settings record, the usage counters and
/// the rebuild lifecycle. Constructed once at startup and shared by
/// reference; there is no process-global index state.
pub struct IndexService {
    data_dir: PathBuf,
    settings: Mutex<SearchSettingsRecord>,
    catalog: CatalogHandle,
    cache: CatalogCache,
    usage: Arc<UsageCounters>,
    building: AtomicBool,
    rebuild_lock: tokio::sync::Mutex<()>,
    progress_tx: watch::Sender<IndexProgress>,
}

impl IndexService {
    pub fn new(data_dir: &Path) -> Self {
        let settings = load_settings(data_dir);
        let (progress_tx, _progress_rx) = watch::channel(IndexProgress::default());
        Self {
            data_dir: data_dir.to_path_buf(),
            settings: Mutex::new(settings),
            catalog: CatalogHandle::default(),
            cache: CatalogCache::new(data_dir),
            usage: Arc::new(UsageCounters::load(data_dir)),
            building: AtomicBool::new(false),
            rebuild_lock: tokio::sync::Mutex::new(()),
            progress_tx,
        }
    }

    pub fn settings(&self) -> SearchSettingsRecord {
        match self.settings.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => SearchSettingsRecord::default(),
        }
    }

    /// Normalizes, persists and installs a new settings record. The next
    /// rebuild picks it up; the installed catalog is left untouched.
    pub fn update_settings(&self, record: SearchSettingsRecord) -> AppResult<()> {
        let record = record.normalize();
        save_settings(&self.data_dir, &record)?;
        if let Ok(mut guard) = self.settings.lock() {
            *guard = record;
        }
        Ok(())
    }

    /// `Arc` snapshot of the currently installed catalog.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.snapshot()
    }

    pub fn usage(&self) -> &Arc<UsageCounters> {
        &self.usage
    }

    pub fn is_building(&self) -> bool {
        self.building.load(Ordering::SeqCst)
    }

    pub fn progress(&self) -> watch::Receiver<IndexProgress> {
        self.progress_tx.subscribe()
    }

    /// Startup path: rebuild when the schedule says so or the cache is
    /// missing/corrupt, otherwise restore the cached catalog.
    pub async fn startup_refresh(&self) {
        let settings = self.settings();
        // A present-but-unreadable cache loads as empty and counts as "no
        // cache", which forces a rebuild regardless of schedule.
        let cached = Some(self.cache.load()).filter(|catalog| !catalog.is_empty());
        let due = settings.schedule.is_rebuild_due(
            settings.last_built_unix_ms,
            cached.is_some(),
            now_unix_ms(),
        );
        if due {
            self.refresh_index(RefreshReason::Startup).await;
            return;
        }

        let mut catalog = cached.unwrap_or_default();
        let usage = Arc::clone(&self.usage);
        catalog.stamp_usage(|path| usage.get(path));
        let installed = self.catalog.install(catalog);
        self.progress_tx.send_replace(IndexProgress {
            entries_indexed: installed.len() as u64,
        });
        tracing::info!(event = "catalog_cache_restored", entries = installed.len());
    }

    /// Full rebuild: walks every root concurrently, persists the result and
    /// installs it in a single swap. A request arriving while a rebuild is
    /// already running returns without starting a second walk. Per-subtree
    /// failures are summarized per root, never fatal.
    pub async fn refresh_index(&self, reason: RefreshReason) {
        let Ok(_rebuild_guard) = self.rebuild_lock.try_lock() else {
            tracing::info!(event = "index_refresh_skipped_running", reason = reason.as_str());
            return;
        };
        self.building.store(true, Ordering::SeqCst);
        let started_at = Instant::now();

        let settings = self.settings();
        let roots = gather_roots(&settings);
        tracing::info!(
            event = "index_refresh_started",
            reason = reason.as_str(),
            roots = roots.len(),
            mode = ?settings.mode
        );

        // Release the previous catalog before walking so peak memory during
        // a rebuild is bounded by the new tree alone. Readers see a fully
        // formed (empty) catalog until the new one is installed.
        self.catalog.install(Catalog::default());

        let policy = Arc::new(PolicyEvaluator::from_settings(&settings));
        let reporter = Arc::new(ProgressReporter::new(self.progress_tx.clone()));
        let mode = settings.mode;

        let mut walkers = JoinSet::new();
        for root in roots {
            let policy = Arc::clone(&policy);
            let reporter = Arc::clone(&reporter);
            walkers.spawn(async move {
                let scan_path = PathBuf::from(&root);
                let outcome = run_blocking("index_scan_root", move || {
                    Ok(scan_root(scan_path.as_path(), &policy, mode, &reporter))
                })
                .await;
                (root, outcome)
            });
        }

        let mut entries = Vec::new();
        let mut warnings = ScanWarnings::default();
        while let Some(joined) = walkers.join_next().await {
            let Ok((root, outcome)) = joined else {
                continue;
            };
            match outcome {
                Ok((root_entries, root_warnings)) => {
                    if !root_warnings.is_empty() {
                        tracing::warn!(
                            event = "index_root_paths_skipped",
                            root = root.as_str(),
                            skipped = root_warnings.skipped_paths,
                            samples = ?root_warnings.sample_paths
                        );
                    }
                    entries.extend(root_entries);
                    warnings.merge(root_warnings);
                }
                Err(error) => {
                    tracing::warn!(
                        event = "index_root_scan_failed",
                        root = root.as_str(),
                        error = %error
                    );
                }
            }
        }

        let mut catalog = Catalog::from_entries(entries);
        if let Err(error) = self.cache.save(&catalog) {
            tracing::warn!(event = "catalog_cache_write_failed", error = %error);
        }

        let usage = Arc::clone(&self.usage);
        catalog.stamp_usage(|path| usage.get(path));
        let installed = self.catalog.install(catalog);
        reporter.complete(installed.len() as u64);
        self.mark_built(now_unix_ms());
        self.building.store(false, Ordering::SeqCst);

        tracing::info!(
            event = "index_refresh_finished",
            reason = reason.as_str(),
            entries = installed.len(),
            skipped_paths = warnings.skipped_paths,
            duration_ms = started_at.elapsed().as_millis() as u64
        );
    }

    /// Only a successful rebuild moves the schedule timestamp; a failed
    /// settings write keeps the in-memory record current anyway.
    fn mark_built(&self, built_unix_ms: i64) {
        let updated = match self.settings.lock() {
            Ok(mut guard) => {
                guard.last_built_unix_ms = Some(built_unix_ms);
                guard.clone()
            }
            Err(_) => return,
        };
        if let Err(error) = save_settings(&self.data_dir, &updated) {
            tracing::debug!(event = "settings_write_skipped", error = %error);
        }
    }
}

/// Configured roots plus the platform application locations, deduplicated
/// case-insensitively with first occurrence winning.
fn gather_roots(settings: &SearchSettingsRecord) -> Vec<String> {
    let mut roots = Vec::new();
    let mut seen = HashSet::new();
    for root in settings.roots.iter().cloned().chain(default_application_roots()) {
        if seen.insert(root.to_lowercase()) {
            roots.push(root);
        }
    }
    roots
}

#[cfg(test)]
#[path = "../tests/service/service_tests.rs"]
mod tests;
