use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use glimpse_infra::store;

pub(crate) const USAGE_FILE: &str = "usage_counters.json";

/// Frozen copy of the counter map, handed out by `increment` so the caller
/// can persist it off the interactive path.
pub type UsageSnapshot = HashMap<String, u32>;

/// Launch counts per catalog path, kept apart from the catalog itself so
/// they survive a rebuild. Mutations happen at human interaction rates, so
/// a plain mutex is enough.
#[derive(Debug)]
pub struct UsageCounters {
    path: PathBuf,
    counts: Mutex<UsageSnapshot>,
}

impl UsageCounters {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(USAGE_FILE);
        let counts = store::read_json(&path).unwrap_or_default();
        Self {
            path,
            counts: Mutex::new(counts),
        }
    }

    pub fn get(&self, entry_path: &str) -> u32 {
        match self.counts.lock() {
            Ok(counts) => counts.get(entry_path).copied().unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Bumps the counter and returns the whole map for persistence.
    pub fn increment(&self, entry_path: &str) -> UsageSnapshot {
        match self.counts.lock() {
            Ok(mut counts) => {
                let slot = counts.entry(entry_path.to_string()).or_insert(0);
                *slot = slot.saturating_add(1);
                counts.clone()
            }
            Err(_) => UsageSnapshot::default(),
        }
    }

    /// Best-effort write; a failed save leaves the in-memory counts
    /// authoritative until the next increment.
    pub fn save_snapshot(&self, snapshot: &UsageSnapshot) {
        store::write_json_best_effort(&self.path, snapshot);
    }
}

#[cfg(test)]
#[path = "../tests/usage/usage_tests.rs"]
mod tests;
