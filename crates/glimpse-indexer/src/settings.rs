use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glimpse_infra::store;
use glimpse_protocol::{AppResult, ResultExt};
use serde::{Deserialize, Serialize};

pub(crate) const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_DEBOUNCE_MS: u64 = 200;
const MIN_DEBOUNCE_MS: u64 = 50;
const MAX_DEBOUNCE_MS: u64 = 1_000;

pub const DEFAULT_RECENCY_CAPACITY: usize = 5;
const MIN_RECENCY_CAPACITY: usize = 1;
const MAX_RECENCY_CAPACITY: usize = 50;

const DEFAULT_INTERVAL_VALUE: u32 = 24;
const MIN_INTERVAL_VALUE: u32 = 1;
const MAX_INTERVAL_VALUE: u32 = 720;

#[cfg(windows)]
const HOME_ENV: &str = "USERPROFILE";
#[cfg(not(windows))]
const HOME_ENV: &str = "HOME";

/// Admission posture for the index builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexMode {
    /// Admit everything the exclusion rules let through.
    Permissive,
    /// Additionally drop hidden entries and files outside the allowlist.
    #[default]
    Conservative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalUnit {
    Hours,
    Days,
    Weeks,
}

impl IntervalUnit {
    fn as_millis(self) -> i64 {
        match self {
            IntervalUnit::Hours => 60 * 60 * 1_000,
            IntervalUnit::Days => 24 * 60 * 60 * 1_000,
            IntervalUnit::Weeks => 7 * 24 * 60 * 60 * 1_000,
        }
    }
}

/// When the index should be rebuilt from scratch rather than restored from
/// the on-disk cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IndexSchedule {
    Manual,
    OnStartup,
    Interval { value: u32, unit: IntervalUnit },
}

impl IndexSchedule {
    /// A missing or unreadable cache forces a rebuild regardless of schedule.
    pub fn is_rebuild_due(
        self,
        last_built_unix_ms: Option<i64>,
        cache_present: bool,
        now_unix_ms: i64,
    ) -> bool {
        if !cache_present {
            return true;
        }
        match self {
            IndexSchedule::Manual => false,
            IndexSchedule::OnStartup => true,
            IndexSchedule::Interval { value, unit } => match last_built_unix_ms {
                None => true,
                Some(last) => now_unix_ms - last > i64::from(value) * unit.as_millis(),
            },
        }
    }

    fn normalize(self) -> Self {
        match self {
            IndexSchedule::Interval { value, unit } => IndexSchedule::Interval {
                value: value.clamp(MIN_INTERVAL_VALUE, MAX_INTERVAL_VALUE),
                unit,
            },
            other => other,
        }
    }
}

/// Persisted search and indexing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettingsRecord {
    pub roots: Vec<String>,
    pub excluded_folders: Vec<String>,
    pub excluded_extensions: Vec<String>,
    pub mode: IndexMode,
    pub schedule: IndexSchedule,
    pub recency_capacity: usize,
    pub debounce_ms: u64,
    pub last_built_unix_ms: Option<i64>,
}

impl Default for SearchSettingsRecord {
    fn default() -> Self {
        Self {
            roots: default_search_roots(),
            excluded_folders: Vec::new(),
            excluded_extensions: Vec::new(),
            mode: IndexMode::default(),
            schedule: IndexSchedule::Interval {
                value: DEFAULT_INTERVAL_VALUE,
                unit: IntervalUnit::Hours,
            },
            recency_capacity: DEFAULT_RECENCY_CAPACITY,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            last_built_unix_ms: None,
        }
    }
}

impl SearchSettingsRecord {
    pub fn normalize(mut self) -> Self {
        self.roots = sanitize_roots(self.roots);
        if self.roots.is_empty() {
            self.roots = default_search_roots();
        }
        self.excluded_folders = sanitize_names(self.excluded_folders);
        self.excluded_extensions = sanitize_extensions(self.excluded_extensions);
        self.schedule = self.schedule.normalize();
        self.recency_capacity = self
            .recency_capacity
            .clamp(MIN_RECENCY_CAPACITY, MAX_RECENCY_CAPACITY);
        self.debounce_ms = self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        self
    }
}

pub fn load_settings(data_dir: &Path) -> SearchSettingsRecord {
    let record: SearchSettingsRecord =
        store::read_json(&data_dir.join(SETTINGS_FILE)).unwrap_or_default();
    record.normalize()
}

pub fn save_settings(data_dir: &Path, record: &SearchSettingsRecord) -> AppResult<()> {
    store::write_json_atomic(&data_dir.join(SETTINGS_FILE), record)
        .with_ctx("settingsFile", SETTINGS_FILE)
}

pub fn default_search_roots() -> Vec<String> {
    let mut roots = Vec::new();
    if let Ok(home) = std::env::var(HOME_ENV)
        && Path::new(&home).is_dir()
    {
        roots.push(home);
    }
    if roots.is_empty() {
        roots.push(String::from("/"));
    }
    roots
}

/// Well-known launcher locations scanned in addition to the configured roots.
pub fn default_application_roots() -> Vec<String> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    #[cfg(target_os = "windows")]
    {
        if let Ok(program_data) = std::env::var("ProgramData") {
            candidates.push(Path::new(&program_data).join("Microsoft/Windows/Start Menu/Programs"));
        }
        if let Ok(app_data) = std::env::var("APPDATA") {
            candidates.push(Path::new(&app_data).join("Microsoft/Windows/Start Menu/Programs"));
        }
    }
    #[cfg(target_os = "macos")]
    {
        candidates.push(PathBuf::from("/Applications"));
        candidates.push(PathBuf::from("/System/Applications"));
        if let Ok(home) = std::env::var("HOME") {
            candidates.push(Path::new(&home).join("Applications"));
        }
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        candidates.push(PathBuf::from("/usr/share/applications"));
        if let Ok(home) = std::env::var("HOME") {
            candidates.push(Path::new(&home).join(".local/share/applications"));
        }
    }
    candidates
        .into_iter()
        .filter(|path| path.is_dir())
        .map(|path| path.to_string_lossy().to_string())
        .collect()
}

fn sanitize_roots(roots: Vec<String>) -> Vec<String> {
    let mut values = Vec::new();
    let mut dedup = HashSet::new();
    for raw in roots {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !dedup.insert(trimmed.to_ascii_lowercase()) {
            continue;
        }
        values.push(trimmed.to_string());
    }
    values
}

fn sanitize_names(names: Vec<String>) -> Vec<String> {
    let mut values = Vec::new();
    let mut dedup = HashSet::new();
    for raw in names {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !dedup.insert(trimmed.to_ascii_lowercase()) {
            continue;
        }
        values.push(trimmed.to_string());
    }
    values
}

fn sanitize_extensions(extensions: Vec<String>) -> Vec<String> {
    let mut values = Vec::new();
    let mut dedup = HashSet::new();
    for raw in extensions {
        let trimmed = raw.trim().trim_start_matches('.').to_ascii_lowercase();
        if trimmed.is_empty() || !dedup.insert(trimmed.clone()) {
            continue;
        }
        values.push(trimmed);
    }
    values
}

#[cfg(test)]
#[path = "../tests/settings/settings_tests.rs"]
mod tests;
