use super::*;
use std::fs;
use uuid::Uuid;

fn create_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glimpse-settings-tests-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn defaults_should_be_conservative_with_daily_interval() {
    let record = SearchSettingsRecord::default();
    assert_eq!(record.mode, IndexMode::Conservative);
    assert_eq!(
        record.schedule,
        IndexSchedule::Interval {
            value: 24,
            unit: IntervalUnit::Hours
        }
    );
    assert_eq!(record.recency_capacity, DEFAULT_RECENCY_CAPACITY);
    assert_eq!(record.debounce_ms, DEFAULT_DEBOUNCE_MS);
    assert!(record.last_built_unix_ms.is_none());
    assert!(!record.roots.is_empty());
}

#[test]
fn normalize_should_clamp_numeric_fields_into_bounds() {
    let record = SearchSettingsRecord {
        recency_capacity: 0,
        debounce_ms: 10_000,
        schedule: IndexSchedule::Interval {
            value: 0,
            unit: IntervalUnit::Weeks,
        },
        ..SearchSettingsRecord::default()
    }
    .normalize();

    assert_eq!(record.recency_capacity, MIN_RECENCY_CAPACITY);
    assert_eq!(record.debounce_ms, MAX_DEBOUNCE_MS);
    assert_eq!(
        record.schedule,
        IndexSchedule::Interval {
            value: MIN_INTERVAL_VALUE,
            unit: IntervalUnit::Weeks
        }
    );
}

#[test]
fn normalize_should_drop_blank_and_duplicate_list_entries() {
    let record = SearchSettingsRecord {
        excluded_folders: vec![
            "Temp".to_string(),
            "  ".to_string(),
            "temp".to_string(),
            "Cache".to_string(),
        ],
        excluded_extensions: vec![
            ".ISO".to_string(),
            "iso".to_string(),
            String::new(),
            "tmp".to_string(),
        ],
        ..SearchSettingsRecord::default()
    }
    .normalize();

    assert_eq!(record.excluded_folders, vec!["Temp", "Cache"]);
    assert_eq!(record.excluded_extensions, vec!["iso", "tmp"]);
}

#[test]
fn normalize_should_restore_default_roots_when_all_are_blank() {
    let record = SearchSettingsRecord {
        roots: vec!["  ".to_string(), String::new()],
        ..SearchSettingsRecord::default()
    }
    .normalize();

    assert!(!record.roots.is_empty());
}

#[test]
fn missing_cache_should_force_rebuild_for_every_schedule() {
    let now = 1_000_000;
    for schedule in [
        IndexSchedule::Manual,
        IndexSchedule::OnStartup,
        IndexSchedule::Interval {
            value: 24,
            unit: IntervalUnit::Hours,
        },
    ] {
        assert!(schedule.is_rebuild_due(Some(now), false, now));
    }
}

#[test]
fn manual_schedule_should_never_rebuild_when_cache_is_present() {
    assert!(!IndexSchedule::Manual.is_rebuild_due(None, true, 1_000_000));
}

#[test]
fn on_startup_schedule_should_always_rebuild() {
    assert!(IndexSchedule::OnStartup.is_rebuild_due(Some(999), true, 1_000));
}

#[test]
fn interval_schedule_should_rebuild_only_after_the_interval_elapses() {
    let schedule = IndexSchedule::Interval {
        value: 2,
        unit: IntervalUnit::Hours,
    };
    let two_hours_ms = 2 * 60 * 60 * 1_000;
    let built_at = 1_000_000;

    assert!(!schedule.is_rebuild_due(Some(built_at), true, built_at + two_hours_ms));
    assert!(schedule.is_rebuild_due(Some(built_at), true, built_at + two_hours_ms + 1));
    // Never built but a cache exists: rebuild.
    assert!(schedule.is_rebuild_due(None, true, built_at));
}

#[test]
fn settings_should_round_trip_through_disk() {
    let dir = create_temp_dir();
    let record = SearchSettingsRecord {
        roots: vec!["/srv/media".to_string()],
        excluded_folders: vec!["cache".to_string()],
        mode: IndexMode::Permissive,
        schedule: IndexSchedule::OnStartup,
        last_built_unix_ms: Some(42),
        ..SearchSettingsRecord::default()
    };

    save_settings(&dir, &record).expect("save settings");
    let loaded = load_settings(&dir);

    assert_eq!(loaded, record);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn load_settings_should_fall_back_to_defaults_for_corrupt_file() {
    let dir = create_temp_dir();
    fs::write(dir.join(SETTINGS_FILE), b"{broken").expect("write corrupt settings");

    let loaded = load_settings(&dir);
    assert_eq!(loaded.mode, IndexMode::Conservative);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}
