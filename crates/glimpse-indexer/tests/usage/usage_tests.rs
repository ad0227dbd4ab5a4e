use super::*;
use std::fs;
use uuid::Uuid;

fn create_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glimpse-usage-tests-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn unknown_paths_should_count_zero() {
    let dir = create_temp_dir();
    let counters = UsageCounters::load(&dir);

    assert_eq!(counters.get("/never/launched"), 0);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn increment_should_bump_count_and_return_full_snapshot() {
    let dir = create_temp_dir();
    let counters = UsageCounters::load(&dir);

    counters.increment("/apps/editor.desktop");
    counters.increment("/apps/editor.desktop");
    let snapshot = counters.increment("/home/u/report.pdf");

    assert_eq!(counters.get("/apps/editor.desktop"), 2);
    assert_eq!(counters.get("/home/u/report.pdf"), 1);
    assert_eq!(snapshot.get("/apps/editor.desktop"), Some(&2));
    assert_eq!(snapshot.get("/home/u/report.pdf"), Some(&1));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn saved_snapshot_should_survive_a_reload() {
    let dir = create_temp_dir();
    let counters = UsageCounters::load(&dir);
    let snapshot = counters.increment("/apps/editor.desktop");
    counters.save_snapshot(&snapshot);

    let reloaded = UsageCounters::load(&dir);
    assert_eq!(reloaded.get("/apps/editor.desktop"), 1);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn corrupt_counter_file_should_load_as_empty() {
    let dir = create_temp_dir();
    fs::write(dir.join(USAGE_FILE), b"not json").expect("write corrupt counters");

    let counters = UsageCounters::load(&dir);
    assert_eq!(counters.get("/apps/editor.desktop"), 0);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}
