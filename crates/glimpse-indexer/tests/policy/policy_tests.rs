use super::*;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

fn settings_with(excluded_folders: &[&str], excluded_extensions: &[&str]) -> SearchSettingsRecord {
    SearchSettingsRecord {
        excluded_folders: excluded_folders.iter().map(|s| s.to_string()).collect(),
        excluded_extensions: excluded_extensions.iter().map(|s| s.to_string()).collect(),
        ..SearchSettingsRecord::default()
    }
}

fn create_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glimpse-policy-tests-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn protected_folder_should_be_excluded_regardless_of_configuration() {
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));
    assert!(policy.is_excluded(&PathBuf::from("/home/u/Personal Vault")));
    assert!(policy.is_excluded(&PathBuf::from("/home/u/personal vault")));
}

#[test]
fn folder_exclusion_should_match_final_segment_prefix_case_insensitively() {
    let policy = PolicyEvaluator::from_settings(&settings_with(&["node_modules"], &[]));
    assert!(policy.is_excluded(&PathBuf::from("/repo/node_modules")));
    assert!(policy.is_excluded(&PathBuf::from("/repo/NODE_MODULES")));
    // Prefix on the final segment only, not anywhere in the full path.
    assert!(!policy.is_excluded(&PathBuf::from("/repo/node_modules/src")));
    assert!(policy.is_excluded(&PathBuf::from("/repo/node_modules_backup")));
}

#[test]
fn folder_exclusion_should_not_match_mid_path_segments() {
    let policy = PolicyEvaluator::from_settings(&settings_with(&["temp"], &[]));
    assert!(!policy.is_excluded(&PathBuf::from("/home/temp-stuff-archive/report.pdf")));
    assert!(policy.is_excluded(&PathBuf::from("/home/u/temp")));
    assert!(policy.is_excluded(&PathBuf::from("/home/u/temporary")));
}

#[test]
fn extension_exclusion_should_be_case_insensitive_and_skip_extensionless_paths() {
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &["iso", ".TMP"]));
    assert!(policy.is_excluded(&PathBuf::from("/downloads/image.ISO")));
    assert!(policy.is_excluded(&PathBuf::from("/downloads/scratch.tmp")));
    assert!(!policy.is_excluded(&PathBuf::from("/downloads/README")));
    assert!(!policy.is_excluded(&PathBuf::from("/downloads/notes.txt")));
}

#[test]
fn permissive_mode_should_admit_without_touching_the_filesystem() {
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));
    // The path does not exist; permissive admission must not probe it.
    let ghost = PathBuf::from("/definitely/not/a/real/path/ghost.bin");
    assert!(policy.is_admissible(&ghost, false, IndexMode::Permissive));
}

#[test]
fn conservative_mode_should_exclude_when_attributes_cannot_be_read() {
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));
    let ghost = PathBuf::from("/definitely/not/a/real/path/ghost.txt");
    assert!(!policy.is_admissible(&ghost, false, IndexMode::Conservative));
}

#[test]
fn conservative_mode_should_admit_allowlisted_files_only() {
    let dir = create_temp_dir();
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));

    let allowed = dir.join("notes.txt");
    let denied = dir.join("core.dump");
    let extensionless = dir.join("README");
    fs::write(&allowed, b"x").expect("write allowed");
    fs::write(&denied, b"x").expect("write denied");
    fs::write(&extensionless, b"x").expect("write extensionless");

    assert!(policy.is_admissible(&allowed, false, IndexMode::Conservative));
    assert!(!policy.is_admissible(&denied, false, IndexMode::Conservative));
    assert!(!policy.is_admissible(&extensionless, false, IndexMode::Conservative));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn conservative_mode_should_not_apply_allowlist_to_directories() {
    let dir = create_temp_dir();
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));

    let plain_dir = dir.join("projects");
    fs::create_dir_all(&plain_dir).expect("create dir");
    assert!(policy.is_admissible(&plain_dir, true, IndexMode::Conservative));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn conservative_mode_should_drop_dot_prefixed_entries() {
    let dir = create_temp_dir();
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));

    let hidden = dir.join(".secrets.txt");
    fs::write(&hidden, b"x").expect("write hidden");
    assert!(!policy.is_admissible(&hidden, false, IndexMode::Conservative));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn conservative_allowlist_should_include_application_extensions() {
    let dir = create_temp_dir();
    let policy = PolicyEvaluator::from_settings(&settings_with(&[], &[]));

    let app = dir.join(format!("tool.{}", APPLICATION_EXTENSIONS[0]));
    fs::write(&app, b"x").expect("write app");
    assert!(policy.is_admissible(&app, false, IndexMode::Conservative));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn excluded_folder_should_win_over_conservative_allowlist() {
    let dir = create_temp_dir();
    let policy = PolicyEvaluator::from_settings(&settings_with(&["archive"], &[]));

    let inside = dir.join("archive");
    fs::create_dir_all(&inside).expect("create dir");
    // Exclusion is checked first; admission never gets a say.
    assert!(policy.is_excluded(&inside));

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}
