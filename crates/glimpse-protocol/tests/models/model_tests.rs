use super::*;
use std::path::PathBuf;

#[test]
fn application_extension_should_win_over_directory_status() {
    for ext in APPLICATION_EXTENSIONS {
        let path = PathBuf::from(format!("/opt/tools/launcher.{ext}"));
        assert_eq!(EntryKind::for_path(&path, false), EntryKind::Application);
        assert_eq!(EntryKind::for_path(&path, true), EntryKind::Application);
    }
}

#[test]
fn application_extension_match_should_be_case_insensitive() {
    let ext = APPLICATION_EXTENSIONS[0].to_ascii_uppercase();
    let path = PathBuf::from(format!("/opt/tools/LAUNCHER.{ext}"));
    assert_eq!(EntryKind::for_path(&path, false), EntryKind::Application);
}

#[test]
fn plain_paths_should_classify_by_directory_status() {
    assert_eq!(EntryKind::for_path(&PathBuf::from("/home/u/notes.txt"), false), EntryKind::File);
    assert_eq!(EntryKind::for_path(&PathBuf::from("/home/u/projects"), true), EntryKind::Folder);
    assert_eq!(EntryKind::for_path(&PathBuf::from("/home/u/README"), false), EntryKind::File);
}

#[test]
fn usage_count_should_not_round_trip_through_serde() {
    let mut entry = CatalogEntry::new("/home/u/notes.txt", "notes.txt", EntryKind::File);
    entry.usage_count = 7;

    let json = serde_json::to_string(&entry).expect("serialize entry");
    assert!(!json.contains("usage"));

    let back: CatalogEntry = serde_json::from_str(&json).expect("deserialize entry");
    assert_eq!(back.usage_count, 0);
    assert_eq!(back.path, entry.path);
    assert_eq!(back.kind, EntryKind::File);
}

#[test]
fn web_search_hit_should_use_quoted_query_name() {
    let hit = SearchHit::web_search("hello");
    assert_eq!(hit.name, "Search for \"hello\"");
    assert_eq!(hit.path, "hello");
    assert_eq!(hit.kind, HitKind::WebSearch);
    assert_eq!(hit.group, "Web Search");
}

#[test]
fn hit_group_labels_should_match_presentation_contract() {
    assert_eq!(HitKind::Application.group_label(), "Apps");
    assert_eq!(HitKind::Folder.group_label(), "Folders");
    assert_eq!(HitKind::File.group_label(), "Files");
    assert_eq!(HitKind::Url.group_label(), "Go to Address");
    assert_eq!(HitKind::Command.group_label(), "Commands");
}

#[test]
fn with_group_should_relabel_hit_for_recency_views() {
    let entry = CatalogEntry::new("/home/u/report.pdf", "report.pdf", EntryKind::File);
    let hit = SearchHit::from_entry(&entry, 100).with_group("Recently Opened");
    assert_eq!(hit.group, "Recently Opened");
}
