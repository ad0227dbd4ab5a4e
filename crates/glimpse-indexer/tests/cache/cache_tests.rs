use super::*;
use glimpse_protocol::models::EntryKind;
use std::fs;
use uuid::Uuid;

fn create_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glimpse-cache-tests-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn load_should_return_empty_catalog_when_no_cache_exists() {
    let dir = create_temp_dir();
    let cache = CatalogCache::new(&dir);

    assert!(!cache.exists());
    assert!(cache.load().is_empty());

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn save_then_load_should_preserve_the_entry_set() {
    let dir = create_temp_dir();
    let cache = CatalogCache::new(&dir);
    let catalog = Catalog::from_entries(vec![
        CatalogEntry::new("/home/u/notes.txt", "notes.txt", EntryKind::File),
        CatalogEntry::new("/home/u/projects", "projects", EntryKind::Folder),
    ]);

    cache.save(&catalog).expect("save catalog");

    assert!(cache.exists());
    let loaded = cache.load();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.entries()[0].path, "/home/u/notes.txt");

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn corrupt_cache_should_read_as_empty_catalog() {
    let dir = create_temp_dir();
    fs::write(dir.join(CATALOG_FILE), b"[{broken").expect("write corrupt cache");

    let cache = CatalogCache::new(&dir);
    assert!(cache.exists());
    assert!(cache.load().is_empty());

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn loaded_entries_should_carry_zero_usage_until_stamped() {
    let dir = create_temp_dir();
    let cache = CatalogCache::new(&dir);
    let mut catalog = Catalog::from_entries(vec![CatalogEntry::new(
        "/home/u/notes.txt",
        "notes.txt",
        EntryKind::File,
    )]);
    catalog.stamp_usage(|_| 9);

    cache.save(&catalog).expect("save catalog");
    let loaded = cache.load();

    assert_eq!(loaded.entries()[0].usage_count, 0);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}
