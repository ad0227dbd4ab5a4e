use super::*;
use glimpse_protocol::models::{CatalogEntry, EntryKind};
use std::fs;
use uuid::Uuid;

fn hit(path: &str, name: &str) -> SearchHit {
    let entry = CatalogEntry::new(path, name, EntryKind::File);
    SearchHit::from_entry(&entry, 100)
}

fn create_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glimpse-recents-tests-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn sixth_item_should_evict_the_oldest_at_capacity_five() {
    let mut list = RecencyList::new(5, Vec::new());
    for index in 1..=6 {
        list.touch(hit(&format!("/a/item-{index}"), &format!("item-{index}")));
    }

    let items = list.items();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].path, "/a/item-6");
    assert!(!items.iter().any(|item| item.path == "/a/item-1"));
}

#[test]
fn re_adding_an_item_should_move_it_to_front_without_growing_the_list() {
    let mut list = RecencyList::new(5, Vec::new());
    for index in 1..=3 {
        list.touch(hit(&format!("/a/item-{index}"), &format!("item-{index}")));
    }

    list.touch(hit("/a/item-1", "item-1"));

    let items = list.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].path, "/a/item-1");
    assert_eq!(items[1].path, "/a/item-3");
}

#[test]
fn new_list_should_truncate_oversized_persisted_payloads() {
    let persisted: Vec<SearchHit> = (0..10)
        .map(|index| hit(&format!("/a/item-{index}"), &format!("item-{index}")))
        .collect();

    let list = RecencyList::new(5, persisted);

    assert_eq!(list.len(), 5);
}

#[test]
fn store_should_keep_opened_and_searched_lists_independent() {
    let dir = create_temp_dir();
    let store = RecencyStore::load(&dir, 5);

    store.touch_opened(hit("/a/doc.txt", "doc.txt"));
    store.touch_searched(SearchHit::web_search("rust async"));

    assert_eq!(store.opened_items().len(), 1);
    assert_eq!(store.searched_items().len(), 1);
    assert_eq!(store.opened_items()[0].path, "/a/doc.txt");
    assert_eq!(store.searched_items()[0].path, "rust async");

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn saved_snapshots_should_survive_a_reload() {
    let dir = create_temp_dir();
    let store = RecencyStore::load(&dir, 5);

    let opened = store.touch_opened(hit("/a/doc.txt", "doc.txt"));
    store.save_opened(&opened);
    let searched = store.touch_searched(SearchHit::web_search("rust async"));
    store.save_searched(&searched);

    let reloaded = RecencyStore::load(&dir, 5);
    assert_eq!(reloaded.opened_items().len(), 1);
    assert_eq!(reloaded.searched_items().len(), 1);

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}

#[test]
fn corrupt_recency_file_should_load_as_empty_list() {
    let dir = create_temp_dir();
    fs::write(dir.join(RECENT_OPENED_FILE), b"oops").expect("write corrupt file");

    let store = RecencyStore::load(&dir, 5);
    assert!(store.opened_items().is_empty());

    fs::remove_dir_all(&dir).expect("cleanup temp dir");
}
