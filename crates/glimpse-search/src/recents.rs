use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use glimpse_infra::store;
use glimpse_protocol::models::SearchHit;

pub(crate) const RECENT_OPENED_FILE: &str = "recent_opened.json";
pub(crate) const RECENT_SEARCHES_FILE: &str = "recent_searches.json";

/// Bounded most-recent-first list, deduplicated by hit path. Re-adding an
/// existing path moves it to the front without growing the list.
#[derive(Debug, Default, Clone)]
pub struct RecencyList {
    capacity: usize,
    items: VecDeque<SearchHit>,
}

impl RecencyList {
    pub fn new(capacity: usize, items: Vec<SearchHit>) -> Self {
        let mut list = Self {
            capacity: capacity.max(1),
            items: VecDeque::from(items),
        };
        list.items.truncate(list.capacity);
        list
    }

    pub fn touch(&mut self, hit: SearchHit) {
        self.items.retain(|existing| existing.path != hit.path);
        self.items.push_front(hit);
        self.items.truncate(self.capacity);
    }

    pub fn items(&self) -> Vec<SearchHit> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The two recency lists and their persistence. Mutations return the new
/// contents so the caller can persist them off the interactive path.
#[derive(Debug)]
pub struct RecencyStore {
    opened_path: PathBuf,
    searches_path: PathBuf,
    opened: Mutex<RecencyList>,
    searches: Mutex<RecencyList>,
}

impl RecencyStore {
    pub fn load(data_dir: &Path, capacity: usize) -> Self {
        let opened_path = data_dir.join(RECENT_OPENED_FILE);
        let searches_path = data_dir.join(RECENT_SEARCHES_FILE);
        let opened = RecencyList::new(capacity, store::read_json(&opened_path).unwrap_or_default());
        let searches =
            RecencyList::new(capacity, store::read_json(&searches_path).unwrap_or_default());
        Self {
            opened_path,
            searches_path,
            opened: Mutex::new(opened),
            searches: Mutex::new(searches),
        }
    }

    pub fn touch_opened(&self, hit: SearchHit) -> Vec<SearchHit> {
        match self.opened.lock() {
            Ok(mut list) => {
                list.touch(hit);
                list.items()
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn touch_searched(&self, hit: SearchHit) -> Vec<SearchHit> {
        match self.searches.lock() {
            Ok(mut list) => {
                list.touch(hit);
                list.items()
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn opened_items(&self) -> Vec<SearchHit> {
        match self.opened.lock() {
            Ok(list) => list.items(),
            Err(_) => Vec::new(),
        }
    }

    pub fn searched_items(&self) -> Vec<SearchHit> {
        match self.searches.lock() {
            Ok(list) => list.items(),
            Err(_) => Vec::new(),
        }
    }

    /// Best-effort writes of the given snapshots; memory stays
    /// authoritative when a write fails.
    pub fn save_opened(&self, items: &[SearchHit]) {
        store::write_json_best_effort(&self.opened_path, &items);
    }

    pub fn save_searched(&self, items: &[SearchHit]) {
        store::write_json_best_effort(&self.searches_path, &items);
    }
}

#[cfg(test)]
#[path = "../tests/recents/recents_tests.rs"]
mod tests;
