use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use glimpse_protocol::models::CatalogEntry;

/// Immutable snapshot of every admissible filesystem entry known to the index.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog keyed by path. The first entry wins when scan roots
    /// overlap and report the same path twice.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut deduped = Vec::with_capacity(entries.len());
        for entry in entries {
            if seen.insert(entry.path.clone()) {
                deduped.push(entry);
            }
        }
        Self { entries: deduped }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refreshes the display-only usage counts from the live counters.
    pub fn stamp_usage(&mut self, lookup: impl Fn(&str) -> u32) {
        for entry in &mut self.entries {
            entry.usage_count = lookup(&entry.path);
        }
    }
}

/// Shared slot holding the currently published catalog. Readers take `Arc`
/// snapshots; a rebuild replaces the whole catalog in a single swap.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    inner: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(_) => Arc::new(Catalog::default()),
        }
    }

    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let shared = Arc::new(catalog);
        if let Ok(mut guard) = self.inner.write() {
            *guard = Arc::clone(&shared);
        }
        shared
    }
}

#[cfg(test)]
#[path = "../tests/catalog/catalog_tests.rs"]
mod tests;
