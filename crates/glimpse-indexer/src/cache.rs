use std::path::{Path, PathBuf};

use glimpse_infra::store;
use glimpse_protocol::models::CatalogEntry;
use glimpse_protocol::{AppResult, ResultExt};

use crate::catalog::Catalog;

pub(crate) const CATALOG_FILE: &str = "catalog.json";

/// On-disk copy of the last successful build. The file is a flat entry
/// list; record order carries no meaning and may change across saves.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CATALOG_FILE),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Absent or corrupt cache files read as an empty catalog; the startup
    /// schedule check treats that as "no cache" and forces a rebuild.
    pub fn load(&self) -> Catalog {
        let entries: Vec<CatalogEntry> = match store::read_json(&self.path) {
            Some(entries) => entries,
            None => {
                if self.exists() {
                    tracing::debug!(event = "catalog_cache_read_failed", path = %self.path.display());
                }
                Vec::new()
            }
        };
        Catalog::from_entries(entries)
    }

    pub fn save(&self, catalog: &Catalog) -> AppResult<()> {
        store::write_json_atomic(&self.path, &catalog.entries())
            .with_ctx("catalogFile", CATALOG_FILE)
    }
}

#[cfg(test)]
#[path = "../tests/cache/cache_tests.rs"]
mod tests;
