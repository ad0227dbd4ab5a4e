use std::path::Path;
use std::sync::Arc;

use glimpse_indexer::{IndexService, RefreshReason};
use glimpse_protocol::models::{HitKind, IndexProgress, QueryView, SearchHit};
use tokio::sync::watch;

use crate::controller::QueryController;
use crate::fastpath::{ClipboardProvider, FastPath, FastPathChain};
use crate::recents::RecencyStore;

/// Optional collaborators injected by the host: the two middle fast-path
/// slots and the clipboard-history source.
#[derive(Default)]
pub struct Collaborators {
    pub arithmetic: Option<Box<dyn FastPath>>,
    pub conversion: Option<Box<dyn FastPath>>,
    pub clipboard: Option<Arc<dyn ClipboardProvider>>,
}

/// Everything the host needs in one place: the index lifecycle, the query
/// pipeline and the launch/search bookkeeping. Constructed once at startup
/// and shared by reference.
pub struct SearchService {
    index: Arc<IndexService>,
    recents: Arc<RecencyStore>,
    controller: QueryController,
}

impl SearchService {
    pub fn new(data_dir: &Path) -> Self {
        Self::with_collaborators(data_dir, Collaborators::default())
    }

    pub fn with_collaborators(data_dir: &Path, collaborators: Collaborators) -> Self {
        let index = Arc::new(IndexService::new(data_dir));
        let capacity = index.settings().recency_capacity;
        let recents = Arc::new(RecencyStore::load(data_dir, capacity));
        let fast_paths = FastPathChain::new(
            collaborators.arithmetic,
            collaborators.conversion,
            collaborators.clipboard,
        );
        let controller =
            QueryController::new(Arc::clone(&index), Arc::clone(&recents), fast_paths);
        Self {
            index,
            recents,
            controller,
        }
    }

    /// Restores or rebuilds the catalog per the schedule, then presents the
    /// default view.
    pub async fn startup(&self) {
        self.index.startup_refresh().await;
        self.controller.show_default_view();
    }

    pub fn index(&self) -> &Arc<IndexService> {
        &self.index
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn views(&self) -> watch::Receiver<QueryView> {
        self.controller.views()
    }

    pub fn progress(&self) -> watch::Receiver<IndexProgress> {
        self.index.progress()
    }

    pub fn query(&self, raw_query: &str) {
        self.controller.on_query_changed(raw_query);
    }

    pub async fn rebuild(&self) {
        self.index.refresh_index(RefreshReason::Manual).await;
        self.controller.refresh_idle_view();
    }

    /// Launch bookkeeping: bump the usage counter, front-insert into the
    /// opened-items list and refresh the idle view. Persistence runs as a
    /// detached best-effort task; command hits are never recorded.
    pub fn record_opened(&self, hit: &SearchHit) {
        if hit.kind == HitKind::Command {
            return;
        }
        let usage_snapshot = self.index.usage().increment(&hit.path);
        let opened_snapshot = self.recents.touch_opened(hit.clone());

        let usage = Arc::clone(self.index.usage());
        let recents = Arc::clone(&self.recents);
        tokio::task::spawn_blocking(move || {
            usage.save_snapshot(&usage_snapshot);
            recents.save_opened(&opened_snapshot);
        });

        self.controller.refresh_idle_view();
    }

    /// Executed-search bookkeeping, used by hosts when a web-search hit is
    /// launched so the query can be re-run from the default view.
    pub fn record_searched(&self, hit: &SearchHit) {
        if hit.kind == HitKind::Command {
            return;
        }
        let searched_snapshot = self.recents.touch_searched(hit.clone());

        let recents = Arc::clone(&self.recents);
        tokio::task::spawn_blocking(move || {
            recents.save_searched(&searched_snapshot);
        });

        self.controller.refresh_idle_view();
    }
}

#[cfg(test)]
#[path = "../tests/service/search_service_tests.rs"]
mod tests;
