use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use glimpse_indexer::{IndexMode, IndexService};
use glimpse_infra::blocking::run_blocking;
use glimpse_protocol::models::{QueryView, SearchHit};
use tokio::sync::watch;

use crate::fastpath::FastPathChain;
use crate::rank;
use crate::recents::RecencyStore;

pub const SETTINGS_COMMAND_PATH: &str = "command:settings";
pub const EXIT_COMMAND_PATH: &str = "command:exit";

/// Extensions hidden from conservative-mode result lists. Ranking itself is
/// untouched; this is a display-side filter.
const NOISY_EXTENSIONS: [&str; 6] = ["log", "tmp", "bak", "cache", "pkg", "js"];
const CONSERVATIVE_DISPLAY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Debouncing,
    Searching,
    Presenting,
}

/// Debounced query pipeline. Every edit takes a fresh generation token; a
/// pass whose token is no longer the latest is dropped at the publish gate,
/// so stale results are never presented after newer ones.
#[derive(Clone)]
pub struct QueryController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    index: Arc<IndexService>,
    recents: Arc<RecencyStore>,
    fast_paths: FastPathChain,
    generation: AtomicU64,
    gate: Mutex<QueryPhase>,
    view_tx: watch::Sender<QueryView>,
}

impl QueryController {
    pub fn new(
        index: Arc<IndexService>,
        recents: Arc<RecencyStore>,
        fast_paths: FastPathChain,
    ) -> Self {
        let (view_tx, _view_rx) = watch::channel(QueryView::default());
        Self {
            inner: Arc::new(ControllerInner {
                index,
                recents,
                fast_paths,
                generation: AtomicU64::new(0),
                gate: Mutex::new(QueryPhase::Idle),
                view_tx,
            }),
        }
    }

    pub fn views(&self) -> watch::Receiver<QueryView> {
        self.inner.view_tx.subscribe()
    }

    pub fn phase(&self) -> QueryPhase {
        match self.inner.gate.lock() {
            Ok(phase) => *phase,
            Err(_) => QueryPhase::Idle,
        }
    }

    /// Keystroke entry point. Empty or whitespace queries bypass the
    /// debounce and restore the default view immediately; anything else
    /// restarts the quiet-period timer.
    pub fn on_query_changed(&self, raw_query: &str) {
        let generation = self.inner.next_generation();
        let raw_query = raw_query.to_string();

        if raw_query.trim().is_empty() {
            self.inner
                .publish(generation, self.inner.default_view(), QueryPhase::Idle);
            return;
        }

        self.inner.set_phase(QueryPhase::Debouncing);
        let inner = Arc::clone(&self.inner);
        let debounce = Duration::from_millis(inner.index.settings().debounce_ms);
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if inner.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            inner.set_phase(QueryPhase::Searching);

            let hits = match inner.fast_paths.evaluate(&raw_query) {
                Some(hits) => hits,
                None => inner.ranked_hits(&raw_query).await,
            };
            inner.publish(
                generation,
                QueryView {
                    query: raw_query,
                    hits,
                },
                QueryPhase::Presenting,
            );
        });
    }

    /// Clears any pending or in-flight search and shows the default view.
    pub fn show_default_view(&self) {
        let generation = self.inner.next_generation();
        self.inner
            .publish(generation, self.inner.default_view(), QueryPhase::Idle);
    }

    /// Re-renders the default view after a launch or search event, but only
    /// while it is the view being presented; an active query is never
    /// stomped by bookkeeping.
    pub fn refresh_idle_view(&self) {
        let Ok(phase) = self.inner.gate.lock() else {
            return;
        };
        if *phase == QueryPhase::Idle {
            self.inner.view_tx.send_replace(self.inner.default_view());
        }
    }
}

impl ControllerInner {
    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn set_phase(&self, phase: QueryPhase) {
        if let Ok(mut gate) = self.gate.lock() {
            *gate = phase;
        }
    }

    /// Stale-check and send happen under one lock so a superseded pass can
    /// never overwrite a newer view. `send_replace` keeps the committed
    /// view in the channel even while no consumer is subscribed.
    fn publish(&self, generation: u64, view: QueryView, phase: QueryPhase) {
        let Ok(mut gate) = self.gate.lock() else {
            return;
        };
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(event = "search_superseded", query = view.query.as_str());
            return;
        }
        self.view_tx.send_replace(view);
        *gate = phase;
    }

    /// Ranking runs off the interactive thread against an immutable catalog
    /// snapshot. An empty outcome becomes the synthetic web-search entry.
    async fn ranked_hits(&self, raw_query: &str) -> Vec<SearchHit> {
        let catalog = self.index.catalog();
        let usage = Arc::clone(self.index.usage());
        let mode = self.index.settings().mode;
        let query = raw_query.to_string();

        let ranked = run_blocking("rank_query", move || {
            Ok(rank::rank(catalog.entries(), &query, |path| usage.get(path)))
        })
        .await;

        let mut hits = match ranked {
            Ok(hits) => hits,
            Err(error) => {
                tracing::warn!(event = "rank_pass_failed", error = %error);
                Vec::new()
            }
        };
        if mode == IndexMode::Conservative {
            hits.retain(|hit| !has_noisy_extension(&hit.path));
            hits.truncate(CONSERVATIVE_DISPLAY_LIMIT);
        }
        if hits.is_empty() {
            hits.push(SearchHit::web_search(raw_query.trim()));
        }
        hits
    }

    /// Recents first, then the fixed command entries; what the user sees
    /// when the query box is empty.
    fn default_view(&self) -> QueryView {
        let mut hits = Vec::new();
        for hit in self.recents.opened_items() {
            hits.push(hit.with_group("Recently Opened"));
        }
        for hit in self.recents.searched_items() {
            hits.push(hit.with_group("Recent Searches"));
        }
        hits.push(SearchHit::command("Settings", SETTINGS_COMMAND_PATH));
        hits.push(SearchHit::command("Exit", EXIT_COMMAND_PATH));
        QueryView {
            query: String::new(),
            hits,
        }
    }
}

fn has_noisy_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| NOISY_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
#[path = "../tests/controller/controller_tests.rs"]
mod tests;
