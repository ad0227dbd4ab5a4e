use std::sync::Arc;

use glimpse_protocol::models::SearchHit;
use regex::Regex;

const URL_PATTERN: &str = r"(?i)^\S+\.(com|net|org|io|gov|edu)$";
const CLIPBOARD_TRIGGERS: [&str; 2] = ["cb", "clip"];
const CLIPBOARD_HISTORY_LIMIT: usize = 20;

/// One slot of the pre-ranking query ladder. Returning `None` means "not
/// my query" and falls through to the next slot; a malformed query is the
/// same as not-mine, never an error.
pub trait FastPath: Send + Sync {
    fn evaluate(&self, raw_query: &str) -> Option<Vec<SearchHit>>;
}

/// Seam to a clipboard-history collaborator; capture itself lives outside
/// this core.
pub trait ClipboardProvider: Send + Sync {
    fn recent_entries(&self, limit: usize) -> Vec<String>;
}

/// Fixed-priority ladder tried before ranked search: URL likeness, then the
/// two injected evaluator slots, then the clipboard sub-command. The first
/// slot to produce hits short-circuits ranking for that query.
pub struct FastPathChain {
    url: UrlFastPath,
    arithmetic: Option<Box<dyn FastPath>>,
    conversion: Option<Box<dyn FastPath>>,
    clipboard: Option<ClipboardFastPath>,
}

impl FastPathChain {
    pub fn new(
        arithmetic: Option<Box<dyn FastPath>>,
        conversion: Option<Box<dyn FastPath>>,
        clipboard: Option<Arc<dyn ClipboardProvider>>,
    ) -> Self {
        Self {
            url: UrlFastPath::new(),
            arithmetic,
            conversion,
            clipboard: clipboard.map(ClipboardFastPath::new),
        }
    }

    pub fn evaluate(&self, raw_query: &str) -> Option<Vec<SearchHit>> {
        if let Some(hits) = self.url.evaluate(raw_query) {
            return Some(hits);
        }
        for slot in [&self.arithmetic, &self.conversion] {
            if let Some(evaluator) = slot
                && let Some(hits) = evaluator.evaluate(raw_query)
                && !hits.is_empty()
            {
                return Some(hits);
            }
        }
        self.clipboard
            .as_ref()
            .and_then(|clipboard| clipboard.evaluate(raw_query))
    }
}

impl Default for FastPathChain {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Heuristic, not a parser: one token, a dot somewhere, a well-known
/// suffix. Typos fall through to ranked search.
struct UrlFastPath {
    pattern: Option<Regex>,
}

impl UrlFastPath {
    fn new() -> Self {
        Self {
            pattern: Regex::new(URL_PATTERN).ok(),
        }
    }
}

impl FastPath for UrlFastPath {
    fn evaluate(&self, raw_query: &str) -> Option<Vec<SearchHit>> {
        let query = raw_query.trim();
        let pattern = self.pattern.as_ref()?;
        if pattern.is_match(query) {
            return Some(vec![SearchHit::url(query)]);
        }
        None
    }
}

struct ClipboardFastPath {
    provider: Arc<dyn ClipboardProvider>,
}

impl ClipboardFastPath {
    fn new(provider: Arc<dyn ClipboardProvider>) -> Self {
        Self { provider }
    }
}

impl FastPath for ClipboardFastPath {
    fn evaluate(&self, raw_query: &str) -> Option<Vec<SearchHit>> {
        let filter = clipboard_filter(raw_query)?;
        let hits: Vec<SearchHit> = self
            .provider
            .recent_entries(CLIPBOARD_HISTORY_LIMIT)
            .into_iter()
            .filter(|entry| filter.is_empty() || entry.to_lowercase().contains(&filter))
            .map(|entry| SearchHit::clipboard(&entry))
            .collect();
        if hits.is_empty() { None } else { Some(hits) }
    }
}

/// `cb` / `clip` prefix detection; the remainder filters the history. No
/// prefix means the query is not a clipboard sub-command.
fn clipboard_filter(raw_query: &str) -> Option<String> {
    let query = raw_query.trim();
    for trigger in CLIPBOARD_TRIGGERS {
        if query.eq_ignore_ascii_case(trigger) {
            return Some(String::new());
        }
        let Some((head, rest)) = query.split_at_checked(trigger.len()) else {
            continue;
        };
        if head.eq_ignore_ascii_case(trigger) && rest.starts_with(' ') {
            return Some(rest.trim().to_lowercase());
        }
    }
    None
}

#[cfg(test)]
#[path = "../tests/fastpath/fastpath_tests.rs"]
mod tests;
