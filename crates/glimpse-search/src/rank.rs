use glimpse_protocol::models::{CatalogEntry, EntryKind, SearchHit};

pub const MAX_RANKED_RESULTS: usize = 100;

const CONTAINS_TIER: i64 = 100;
const PREFIX_TIER: i64 = 500;
const EXACT_TIER: i64 = 1_000;
const USAGE_WEIGHT: i64 = 5_000;
const APPLICATION_BONUS: i64 = 200;
const FOLDER_BONUS: i64 = 50;

pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Linear, inspectable score. Zero means the query is not a substring of
/// the name and the entry is filtered out entirely; the lexical tiers are
/// mutually exclusive and usage dominates all of them.
pub fn score_entry(entry: &CatalogEntry, normalized_query: &str, usage_count: u32) -> i64 {
    if normalized_query.is_empty() {
        return 0;
    }
    let name = entry.name.to_lowercase();
    if !name.contains(normalized_query) {
        return 0;
    }

    let mut score = if name == normalized_query {
        EXACT_TIER
    } else if name.starts_with(normalized_query) {
        PREFIX_TIER
    } else {
        CONTAINS_TIER
    };
    score += i64::from(usage_count) * USAGE_WEIGHT;
    score += match entry.kind {
        EntryKind::Application => APPLICATION_BONUS,
        EntryKind::Folder => FOLDER_BONUS,
        EntryKind::File => 0,
    };
    // Shallow-path preference; both separators so persisted catalogs rank
    // the same across platforms.
    score -= entry
        .path
        .chars()
        .filter(|ch| *ch == '/' || *ch == '\\')
        .count() as i64;
    score
}

/// Scores every entry against the query, drops non-matches, sorts by score
/// descending (stable, so ties keep catalog order) and truncates to the
/// top 100.
pub fn rank(
    entries: &[CatalogEntry],
    raw_query: &str,
    usage_of: impl Fn(&str) -> u32,
) -> Vec<SearchHit> {
    let normalized = normalize_query(raw_query);
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = entries
        .iter()
        .filter_map(|entry| {
            let usage_count = usage_of(&entry.path);
            let score = score_entry(entry, &normalized, usage_count);
            if score <= 0 {
                return None;
            }
            let mut hit = SearchHit::from_entry(entry, score);
            hit.usage_count = usage_count;
            Some(hit)
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(MAX_RANKED_RESULTS);
    hits
}

#[cfg(test)]
#[path = "../tests/rank/rank_tests.rs"]
mod tests;
