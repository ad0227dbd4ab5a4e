use serde::{Deserialize, Serialize};
use std::path::Path;

#[cfg(target_os = "windows")]
pub const APPLICATION_EXTENSIONS: [&str; 2] = ["exe", "lnk"];
#[cfg(target_os = "macos")]
pub const APPLICATION_EXTENSIONS: [&str; 1] = ["app"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const APPLICATION_EXTENSIONS: [&str; 2] = ["desktop", "appimage"];

/// Classification of a catalog entry, derived from path shape alone so a
/// rebuild over an unchanged tree reproduces it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    File,
    Folder,
    Application,
}

impl EntryKind {
    /// Extension beats directory status: a bundle directory with an
    /// application extension still counts as an application.
    pub fn for_path(path: &Path, is_dir: bool) -> Self {
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            if APPLICATION_EXTENSIONS.contains(&ext.as_str()) {
                return Self::Application;
            }
        }
        if is_dir { Self::Folder } else { Self::File }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    /// Recomputed from the usage-counter store after every load; never
    /// persisted with the catalog itself.
    #[serde(skip)]
    pub usage_count: u32,
}

impl CatalogEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            kind,
            usage_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HitKind {
    File,
    Folder,
    Application,
    WebSearch,
    Url,
    Clipboard,
    Command,
    Answer,
}

impl HitKind {
    pub fn group_label(self) -> &'static str {
        match self {
            Self::File => "Files",
            Self::Folder => "Folders",
            Self::Application => "Apps",
            Self::WebSearch => "Web Search",
            Self::Url => "Go to Address",
            Self::Clipboard => "Clipboard",
            Self::Command => "Commands",
            Self::Answer => "Answers",
        }
    }
}

impl From<EntryKind> for HitKind {
    fn from(value: EntryKind) -> Self {
        match value {
            EntryKind::File => Self::File,
            EntryKind::Folder => Self::Folder,
            EntryKind::Application => Self::Application,
        }
    }
}

/// One row of a presented result list. `group` explains why the item is
/// shown and is what the presentation layer groups rows under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub name: String,
    pub path: String,
    pub kind: HitKind,
    pub group: String,
    pub score: i64,
    pub usage_count: u32,
}

impl SearchHit {
    pub fn from_entry(entry: &CatalogEntry, score: i64) -> Self {
        let kind = HitKind::from(entry.kind);
        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            kind,
            group: kind.group_label().to_string(),
            score,
            usage_count: entry.usage_count,
        }
    }

    pub fn web_search(raw_query: &str) -> Self {
        Self {
            name: format!("Search for \"{raw_query}\""),
            path: raw_query.to_string(),
            kind: HitKind::WebSearch,
            group: HitKind::WebSearch.group_label().to_string(),
            score: 0,
            usage_count: 0,
        }
    }

    pub fn url(raw_query: &str) -> Self {
        Self {
            name: format!("Open {raw_query}"),
            path: raw_query.to_string(),
            kind: HitKind::Url,
            group: HitKind::Url.group_label().to_string(),
            score: 0,
            usage_count: 0,
        }
    }

    pub fn clipboard(text: &str) -> Self {
        Self {
            name: text.to_string(),
            path: text.to_string(),
            kind: HitKind::Clipboard,
            group: HitKind::Clipboard.group_label().to_string(),
            score: 0,
            usage_count: 0,
        }
    }

    pub fn command(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind: HitKind::Command,
            group: HitKind::Command.group_label().to_string(),
            score: 0,
            usage_count: 0,
        }
    }

    pub fn answer(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            kind: HitKind::Answer,
            group: group.into(),
            score: 0,
            usage_count: 0,
        }
    }

    pub fn with_group(mut self, label: &str) -> Self {
        self.group = label.to_string();
        self
    }
}

/// Snapshot of what the controller last committed for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryView {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexProgress {
    pub entries_indexed: u64,
}

#[cfg(test)]
#[path = "../tests/models/model_tests.rs"]
mod tests;
