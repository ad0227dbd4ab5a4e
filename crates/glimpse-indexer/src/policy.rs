use std::collections::HashSet;
use std::fs;
use std::path::Path;

use glimpse_protocol::models::APPLICATION_EXTENSIONS;

use crate::settings::{IndexMode, SearchSettingsRecord};

/// Folder name that is never indexed, independent of user configuration.
pub const PROTECTED_FOLDER_NAME: &str = "Personal Vault";

/// Extensions admitted for files in conservative mode, dot-less lowercase.
/// Application extensions are unioned in at construction.
const CONSERVATIVE_ALLOWLIST: &[&str] = &[
    // documents
    "txt", "md", "rtf", "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "svg", "webp",
    // audio and video
    "mp3", "wav", "ogg", "m4a", "mp4", "mkv", "mov", "avi",
    // source
    "cs", "js", "ts", "java", "py", "cpp", "c", "h", "css", "html", "json", "xml",
    // archives
    "zip", "tar", "gz", "7z", "rar",
];

/// Compiled exclusion and admission rules, shared read-only across scan
/// workers.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    excluded_folders: Vec<String>,
    excluded_extensions: HashSet<String>,
    conservative_allowlist: HashSet<String>,
}

impl PolicyEvaluator {
    pub fn from_settings(settings: &SearchSettingsRecord) -> Self {
        let excluded_folders = settings
            .excluded_folders
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        let excluded_extensions = settings
            .excluded_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        let conservative_allowlist = CONSERVATIVE_ALLOWLIST
            .iter()
            .chain(APPLICATION_EXTENSIONS.iter())
            .map(|ext| (*ext).to_string())
            .collect();
        Self {
            excluded_folders,
            excluded_extensions,
            conservative_allowlist,
        }
    }

    /// Ordered exclusion rules over the entry's final path segment: protected
    /// folder, folder name prefixes, then extension denylist. An entry with
    /// no extension never matches an extension rule.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy()) else {
            return false;
        };
        if name.eq_ignore_ascii_case(PROTECTED_FOLDER_NAME) {
            return true;
        }
        let name_lower = name.to_lowercase();
        if self
            .excluded_folders
            .iter()
            .any(|prefix| name_lower.starts_with(prefix.as_str()))
        {
            return true;
        }
        match extension_of(path) {
            Some(ext) => self.excluded_extensions.contains(&ext),
            None => false,
        }
    }

    /// Mode gate applied after the exclusion rules. Permissive admits
    /// without touching the filesystem; conservative probes attributes and
    /// treats a failed probe as inadmissible.
    pub fn is_admissible(&self, path: &Path, is_dir: bool, mode: IndexMode) -> bool {
        match mode {
            IndexMode::Permissive => true,
            IndexMode::Conservative => {
                let Ok(metadata) = fs::symlink_metadata(path) else {
                    return false;
                };
                if is_hidden(path, &metadata) {
                    return false;
                }
                if is_dir {
                    return true;
                }
                match extension_of(path) {
                    Some(ext) => self.conservative_allowlist.contains(&ext),
                    None => false,
                }
            }
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

fn is_hidden(path: &Path, metadata: &fs::Metadata) -> bool {
    if path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
    {
        return true;
    }
    has_hidden_attributes(metadata)
}

#[cfg(windows)]
fn has_hidden_attributes(metadata: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;
    metadata.file_attributes() & (FILE_ATTRIBUTE_HIDDEN | FILE_ATTRIBUTE_SYSTEM) != 0
}

#[cfg(not(windows))]
fn has_hidden_attributes(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(test)]
#[path = "../tests/policy/policy_tests.rs"]
mod tests;
