//! The most-recently-used directory list, persisted beside the config file.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::settings::resolve_directory;

const RECENT_PATHS_FILE: &str = "recent_paths.json";
pub const MAX_RECENT_PATHS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecentPath {
    pub path: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub last_accessed: i64,
}

/// Most recent first, unique by `path`, at most `MAX_RECENT_PATHS` long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentPaths {
    entries: Vec<RecentPath>,
}

impl RecentPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `path` to the front with a fresh timestamp, adding it if needed.
    pub fn add(&mut self, path: &str) {
        self.add_at(path, chrono::Utc::now().timestamp_millis());
    }

    fn add_at(&mut self, path: &str, last_accessed: i64) {
        self.entries.retain(|entry| entry.path != path);
        self.entries.insert(
            0,
            RecentPath {
                path: path.to_string(),
                name: display_name(path),
                last_accessed,
            },
        );
        self.entries.truncate(MAX_RECENT_PATHS);
    }

    pub fn remove(&mut self, path: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.path != path);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[RecentPath] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads the list. A missing or unreadable file yields an empty list.
    pub fn load(dir_override: Option<&Path>) -> Self {
        let Ok(dir) = resolve_directory(dir_override) else {
            return Self::default();
        };
        let path = dir.join(RECENT_PATHS_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str::<Vec<RecentPath>>(&content) {
            Ok(mut entries) => {
                entries.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
                entries.truncate(MAX_RECENT_PATHS);
                Self { entries }
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Starting with an empty list.", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, dir_override: Option<&Path>) -> Result<()> {
        let dir = resolve_directory(dir_override)?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        fs::write(
            dir.join(RECENT_PATHS_FILE),
            serde_json::to_string_pretty(&self.entries)?,
        )?;
        Ok(())
    }
}

/// The last path segment, or the whole path when there is none.
fn display_name(path: &str) -> String {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
        .to_string()
}
