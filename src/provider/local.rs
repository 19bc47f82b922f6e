//! Reads directories and files from the local filesystem.

use async_trait::async_trait;
use camino::Utf8Path;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::ContentProvider;
use crate::core::gitignore::GITIGNORE_FILE;
use crate::core::{build_bundle, BundleOptions, CoreError, Entry, EntryReader, Node, PatternList};

/// The in-process provider used by the desktop build.
#[derive(Debug, Clone, Default)]
pub struct LocalProvider;

impl LocalProvider {
    pub fn new() -> Self {
        Self
    }

    /// Walks `root` and returns its entries as a nested tree, sorted by file name.
    ///
    /// Hidden entries (names starting with `.`) and excluded subtrees are never entered.
    /// Entries that cannot be read while walking are logged and skipped.
    pub fn scan(root: &Path, patterns: &PatternList) -> Result<Vec<Node>, CoreError> {
        let metadata = std::fs::metadata(root).map_err(|e| CoreError::Io(e, root.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }

        let mut top_level = Vec::new();
        // Directories still receiving children; the entry at index `i` has depth `i + 1`.
        let mut open: Vec<Node> = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // The root itself reaches the predicate too; a hidden root is still walked.
                entry.depth() == 0 || (!is_hidden(entry) && !is_excluded(root, entry, patterns))
            });

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let Some(relative) = relative_path(root, entry.path()) else {
                tracing::warn!("Skipping non UTF-8 path: {}", entry.path().display());
                continue;
            };

            while open.len() >= entry.depth() {
                if let Some(done) = open.pop() {
                    attach(&mut open, &mut top_level, done);
                }
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().is_dir() {
                open.push(Node::directory(name, relative, Vec::new()));
            } else {
                let size = entry.metadata().ok().map(|m| m.len());
                attach(&mut open, &mut top_level, Node::file(name, relative, size));
            }
        }
        while let Some(done) = open.pop() {
            attach(&mut open, &mut top_level, done);
        }

        tracing::info!(
            "Scanned {}: {} top-level entries",
            root.display(),
            top_level.len()
        );
        Ok(top_level)
    }
}

fn attach(open: &mut [Node], top_level: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top_level.push(node),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_excluded(root: &Path, entry: &DirEntry, patterns: &PatternList) -> bool {
    relative_path(root, entry.path()).is_some_and(|relative| patterns.is_excluded(&relative))
}

/// The `/`-separated path of `path` relative to `root`, if it is valid UTF-8.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let relative = Utf8Path::from_path(relative)?;
    let parts: Vec<&str> = relative.components().map(|c| c.as_str()).collect();
    Some(parts.join("/"))
}

/// Reads selected entries below a root directory.
#[derive(Debug, Clone)]
pub struct FsEntryReader {
    root: PathBuf,
}

impl FsEntryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl EntryReader for FsEntryReader {
    fn read_entry(&self, relative_path: &str) -> Entry {
        let relative = Path::new(relative_path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            tracing::warn!("Refusing to read path outside the root: {}", relative_path);
            return Entry::Unreadable;
        }

        let full_path = self.root.join(relative);
        match std::fs::metadata(&full_path) {
            Ok(metadata) if metadata.is_dir() => Entry::Directory,
            Ok(_) => match std::fs::read(&full_path) {
                Ok(bytes) => Entry::File(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    tracing::debug!("Failed to read {}: {}", full_path.display(), e);
                    Entry::Unreadable
                }
            },
            Err(e) => {
                tracing::debug!("Failed to stat {}: {}", full_path.display(), e);
                Entry::Unreadable
            }
        }
    }
}

#[async_trait]
impl ContentProvider for LocalProvider {
    async fn list_directory(
        &self,
        path: &str,
        patterns: &PatternList,
    ) -> Result<Vec<Node>, CoreError> {
        let root = PathBuf::from(path);
        let patterns = patterns.clone();
        tokio::task::spawn_blocking(move || Self::scan(&root, &patterns)).await?
    }

    async fn read_gitignore(&self, root: &str) -> Result<Option<String>, CoreError> {
        let path = Path::new(root).join(GITIGNORE_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {} in {}", GITIGNORE_FILE, root);
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn read_files(
        &self,
        root: &str,
        selections: &[String],
        patterns: &PatternList,
        options: BundleOptions,
    ) -> Result<String, CoreError> {
        let root = root.to_string();
        let selections = selections.to_vec();
        let patterns = patterns.clone();
        let bundle = tokio::task::spawn_blocking(move || {
            let reader = FsEntryReader::new(&root);
            build_bundle(&root, &selections, &patterns, &reader, options)
        })
        .await?;
        Ok(bundle)
    }
}
