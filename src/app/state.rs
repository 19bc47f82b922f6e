//! Defines the central, mutable state of the application.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::{AppConfig, RecentPaths};
use crate::core::{
    analyze_file_types, ExpandedDirs, FileTypeStats, PatternList, Selection, Tree, TreeIndex,
};

/// A transient error shown at the top of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    /// Distinguishes a banner from the one it replaced, so a stale timer cannot clear it.
    pub id: u64,
    pub message: String,
}

/// The last bundle built for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub content: String,
    pub token_count: Option<usize>,
}

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` and shared between the event loop,
/// the IPC handlers and background tasks. Nothing in it is mutated concurrently: every
/// change happens under the lock and is followed by a single `StateUpdate`.
pub struct AppState {
    pub config: AppConfig,
    /// Overrides where config and recent paths are persisted.
    pub config_dir: Option<PathBuf>,
    /// The directory path as the user entered it, after normalization.
    pub current_path: String,
    /// The loaded tree, already pruned by `patterns`.
    pub tree: Option<Tree>,
    /// Index over `tree`, used for file counts and tree-order bundling.
    pub full_index: TreeIndex,
    pub patterns: PatternList,
    /// The filtered view shown in the UI.
    pub view: Tree,
    /// Index over `view`; selection toggles resolve against it.
    pub view_index: TreeIndex,
    pub selection: Selection,
    pub expanded: ExpandedDirs,
    pub search_query: String,
    pub extension_filter: BTreeSet<String>,
    pub file_type_stats: FileTypeStats,
    pub is_loading: bool,
    pub is_bundling: bool,
    pub error: Option<ErrorBanner>,
    next_error_id: u64,
    pub preview: Option<Preview>,
    pub recent_paths: RecentPaths,
}

impl AppState {
    pub fn new(config: AppConfig, config_dir: Option<PathBuf>) -> Self {
        let recent_paths = RecentPaths::load(config_dir.as_deref());
        Self {
            config,
            config_dir,
            current_path: String::new(),
            tree: None,
            full_index: TreeIndex::default(),
            patterns: PatternList::defaults(),
            view: Tree::new("", Vec::new()),
            view_index: TreeIndex::default(),
            selection: Selection::new(),
            expanded: ExpandedDirs::new(),
            search_query: String::new(),
            extension_filter: BTreeSet::new(),
            file_type_stats: FileTypeStats::default(),
            is_loading: false,
            is_bundling: false,
            error: None,
            next_error_id: 0,
            preview: None,
            recent_paths,
        }
    }

    /// Replaces the loaded tree wholesale. Selection, expansion, filters and the preview
    /// start over; the caller re-applies filters afterwards.
    pub fn install_tree(&mut self, path: String, tree: Tree, patterns: PatternList) {
        let tree = tree.without_excluded(&patterns);
        self.full_index = TreeIndex::build(&tree);
        self.file_type_stats = analyze_file_types(tree.file_paths());
        self.current_path = path;
        self.tree = Some(tree);
        self.patterns = patterns;
        self.selection.clear();
        self.expanded.collapse_all();
        self.search_query.clear();
        self.extension_filter.clear();
        self.preview = None;
    }

    /// Resets all state related to a loaded directory.
    pub fn reset_directory_state(&mut self) {
        self.current_path.clear();
        self.tree = None;
        self.full_index = TreeIndex::default();
        self.patterns = PatternList::defaults();
        self.view = Tree::new("", Vec::new());
        self.view_index = TreeIndex::default();
        self.selection.clear();
        self.expanded.collapse_all();
        self.search_query.clear();
        self.extension_filter.clear();
        self.file_type_stats = FileTypeStats::default();
        self.preview = None;
    }

    /// Shows `message` in the banner, replacing any current one. Returns the banner's id.
    pub fn raise_error(&mut self, message: impl Into<String>) -> u64 {
        self.next_error_id += 1;
        let banner = ErrorBanner {
            id: self.next_error_id,
            message: message.into(),
        };
        tracing::warn!("Showing error: {}", banner.message);
        self.error = Some(banner);
        self.next_error_id
    }

    /// Clears the banner. With an id, only that banner is cleared.
    pub fn dismiss_error(&mut self, id: Option<u64>) -> bool {
        match (&self.error, id) {
            (Some(banner), Some(id)) if banner.id != id => false,
            (None, _) => false,
            _ => {
                self.error = None;
                true
            }
        }
    }

    /// The selection in tree order, ready to hand to a provider.
    pub fn selected_paths_in_order(&self) -> Vec<String> {
        self.selection.ordered_paths(&self.full_index)
    }

    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    pub fn persist_config(&self) {
        if let Err(e) = crate::config::settings::save_config(&self.config, self.config_dir.as_deref())
        {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    pub fn persist_recent_paths(&self) {
        if let Err(e) = self.recent_paths.save(self.config_dir.as_deref()) {
            tracing::warn!("Failed to save recent paths: {}", e);
        }
    }
}
