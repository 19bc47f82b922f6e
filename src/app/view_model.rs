//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module acts as a presentation layer: it decorates the filtered tree with the
//! derived tri-state checkbox values and expansion flags, and computes the counters the
//! status bar and filter popup display.

use serde::Serialize;

use crate::config::{AppConfig, RecentPath};
use crate::core::file_types::{extensions_for, preset_of, COMMON_EXTENSIONS, PRESETS};
use crate::core::tree_map::compare_names;
use crate::core::{Node, Preset, SelectionState};

use super::state::AppState;

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub config: AppConfig,
    pub current_path: String,
    /// The synthetic root of the filtered view, absent until a directory is loaded.
    pub root: Option<UiNode>,
    pub is_loading: bool,
    pub is_bundling: bool,
    pub search_query: String,
    pub extension_filter: Vec<String>,
    pub available_extensions: Vec<ExtensionCount>,
    pub presets: Vec<PresetInfo>,
    pub common_extensions: Vec<String>,
    pub total_files: usize,
    pub visible_files: usize,
    pub selected_count: usize,
    pub selected_file_count: usize,
    pub selected_folder_count: usize,
    pub error: Option<String>,
    pub has_preview: bool,
    pub token_count: Option<usize>,
    pub recent_paths: Vec<RecentPath>,
}

/// A single node of the filtered tree, decorated for display.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UiNode {
    pub name: String,
    pub path: String,
    pub is_directory: bool,
    pub size: Option<u64>,
    pub selection_state: SelectionState,
    pub is_expanded: bool,
    pub is_match: bool,
    pub children: Vec<UiNode>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: usize,
    pub preset: Option<Preset>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PresetInfo {
    pub preset: Preset,
    pub label: &'static str,
    pub extensions: Vec<&'static str>,
    /// Files in the loaded tree belonging to this preset.
    pub count: usize,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let query = state.search_query.trim().to_lowercase();
    let root = state.tree.as_ref().map(|_| {
        let root_node = state.view.root_node();
        build_ui_node(state, &root_node, &query)
    });

    let selected_count = state.selection.len();
    let selected_file_count = state.selection.file_count(&state.full_index);

    let mut available_extensions: Vec<ExtensionCount> = state
        .file_type_stats
        .extensions
        .iter()
        .map(|(extension, count)| ExtensionCount {
            extension: extension.clone(),
            count: *count,
            preset: preset_of(extension),
        })
        .collect();
    available_extensions.sort_by(|a, b| b.count.cmp(&a.count).then(a.extension.cmp(&b.extension)));

    let presets = PRESETS
        .iter()
        .map(|(preset, _)| PresetInfo {
            preset: *preset,
            label: preset.label(),
            extensions: extensions_for(*preset).to_vec(),
            count: state
                .file_type_stats
                .presets
                .get(preset)
                .copied()
                .unwrap_or_default(),
        })
        .collect();

    UiState {
        config: state.config.clone(),
        current_path: state.current_path.clone(),
        root,
        is_loading: state.is_loading,
        is_bundling: state.is_bundling,
        search_query: state.search_query.clone(),
        extension_filter: state.extension_filter.iter().cloned().collect(),
        available_extensions,
        presets,
        common_extensions: COMMON_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        total_files: state.tree.as_ref().map_or(0, |t| t.file_paths().len()),
        visible_files: state.view.file_paths().len(),
        selected_count,
        selected_file_count,
        selected_folder_count: selected_count - selected_file_count,
        error: state.error.as_ref().map(|banner| banner.message.clone()),
        has_preview: state.preview.is_some(),
        token_count: state.preview.as_ref().and_then(|p| p.token_count),
        recent_paths: state.recent_paths.entries().to_vec(),
    }
}

/// Decorates `node` and its children. Siblings are listed directories first, then by name.
fn build_ui_node(state: &AppState, node: &Node, query: &str) -> UiNode {
    let mut children: Vec<&Node> = node.children.iter().collect();
    children.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| compare_names(&a.name, &b.name))
    });

    UiNode {
        name: node.name.clone(),
        path: node.path.clone(),
        is_directory: node.is_directory(),
        size: node.size,
        selection_state: state.selection.state_of(&node.path, &state.view_index),
        is_expanded: state.expanded.is_expanded(&node.path),
        is_match: !query.is_empty() && node.name.to_lowercase().contains(query),
        children: children
            .into_iter()
            .map(|child| build_ui_node(state, child, query))
            .collect(),
    }
}
