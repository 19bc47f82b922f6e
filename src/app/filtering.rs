//! This module is responsible for mutating the application state by applying filters.
//!
//! It recomputes the visible tree from the loaded tree, the search query and the
//! extension filter. While a filter narrows the tree, the directories leading to its
//! matches are expanded automatically.

use crate::app::state::AppState;
use crate::core::filter::{filter_tree, is_narrowing};
use crate::core::{Tree, TreeIndex};

/// Applies all current filters to the loaded tree to generate the visible view.
pub fn apply_filters(state: &mut AppState) {
    let Some(tree) = &state.tree else {
        state.view = Tree::new("", Vec::new());
        state.view_index = TreeIndex::default();
        return;
    };

    let result = filter_tree(
        tree,
        &state.search_query,
        &state.extension_filter,
        &state.patterns,
    );
    if is_narrowing(&state.search_query, &state.extension_filter) {
        state.expanded.extend(result.must_expand);
    }
    state.view_index = TreeIndex::build(&result.visible);
    state.view = result.visible;
}
