//! Tri-state selection over a tree, and the independent set of expanded directories.
//!
//! A directory is a member of the selection if and only if its entire subtree is. Every
//! toggle re-checks the ancestors of the toggled path so that this never goes stale;
//! the `Indeterminate` state is derived on demand and never stored.

use serde::Serialize;
use std::collections::HashSet;

use super::tree::{NodeKind, TreeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    Unselected,
    Selected,
    Indeterminate,
}

/// The set of paths the user has marked for the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    paths: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles `path` as seen through `index` (normally the filtered view).
    ///
    /// Selecting adds the whole subtree and promotes ancestors, nearest first, for as long as
    /// each one is fully selected. Deselecting removes the whole subtree and every ancestor.
    /// Unknown paths are ignored. Returns whether the set changed.
    pub fn toggle(&mut self, path: &str, index: &TreeIndex) -> bool {
        if !index.contains(path) {
            tracing::debug!("Toggle ignored for unknown path '{}'", path);
            return false;
        }

        let subtree = index.descendants(path);
        let ancestors = index.ancestors(path);

        if self.paths.contains(path) {
            for p in &subtree {
                self.paths.remove(p);
            }
            for ancestor in &ancestors {
                self.paths.remove(ancestor);
            }
        } else {
            self.paths.extend(subtree);
            for ancestor in &ancestors {
                if !index.contains(ancestor) || !self.all_children_selected(ancestor, index) {
                    break;
                }
                self.paths.insert(ancestor.clone());
            }
        }
        true
    }

    /// Every direct child is selected, and every directory child is itself fully selected.
    fn all_children_selected(&self, dir: &str, index: &TreeIndex) -> bool {
        index.children(dir).iter().all(|child| match index.kind(child) {
            Some(NodeKind::Directory) => {
                self.paths.contains(child) && self.all_children_selected(child, index)
            }
            _ => self.paths.contains(child),
        })
    }

    /// The checkbox state of `path`, computed from its strict descendants.
    pub fn state_of(&self, path: &str, index: &TreeIndex) -> SelectionState {
        let own = if self.paths.contains(path) {
            SelectionState::Selected
        } else {
            SelectionState::Unselected
        };
        if index.kind(path) != Some(NodeKind::Directory) || index.children(path).is_empty() {
            return own;
        }

        let descendants = index.descendants(path);
        let below = &descendants[1..];
        let selected = below.iter().filter(|p| self.paths.contains(*p)).count();
        if selected == 0 {
            SelectionState::Unselected
        } else if selected == below.len() {
            SelectionState::Selected
        } else {
            SelectionState::Indeterminate
        }
    }

    /// Clears the selection if anything is selected, otherwise selects every path in `index`
    /// (root included).
    pub fn toggle_all(&mut self, index: &TreeIndex) {
        if self.paths.is_empty() {
            self.paths.extend(index.paths().map(str::to_string));
        } else {
            self.paths.clear();
        }
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Members that resolve to a file in `full_index`, the unfiltered tree.
    pub fn file_count(&self, full_index: &TreeIndex) -> usize {
        self.paths
            .iter()
            .filter(|p| full_index.kind(p) == Some(NodeKind::File))
            .count()
    }

    /// The selected paths in tree order according to `full_index`, followed by any members
    /// the index does not know (sorted, for a stable result).
    pub fn ordered_paths(&self, full_index: &TreeIndex) -> Vec<String> {
        let mut ordered: Vec<String> = full_index
            .paths()
            .filter(|p| self.paths.contains(*p))
            .map(str::to_string)
            .collect();
        let mut unknown: Vec<String> = self
            .paths
            .iter()
            .filter(|p| !full_index.contains(p))
            .cloned()
            .collect();
        unknown.sort();
        ordered.extend(unknown);
        ordered
    }
}

/// Directory paths currently expanded in the tree view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedDirs {
    paths: HashSet<String>,
}

impl ExpandedDirs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands the root and every directory in `index`.
    pub fn expand_all(&mut self, index: &TreeIndex) {
        self.paths
            .extend(index.directory_paths().map(str::to_string));
    }

    pub fn collapse_all(&mut self) {
        self.paths.clear();
    }

    pub fn toggle(&mut self, path: &str) {
        if !self.paths.remove(path) {
            self.paths.insert(path.to_string());
        }
    }

    pub fn insert(&mut self, path: impl Into<String>) {
        self.paths.insert(path.into());
    }

    pub fn extend<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
