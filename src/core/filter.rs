//! Narrows the tree by a name query and an extension allow-set.

use std::collections::BTreeSet;

use super::file_types::include_by_extension;
use super::gitignore::PatternList;
use super::tree::{prune_excluded, Node, NodeKind, Tree};

/// The filtered view, plus the directories that must be expanded to reveal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    pub visible: Tree,
    pub must_expand: BTreeSet<String>,
}

/// Returns `true` if either a query or an extension filter narrows the tree.
pub fn is_narrowing(query: &str, extensions: &BTreeSet<String>) -> bool {
    !query.trim().is_empty() || !extensions.is_empty()
}

/// Filters `tree` by a case-insensitive substring `query` on node names and by the
/// extension allow-set. Excluded paths are always dropped.
///
/// Directories survive only through included descendants; a matching name alone never
/// surfaces an empty directory.
pub fn filter_tree(
    tree: &Tree,
    query: &str,
    extensions: &BTreeSet<String>,
    patterns: &PatternList,
) -> FilterResult {
    let query = query.trim().to_lowercase();
    let mut must_expand = BTreeSet::new();
    let children = filter_nodes(&tree.children, &query, extensions, patterns, &mut must_expand);
    tracing::debug!(
        "Filtered tree with query '{}' and {} extension(s): {} director(ies) to expand",
        query,
        extensions.len(),
        must_expand.len()
    );
    FilterResult {
        visible: Tree::new(tree.root_label.clone(), children),
        must_expand,
    }
}

fn filter_nodes(
    nodes: &[Node],
    query: &str,
    extensions: &BTreeSet<String>,
    patterns: &PatternList,
    must_expand: &mut BTreeSet<String>,
) -> Vec<Node> {
    let mut visible = Vec::new();

    for node in nodes {
        if patterns.is_excluded(&node.path) {
            continue;
        }
        let name_matches = query.is_empty() || node.name.to_lowercase().contains(query);

        match node.kind {
            NodeKind::File => {
                if name_matches && include_by_extension(&node.name, extensions) {
                    visible.push(node.clone());
                }
            }
            NodeKind::Directory => {
                let filtered =
                    filter_nodes(&node.children, query, extensions, patterns, must_expand);
                if filtered.is_empty() {
                    continue;
                }
                let children = if query.is_empty() && extensions.is_empty() {
                    prune_excluded(&node.children, patterns)
                } else {
                    filtered
                };
                must_expand.insert(node.path.clone());
                visible.push(Node {
                    children,
                    ..node.clone()
                });
            }
        }
    }

    visible
}
