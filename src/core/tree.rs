//! The in-memory project tree and its path index.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::gitignore::PatternList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

/// One file or directory entry. `path` is relative to the loaded root and uses `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Always empty for files; an empty directory also has no children.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            size,
            children: Vec::new(),
        }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            size: None,
            children,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Returns this node's path followed by every path beneath it, in pre-order.
    pub fn descendant_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths(&self, out: &mut Vec<String>) {
        out.push(self.path.clone());
        for child in &self.children {
            child.collect_paths(out);
        }
    }
}

/// A loaded directory: the label (the path it was loaded from) and its top-level entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub root_label: String,
    pub children: Vec<Node>,
}

impl Tree {
    pub fn new(root_label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            root_label: root_label.into(),
            children,
        }
    }

    /// The display name of the root: the last path segment of the label.
    pub fn root_name(&self) -> &str {
        self.root_label
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.root_label)
    }

    /// Builds the synthetic root directory node whose children are the tree's children.
    pub fn root_node(&self) -> Node {
        Node::directory(self.root_name(), self.root_label.clone(), self.children.clone())
    }

    /// Returns a copy of the tree with every excluded node (and its subtree) removed.
    pub fn without_excluded(&self, patterns: &PatternList) -> Tree {
        Tree {
            root_label: self.root_label.clone(),
            children: prune_excluded(&self.children, patterns),
        }
    }

    /// Every file path in the tree, in pre-order.
    pub fn file_paths(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node.kind {
                    NodeKind::File => out.push(&node.path),
                    NodeKind::Directory => walk(&node.children, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut out);
        out
    }
}

/// Recursively drops the nodes matched by `patterns`.
pub fn prune_excluded(nodes: &[Node], patterns: &PatternList) -> Vec<Node> {
    nodes
        .iter()
        .filter(|node| !patterns.is_excluded(&node.path))
        .map(|node| Node {
            children: prune_excluded(&node.children, patterns),
            ..node.clone()
        })
        .collect()
}

#[derive(Debug, Clone)]
struct IndexEntry {
    kind: NodeKind,
    children: Vec<String>,
}

/// A path -> node lookup table, rebuilt whenever the tree (or its filtered view) changes.
///
/// The synthetic root is indexed under the tree's `root_label`.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    root: String,
    entries: HashMap<String, IndexEntry>,
    order: Vec<String>,
}

impl TreeIndex {
    pub fn build(tree: &Tree) -> Self {
        let mut index = TreeIndex {
            root: tree.root_label.clone(),
            entries: HashMap::new(),
            order: Vec::new(),
        };
        index.order.push(tree.root_label.clone());
        index.entries.insert(
            tree.root_label.clone(),
            IndexEntry {
                kind: NodeKind::Directory,
                children: tree.children.iter().map(|c| c.path.clone()).collect(),
            },
        );
        for child in &tree.children {
            index.insert(child);
        }
        index
    }

    fn insert(&mut self, node: &Node) {
        self.order.push(node.path.clone());
        self.entries.insert(
            node.path.clone(),
            IndexEntry {
                kind: node.kind,
                children: node.children.iter().map(|c| c.path.clone()).collect(),
            },
        );
        for child in &node.children {
            self.insert(child);
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn kind(&self, path: &str) -> Option<NodeKind> {
        self.entries.get(path).map(|e| e.kind)
    }

    pub fn children(&self, path: &str) -> &[String] {
        self.entries
            .get(path)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// `path` itself plus every path beneath it, in pre-order. Empty if unknown.
    pub fn descendants(&self, path: &str) -> Vec<String> {
        let mut out = Vec::new();
        if self.contains(path) {
            self.collect(path, &mut out);
        }
        out
    }

    fn collect(&self, path: &str, out: &mut Vec<String>) {
        out.push(path.to_string());
        for child in self.children(path) {
            self.collect(child, out);
        }
    }

    /// The strict ancestors of `path`, nearest first, ending with the synthetic root.
    pub fn ancestors(&self, path: &str) -> Vec<String> {
        if path == self.root {
            return Vec::new();
        }
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let mut ancestors: Vec<String> = (1..parts.len())
            .rev()
            .map(|len| parts[..len].join("/"))
            .collect();
        ancestors.push(self.root.clone());
        ancestors
    }

    /// Every indexed path (root first), in pre-order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Every directory path (root first), in pre-order.
    pub fn directory_paths(&self) -> impl Iterator<Item = &str> {
        self.paths()
            .filter(|p| self.kind(p) == Some(NodeKind::Directory))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
