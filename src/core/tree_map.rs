//! Generates the ASCII file map that heads a bundle.

use std::cmp::Ordering;

/// A stateless renderer for the box-drawing map of a set of relative paths.
pub struct FileMap;

impl FileMap {
    /// Renders `paths` as a tree under `root_label`, which becomes the unindented first line.
    ///
    /// The map is built from the paths alone. The last segment of each path is a file and
    /// every intermediate segment a directory; a segment seen both ways is a directory.
    /// Lines are joined with `\n` and there is no trailing newline.
    pub fn render<'a, I>(root_label: &str, paths: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut root = MapNode::directory(root_label);
        for path in paths {
            Self::insert(&mut root, path);
        }
        root.sort();

        let mut lines = vec![root_label.to_string()];
        Self::render_children(&root, "", &mut lines);
        lines.join("\n")
    }

    fn insert(root: &mut MapNode, path: &str) {
        let parts: Vec<&str> = path
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .collect();

        let mut current = root;
        for (i, part) in parts.iter().enumerate() {
            let is_leaf = i == parts.len() - 1;
            let position = current.children.iter().position(|c| c.name == *part);
            let child_index = match position {
                Some(index) => {
                    if !is_leaf {
                        current.children[index].is_directory = true;
                    }
                    index
                }
                None => {
                    current.children.push(MapNode {
                        name: part.to_string(),
                        is_directory: !is_leaf,
                        children: Vec::new(),
                    });
                    current.children.len() - 1
                }
            };
            current = &mut current.children[child_index];
        }
    }

    fn render_children(node: &MapNode, prefix: &str, lines: &mut Vec<String>) {
        for (i, child) in node.children.iter().enumerate() {
            let is_last = i == node.children.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };
            lines.push(format!("{prefix}{connector}{}", child.name));

            if !child.children.is_empty() {
                let new_prefix = if is_last {
                    format!("{prefix}    ")
                } else {
                    format!("{prefix}│   ")
                };
                Self::render_children(child, &new_prefix, lines);
            }
        }
    }
}

/// A transient node used for building the map.
#[derive(Debug, Clone)]
struct MapNode {
    name: String,
    is_directory: bool,
    children: Vec<MapNode>,
}

impl MapNode {
    fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: true,
            children: Vec::new(),
        }
    }

    /// Directories before files, then natural name order, recursively.
    fn sort(&mut self) {
        self.children.sort_by(|a, b| match (a.is_directory, b.is_directory) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => compare_names(&a.name, &b.name),
        });
        for child in &mut self.children {
            child.sort();
        }
    }
}

/// Case-insensitive comparison that orders runs of digits by numeric value, so `file2`
/// sorts before `file10`. Falls back to a byte comparison to stay total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_num = take_digits(&mut left);
                let r_num = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_num, &r_num);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
