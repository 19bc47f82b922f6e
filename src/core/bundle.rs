//! Renders the final prompt-ready bundle from a set of selected paths.
//!
//! The output is XML-shaped text, not XML: file contents are inserted verbatim.

use rayon::prelude::*;

use super::gitignore::PatternList;
use super::tree_map::FileMap;

/// What a content reader found at a selected path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(String),
    Directory,
    Unreadable,
}

/// Classifies and reads selected paths relative to the bundle root.
pub trait EntryReader: Sync {
    fn read_entry(&self, relative_path: &str) -> Entry;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleOptions {
    pub include_file_map: bool,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            include_file_map: true,
        }
    }
}

/// Returns the selected paths that belong in a bundle, in input order: `.gitignore`, the
/// root itself, excluded paths and duplicates are dropped.
pub fn bundle_paths<'a>(
    root_label: &str,
    selected: &'a [String],
    patterns: &PatternList,
) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    selected
        .iter()
        .map(String::as_str)
        .filter(|path| *path != root_label && !path.is_empty())
        .filter(|path| !patterns.is_excluded(path))
        .filter(|path| seen.insert(*path))
        .collect()
}

/// Builds the bundle for `selected`, reading entries in parallel while keeping input order.
///
/// A single unreadable entry becomes an inline error element; bundling itself never fails.
/// With nothing to bundle the envelope is empty and carries no file map.
pub fn build_bundle<R: EntryReader>(
    root_label: &str,
    selected: &[String],
    patterns: &PatternList,
    reader: &R,
    options: BundleOptions,
) -> String {
    let paths = bundle_paths(root_label, selected, patterns);
    if paths.is_empty() {
        return "<files>\n</files>".to_string();
    }

    let entries: Vec<(&str, Entry)> = paths
        .par_iter()
        .map(|path| (*path, reader.read_entry(path)))
        .collect();

    let mut output = String::from("<files>\n");
    if options.include_file_map {
        output.push_str("  <file_map>\n");
        output.push_str(&FileMap::render(root_label, paths.iter().copied()));
        output.push_str("\n  </file_map>\n\n");
    }

    let mut unreadable = 0;
    for (path, entry) in entries {
        match entry {
            Entry::File(content) => {
                output.push_str(&format!("  <file path=\"{path}\">\n{content}\n  </file>\n"));
            }
            Entry::Directory => {
                output.push_str(&format!("  <directory path=\"{path}\" />\n"));
            }
            Entry::Unreadable => {
                unreadable += 1;
                output.push_str(&format!(
                    "  <file path=\"{path}\" error=\"Unable to read\" />\n"
                ));
            }
        }
    }
    output.push_str("</files>");

    tracing::info!(
        "Built bundle for {} path(s) ({} unreadable), {} bytes",
        paths.len(),
        unreadable,
        output.len()
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedReader(HashMap<&'static str, Entry>);

    impl EntryReader for FixedReader {
        fn read_entry(&self, relative_path: &str) -> Entry {
            self.0
                .get(relative_path)
                .cloned()
                .unwrap_or(Entry::Unreadable)
        }
    }

    fn reader() -> FixedReader {
        FixedReader(HashMap::from([
            ("src/App.tsx", Entry::File("export default App;".to_string())),
            ("package.json", Entry::File("{ \"name\": \"demo\" }".to_string())),
            ("src", Entry::Directory),
        ]))
    }

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_two_files_in_input_order_with_map() {
        let bundle = build_bundle(
            "project-root",
            &paths(&["src/App.tsx", "package.json"]),
            &PatternList::default(),
            &reader(),
            BundleOptions::default(),
        );
        let expected = "<files>\n  <file_map>\nproject-root\n├── src\n│   └── App.tsx\n└── package.json\n  </file_map>\n\n  <file path=\"src/App.tsx\">\nexport default App;\n  </file>\n  <file path=\"package.json\">\n{ \"name\": \"demo\" }\n  </file>\n</files>";
        assert_eq!(bundle, expected);
    }

    #[test]
    fn test_directory_and_unreadable_entries() {
        let bundle = build_bundle(
            "root",
            &paths(&["src", "missing.rs"]),
            &PatternList::default(),
            &reader(),
            BundleOptions {
                include_file_map: false,
            },
        );
        assert_eq!(
            bundle,
            "<files>\n  <directory path=\"src\" />\n  <file path=\"missing.rs\" error=\"Unable to read\" />\n</files>"
        );
    }

    #[test]
    fn test_content_is_not_escaped() {
        let reader = FixedReader(HashMap::from([(
            "index.html",
            Entry::File("<div>&amp;</div>".to_string()),
        )]));
        let bundle = build_bundle(
            "root",
            &paths(&["index.html"]),
            &PatternList::default(),
            &reader,
            BundleOptions::default(),
        );
        assert!(bundle.contains("<file path=\"index.html\">\n<div>&amp;</div>\n  </file>"));
    }

    #[test]
    fn test_excluded_gitignore_and_root_are_skipped() {
        let selected = paths(&["root", ".gitignore", "dist/app.js", "package.json"]);
        let patterns = PatternList::defaults();
        assert_eq!(
            bundle_paths("root", &selected, &patterns),
            vec!["package.json"]
        );
        let bundle = build_bundle("root", &selected, &patterns, &reader(), BundleOptions::default());
        assert!(!bundle.contains("dist"));
        assert!(!bundle.contains(".gitignore"));
        assert_eq!(bundle.matches("<file ").count(), 1);
    }

    #[test]
    fn test_empty_selection_yields_empty_envelope() {
        let bundle = build_bundle(
            "root",
            &[],
            &PatternList::default(),
            &reader(),
            BundleOptions::default(),
        );
        assert_eq!(bundle, "<files>\n</files>");
    }
}
