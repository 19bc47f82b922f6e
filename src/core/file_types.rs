//! Maps file names to extensions and semantic presets, and filters by extension.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A semantic grouping of extensions surfaced in the filter UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Frontend,
    Backend,
    Config,
    Docs,
    Scripts,
    Data,
}

impl Preset {
    pub fn label(self) -> &'static str {
        match self {
            Preset::Frontend => "Frontend",
            Preset::Backend => "Backend",
            Preset::Config => "Config",
            Preset::Docs => "Documentation",
            Preset::Scripts => "Scripts",
            Preset::Data => "Data",
        }
    }
}

/// Presets in lookup order. An extension belongs to the first preset listing it, so
/// `json` and `xml` resolve to `Config` rather than `Data`.
pub const PRESETS: &[(Preset, &[&str])] = &[
    (
        Preset::Frontend,
        &[
            "tsx", "jsx", "ts", "js", "vue", "svelte", "html", "css", "scss", "sass", "less",
            "styl",
        ],
    ),
    (
        Preset::Backend,
        &[
            "py", "java", "go", "rs", "rb", "php", "cs", "cpp", "c", "kt", "scala", "clj",
        ],
    ),
    (
        Preset::Config,
        &[
            "json", "yaml", "yml", "toml", "ini", "env", "conf", "config", "xml", "properties",
        ],
    ),
    (Preset::Docs, &["md", "txt", "rst", "adoc", "tex", "rtf"]),
    (
        Preset::Scripts,
        &["sh", "bash", "zsh", "fish", "ps1", "bat", "cmd"],
    ),
    (
        Preset::Data,
        &["csv", "tsv", "json", "xml", "sql", "db", "sqlite"],
    ),
];

/// Extensions offered in the filter popup even before a directory is analyzed.
pub const COMMON_EXTENSIONS: &[&str] = &[
    "tsx", "jsx", "ts", "js", "vue", "svelte", "html", "css", "scss", "sass", "py", "java", "go",
    "rs", "rb", "php", "cs", "cpp", "c", "json", "yaml", "yml", "toml", "env", "xml", "md", "txt",
    "rst", "sh", "bash", "ps1", "bat", "sql", "dockerfile", "gitignore", "lock",
];

/// Returns the lowercase extension of `filename`, or an empty string if there is none.
///
/// Dotfiles with a single dot report the name after the dot (`.gitignore` -> `gitignore`).
pub fn extension_of(filename: &str) -> String {
    let lower = filename.to_lowercase();
    let parts: Vec<&str> = lower.split('.').collect();
    if parts.len() == 1 {
        return String::new();
    }
    if lower.starts_with('.') && parts.len() == 2 {
        return lower[1..].to_string();
    }
    parts[parts.len() - 1].to_string()
}

/// Returns the first preset containing `extension`.
pub fn preset_of(extension: &str) -> Option<Preset> {
    let extension = extension.to_lowercase();
    PRESETS
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension.as_str()))
        .map(|(preset, _)| *preset)
}

/// Returns the extensions belonging to `preset`.
pub fn extensions_for(preset: Preset) -> &'static [&'static str] {
    PRESETS
        .iter()
        .find(|(p, _)| *p == preset)
        .map(|(_, extensions)| *extensions)
        .unwrap_or(&[])
}

/// An empty allow-set includes everything.
pub fn include_by_extension(filename: &str, allow: &BTreeSet<String>) -> bool {
    allow.is_empty() || allow.contains(&extension_of(filename))
}

/// Per-extension and per-preset file counts for a set of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileTypeStats {
    pub extensions: BTreeMap<String, usize>,
    pub presets: BTreeMap<Preset, usize>,
    /// Number of paths that have an extension at all.
    pub total: usize,
}

/// Counts extensions and presets over the file names at the end of `paths`.
pub fn analyze_file_types<'a, I>(paths: I) -> FileTypeStats
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stats = FileTypeStats::default();
    for path in paths {
        let filename = path.rsplit('/').next().unwrap_or_default();
        let extension = extension_of(filename);
        if extension.is_empty() {
            continue;
        }
        stats.total += 1;
        if let Some(preset) = preset_of(&extension) {
            *stats.presets.entry(preset).or_default() += 1;
        }
        *stats.extensions.entry(extension).or_default() += 1;
    }
    stats
}
