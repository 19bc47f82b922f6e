//! Compiles `.gitignore`-style lines into path predicates.
//!
//! Patterns are normalized to globs once per directory load and translated to anchored
//! regular expressions. Negated lines (`!pattern`) are dropped: re-inclusion is not supported.

use regex::Regex;

/// The name of the file patterns are read from. It is never listed or bundled itself.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Used whenever a loaded directory has no readable `.gitignore`.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "node_modules/**",
    "dist/**",
    "build/**",
    ".next/**",
    "coverage/**",
    ".git/**",
];

/// A single normalized glob together with its compiled matcher.
#[derive(Debug, Clone)]
pub struct Pattern {
    glob: String,
    regex: Option<Regex>,
}

impl Pattern {
    /// Compiles a normalized glob. Invalid globs never match anything.
    pub fn new(glob: impl Into<String>) -> Self {
        let glob = glob.into().replace('\\', "/");
        let source = glob_to_regex(&glob);
        let regex = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Ignoring invalid pattern '{}': {}", glob, e);
                None
            }
        };
        Self { glob, regex }
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(&path.replace('\\', "/")),
            None => false,
        }
    }
}

/// The immutable set of exclusion rules for one loaded directory.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    /// Parses raw `.gitignore` content.
    pub fn compile(raw_content: &str) -> Self {
        Self::from_globs(raw_content.lines().filter_map(normalize_line))
    }

    /// The built-in fallback list.
    pub fn defaults() -> Self {
        Self::from_globs(DEFAULT_PATTERNS.iter().copied())
    }

    /// Compiles the content of a `.gitignore` if one was found, otherwise the defaults.
    pub fn from_gitignore(raw_content: Option<&str>) -> Self {
        match raw_content {
            Some(content) => Self::compile(content),
            None => Self::defaults(),
        }
    }

    /// Builds a list from already-normalized globs.
    pub fn from_globs<I, S>(globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: globs.into_iter().map(Pattern::new).collect(),
        }
    }

    /// Returns `true` if the relative `path` must be hidden from listings and bundles.
    pub fn is_excluded(&self, path: &str) -> bool {
        is_gitignore_file(path) || self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn globs(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::glob)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Returns `true` for the `.gitignore` file itself, at any depth.
pub fn is_gitignore_file(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    normalized.rsplit('/').next() == Some(GITIGNORE_FILE)
}

/// Converts one raw `.gitignore` line into a normalized glob.
///
/// Returns `None` for blank lines, comments and negations.
pub fn normalize_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }

    if let Some(rest) = line.strip_prefix('/') {
        // Root-relative.
        let (name, explicit_dir) = match rest.strip_suffix('/') {
            Some(name) => (name, true),
            None => (rest, false),
        };
        if name.is_empty() {
            return None;
        }
        if explicit_dir || looks_like_directory(name) {
            return Some(format!("{name}/**"));
        }
        return Some(name.to_string());
    }

    if let Some(name) = line.strip_suffix('/') {
        if name.is_empty() {
            return None;
        }
        if name.contains('/') {
            return Some(format!("{name}/**"));
        }
        return Some(format!("**/{name}/**"));
    }

    if !line.contains('/') {
        if looks_like_directory(line) {
            return Some(format!("**/{line}/**"));
        }
        return Some(format!("**/{line}"));
    }

    Some(line.to_string())
}

/// The "no dot and no asterisk" heuristic. Extension-less file names are treated as
/// directories too.
fn looks_like_directory(name: &str) -> bool {
    !name.contains('.') && !name.contains('*')
}

/// Translates a glob into an anchored regular expression.
///
/// `**` spans directories: a leading `**/` also matches zero directories and a trailing
/// `/**` also matches the directory itself. `*` stays within one segment, `?` matches any
/// single character, and `[...]` classes pass through unchanged.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'*')
                && chars.get(i + 2) == Some(&'*')
                && i + 3 == chars.len() =>
            {
                out.push_str("(?:/.*)?");
                i += 3;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push('.');
                i += 1;
            }
            '[' | ']' => {
                out.push(chars[i]);
                i += 1;
            }
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    out.push('$');
    out
}
