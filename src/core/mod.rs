//! The selection and bundling engine: pure, synchronous and free of I/O.

pub mod bundle;
pub mod error;
pub mod file_types;
pub mod filter;
pub mod gitignore;
pub mod selection;
pub mod tree;
pub mod tree_map;

pub use bundle::{build_bundle, BundleOptions, Entry, EntryReader};
pub use error::CoreError;
pub use file_types::{analyze_file_types, extension_of, FileTypeStats, Preset};
pub use filter::{filter_tree, FilterResult};
pub use gitignore::PatternList;
pub use selection::{ExpandedDirs, Selection, SelectionState};
pub use tree::{Node, NodeKind, Tree, TreeIndex};
pub use tree_map::FileMap;
