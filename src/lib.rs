//! Hierarchical prompt tag picker.
//!
//! Loads tag trees from YAML files listed in a manifest and toggles their
//! values in a positive and a negative prompt, with undo/redo and a
//! snapshot slot.

pub mod app;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod loader;
pub mod logger;
pub mod output;
pub mod prompt;
pub mod source;
pub mod tree;

pub use app::App;
pub use catalog::{TagCatalog, TagNode};
pub use config::Config;
pub use engine::{HistoryEntry, PromptEditor, Snapshot};
pub use error::{TagPickError, TagPickResult};
pub use host::{MemoryHost, PromptHost, Target};
pub use loader::{CatalogLoader, LoadReport, LoaderOptions};
pub use output::OutputHandler;
pub use source::{FileSource, HttpSource, TagSource};
pub use tree::{ButtonKind, TagButton};
