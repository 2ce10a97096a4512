//! Error types shared by the catalog loader, the prompt editor and the shell.

use crate::host::Target;

/// Result alias used across the library.
pub type TagPickResult<T> = Result<T, TagPickError>;

#[derive(Debug, thiserror::Error)]
pub enum TagPickError {
    /// A manifest or tag definition file could not be fetched or parsed
    #[error("failed to load '{path}': {reason}")]
    CatalogLoad { path: String, reason: String },

    /// The host has no buffer for the requested target
    #[error("no prompt buffer bound for {0}")]
    HostBinding(Target),

    /// Configuration could not be read or written
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagPickError {
    pub fn catalog_load(path: impl Into<String>, reason: impl ToString) -> Self {
        TagPickError::CatalogLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the failing entry for load errors.
    pub fn failing_path(&self) -> Option<&str> {
        match self {
            TagPickError::CatalogLoad { path, .. } => Some(path),
            _ => None,
        }
    }
}
