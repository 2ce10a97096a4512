//! Prompt buffers owned by the host UI.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TagPickError, TagPickResult};

/// Which prompt buffer an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Positive,
    Negative,
}

impl Target {
    pub fn all() -> [Target; 2] {
        [Target::Positive, Target::Negative]
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Positive => write!(f, "positive"),
            Target::Negative => write!(f, "negative"),
        }
    }
}

/// Access to the two prompt buffers.
///
/// The editor only ever reads and rewrites a buffer as a whole string and
/// calls `notify_changed` after every mutation so dependent views refresh.
pub trait PromptHost {
    fn read(&self, target: Target) -> TagPickResult<String>;

    fn write(&mut self, target: Target, text: &str) -> TagPickResult<()>;

    fn notify_changed(&mut self, target: Target);
}

/// In-process buffers, used by the terminal shell and by tests.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    positive: Option<String>,
    negative: Option<String>,
    changes: Vec<Target>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            positive: Some(String::new()),
            negative: Some(String::new()),
            changes: Vec::new(),
        }
    }

    pub fn with_text(positive: &str, negative: &str) -> Self {
        Self {
            positive: Some(positive.to_string()),
            negative: Some(negative.to_string()),
            changes: Vec::new(),
        }
    }

    /// Drop the buffer for `target`, so every access to it fails.
    pub fn unbind(mut self, target: Target) -> Self {
        *self.slot_mut(target) = None;
        self
    }

    /// Buffer text, or an empty string for an unbound target.
    pub fn text(&self, target: Target) -> &str {
        self.slot(target).as_deref().unwrap_or("")
    }

    /// Change notifications in the order they were raised.
    pub fn changes(&self) -> &[Target] {
        &self.changes
    }

    pub fn take_changes(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.changes)
    }

    fn slot(&self, target: Target) -> &Option<String> {
        match target {
            Target::Positive => &self.positive,
            Target::Negative => &self.negative,
        }
    }

    fn slot_mut(&mut self, target: Target) -> &mut Option<String> {
        match target {
            Target::Positive => &mut self.positive,
            Target::Negative => &mut self.negative,
        }
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptHost for MemoryHost {
    fn read(&self, target: Target) -> TagPickResult<String> {
        self.slot(target)
            .clone()
            .ok_or(TagPickError::HostBinding(target))
    }

    fn write(&mut self, target: Target, text: &str) -> TagPickResult<()> {
        match self.slot_mut(target) {
            Some(buffer) => {
                buffer.clear();
                buffer.push_str(text);
                Ok(())
            }
            None => Err(TagPickError::HostBinding(target)),
        }
    }

    fn notify_changed(&mut self, target: Target) {
        self.changes.push(target);
    }
}
