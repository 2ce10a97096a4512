//! Prompt edit engine
//!
//! Toggles tags in the host's prompt buffers and keeps a linear
//! undo/redo history. Only insertions, snapshot restores and clears are
//! recorded; toggling a present tag off is a plain removal.

use serde::{Deserialize, Serialize};

use crate::error::TagPickResult;
use crate::host::{PromptHost, Target};
use crate::prompt;

/// Prefix marking a tag as negative-only.
pub const DEFAULT_NEGATIVE_MARKER: &str = "neg-";

/// Both prompt buffers at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub positive: String,
    pub negative: String,
}

impl Snapshot {
    pub fn capture(host: &impl PromptHost) -> TagPickResult<Self> {
        Ok(Self {
            positive: host.read(Target::Positive)?,
            negative: host.read(Target::Negative)?,
        })
    }

    pub fn get(&self, target: Target) -> &str {
        match target {
            Target::Positive => &self.positive,
            Target::Negative => &self.negative,
        }
    }

    fn apply(&self, host: &mut impl PromptHost) -> TagPickResult<()> {
        for target in Target::all() {
            host.write(target, self.get(target))?;
        }
        for target in Target::all() {
            host.notify_changed(target);
        }
        Ok(())
    }
}

/// One undoable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    Insert { target: Target, text: String },
    Restore { before: Snapshot, after: Snapshot },
    Clear { before: Snapshot },
}

impl HistoryEntry {
    /// Short label for history listings.
    pub fn describe(&self) -> String {
        match self {
            HistoryEntry::Insert { target, text } => format!("{text} ({target})"),
            HistoryEntry::Restore { .. } => "restore snapshot".to_string(),
            HistoryEntry::Clear { .. } => "clear prompts".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptEditor {
    negative_marker: String,
    history: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    snapshot: Option<Snapshot>,
}

impl PromptEditor {
    pub fn new() -> Self {
        Self::with_marker(DEFAULT_NEGATIVE_MARKER)
    }

    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            negative_marker: marker.into(),
            history: Vec::new(),
            redo_stack: Vec::new(),
            snapshot: None,
        }
    }

    pub fn negative_marker(&self) -> &str {
        &self.negative_marker
    }

    /// Split a raw tag value into its polarity and the text to insert.
    pub fn resolve<'a>(&self, target: Target, raw_value: &'a str) -> (Target, &'a str) {
        match raw_value.strip_prefix(self.negative_marker.as_str()) {
            Some(rest) if !self.negative_marker.is_empty() => (Target::Negative, rest),
            _ => (target, raw_value),
        }
    }

    /// Whether `raw_value` is currently present in its buffer.
    pub fn is_selected(
        &self,
        host: &impl PromptHost,
        target: Target,
        raw_value: &str,
    ) -> TagPickResult<bool> {
        let (target, value) = self.resolve(target, raw_value);
        Ok(prompt::contains(&host.read(target)?, value))
    }

    /// Insert `raw_value` if absent, remove it if present.
    ///
    /// Returns whether the value is present afterwards.
    pub fn toggle(
        &mut self,
        host: &mut impl PromptHost,
        target: Target,
        raw_value: &str,
    ) -> TagPickResult<bool> {
        let (target, value) = self.resolve(target, raw_value);
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }

        let current = host.read(target)?;
        let selected = match prompt::remove(&current, value) {
            Some(updated) => {
                host.write(target, &updated)?;
                tracing::debug!(%target, value, "removed tag");
                false
            }
            None => {
                host.write(target, &prompt::append(&current, value))?;
                self.record(HistoryEntry::Insert {
                    target,
                    text: value.to_string(),
                });
                tracing::debug!(%target, value, "inserted tag");
                true
            }
        };
        host.notify_changed(target);
        Ok(selected)
    }

    /// Revert the most recent entry. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, host: &mut impl PromptHost) -> TagPickResult<bool> {
        let Some(entry) = self.history.last() else {
            return Ok(false);
        };

        match entry {
            HistoryEntry::Insert { target, text } => {
                let current = host.read(*target)?;
                if let Some(updated) = prompt::remove_remaining(&current, text) {
                    host.write(*target, &updated)?;
                }
                host.notify_changed(*target);
            }
            HistoryEntry::Restore { before, .. } | HistoryEntry::Clear { before } => {
                before.apply(host)?;
            }
        }

        if let Some(entry) = self.history.pop() {
            tracing::debug!(entry = %entry.describe(), "undo");
            self.redo_stack.push(entry);
        }
        Ok(true)
    }

    /// Undo until the entry at `index` is the newest one left.
    pub fn undo_to(&mut self, host: &mut impl PromptHost, index: usize) -> TagPickResult<usize> {
        let mut undone = 0;
        while self.history.len().saturating_sub(1) > index {
            if !self.undo(host)? {
                break;
            }
            undone += 1;
        }
        Ok(undone)
    }

    /// Re-apply the most recently undone entry. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self, host: &mut impl PromptHost) -> TagPickResult<bool> {
        let Some(entry) = self.redo_stack.last() else {
            return Ok(false);
        };

        match entry {
            HistoryEntry::Insert { target, text } => {
                let current = host.read(*target)?;
                if let Some(updated) = prompt::append_missing(&current, text) {
                    host.write(*target, &updated)?;
                }
                host.notify_changed(*target);
            }
            HistoryEntry::Restore { after, .. } => after.apply(host)?,
            HistoryEntry::Clear { .. } => Snapshot::default().apply(host)?,
        }

        if let Some(entry) = self.redo_stack.pop() {
            tracing::debug!(entry = %entry.describe(), "redo");
            self.history.push(entry);
        }
        Ok(true)
    }

    /// Copy both buffers into the snapshot slot, replacing any earlier one.
    pub fn save_snapshot(&mut self, host: &impl PromptHost) -> TagPickResult<&Snapshot> {
        let snapshot = Snapshot::capture(host)?;
        Ok(self.snapshot.insert(snapshot))
    }

    /// Overwrite both buffers with the saved snapshot.
    ///
    /// Without a saved snapshot both buffers are emptied.
    pub fn restore_snapshot(&mut self, host: &mut impl PromptHost) -> TagPickResult<()> {
        let before = Snapshot::capture(&*host)?;
        let after = match &self.snapshot {
            Some(snapshot) => snapshot.clone(),
            None => {
                tracing::warn!("no snapshot saved, restoring empty prompts");
                Snapshot::default()
            }
        };
        after.apply(host)?;
        self.record(HistoryEntry::Restore { before, after });
        Ok(())
    }

    /// Empty both buffers.
    pub fn clear(&mut self, host: &mut impl PromptHost) -> TagPickResult<()> {
        let before = Snapshot::capture(&*host)?;
        Snapshot::default().apply(host)?;
        self.record(HistoryEntry::Clear { before });
        Ok(())
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn redo_stack(&self) -> &[HistoryEntry] {
        &self.redo_stack
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.redo_stack.clear();
    }
}

impl Default for PromptEditor {
    fn default() -> Self {
        Self::new()
    }
}
