use anyhow::{anyhow, Result};

use crate::catalog::TagCatalog;
use crate::commands::Command;
use crate::config::Config;
use crate::engine::PromptEditor;
use crate::host::{MemoryHost, PromptHost, Target};
use crate::loader::CatalogLoader;
use crate::output::OutputHandler;
use crate::source;
use crate::tree::{self, TagButton};

/// Result of picking one button.
#[derive(Debug, Clone, PartialEq)]
pub struct Picked {
    pub button: TagButton,
    pub selected: bool,
}

pub struct App {
    pub config: Config,
    loader: CatalogLoader,
    catalog: TagCatalog,
    editor: PromptEditor,
    host: MemoryHost,
    current: Option<String>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let source = source::from_location(&config.source)?;
        let loader = CatalogLoader::new(source, config.loader_options());
        Ok(Self::with_loader(config, loader))
    }

    pub fn with_loader(config: Config, loader: CatalogLoader) -> Self {
        let editor = PromptEditor::with_marker(config.negative_marker.clone());
        Self {
            config,
            loader,
            catalog: TagCatalog::new(),
            editor,
            host: MemoryHost::new(),
            current: None,
        }
    }

    /// Replace the catalog with a fresh load. On failure the old catalog stays.
    ///
    /// Returns the number of skipped tag files.
    pub async fn reload(&mut self) -> Result<usize> {
        let report = self.loader.load(&self.config.manifest).await?;
        self.catalog = report.catalog;
        if let Some(name) = &self.current {
            if self.catalog.get(name).is_none() {
                self.current = None;
            }
        }
        Ok(report.failures.len())
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn editor(&self) -> &PromptEditor {
        &self.editor
    }

    pub fn host(&self) -> &MemoryHost {
        &self.host
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        if self.catalog.get(name).is_none() {
            return Err(anyhow!("no catalog named '{name}'"));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Buttons of the selected catalog.
    pub fn buttons(&self) -> Vec<TagButton> {
        let Some(name) = &self.current else {
            return Vec::new();
        };
        match self.catalog.get(name) {
            Some(node) => tree::buttons(name, node, self.editor.negative_marker()).collect(),
            None => Vec::new(),
        }
    }

    /// Presence flag for each button. A tag counts as selected when it is
    /// present in either prompt; marker-carrying values always resolve to
    /// the negative one.
    pub fn selection(&self, buttons: &[TagButton]) -> Vec<bool> {
        buttons
            .iter()
            .map(|b| {
                Target::all().into_iter().any(|target| {
                    self.editor
                        .is_selected(&self.host, target, &b.value)
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    /// Toggle the 1-based button `index` of the selected catalog.
    pub fn pick(&mut self, index: usize, target: Target) -> Result<Picked> {
        if self.current.is_none() {
            return Err(anyhow!("no catalog selected, use 'show <name>'"));
        }
        let button = index
            .checked_sub(1)
            .and_then(|i| self.buttons().into_iter().nth(i))
            .ok_or_else(|| anyhow!("no tag numbered {index}"))?;
        let selected = self.editor.toggle(&mut self.host, target, &button.value)?;
        Ok(Picked { button, selected })
    }

    pub fn toggle_text(&mut self, target: Target, text: &str) -> Result<bool> {
        Ok(self.editor.toggle(&mut self.host, target, text)?)
    }

    pub fn undo(&mut self) -> Result<bool> {
        Ok(self.editor.undo(&mut self.host)?)
    }

    pub fn redo(&mut self) -> Result<bool> {
        Ok(self.editor.redo(&mut self.host)?)
    }

    pub fn undo_to(&mut self, index: usize) -> Result<usize> {
        Ok(self.editor.undo_to(&mut self.host, index)?)
    }

    pub fn save_snapshot(&mut self) -> Result<()> {
        self.editor.save_snapshot(&self.host)?;
        Ok(())
    }

    pub fn restore_snapshot(&mut self) -> Result<()> {
        Ok(self.editor.restore_snapshot(&mut self.host)?)
    }

    pub fn clear(&mut self) -> Result<()> {
        Ok(self.editor.clear(&mut self.host)?)
    }

    pub fn prompt(&self, target: Target) -> Result<String> {
        Ok(self.host.read(target)?)
    }

    /// Run one command. Returns `false` when the session should end.
    pub async fn handle_command(&mut self, command: Command, out: &OutputHandler) -> Result<bool> {
        match command {
            Command::List => out.print_catalogs(&self.catalog, self.current()),
            Command::Show(name) => {
                self.select(&name)?;
                self.print_current(out);
            }
            Command::Pick { index, target } => {
                let picked = self.pick(index, target)?;
                let verb = if picked.selected { "added" } else { "removed" };
                out.print_success(&format!("{verb} {}", picked.button.label));
                self.print_prompts(out)?;
            }
            Command::Text { target, text } => {
                let verb = if self.toggle_text(target, &text)? { "added" } else { "removed" };
                out.print_success(&format!("{verb} {text}"));
                self.print_prompts(out)?;
            }
            Command::Undo => {
                if self.undo()? {
                    self.print_prompts(out)?;
                } else {
                    out.print_system("Nothing to undo.");
                }
            }
            Command::Redo => {
                if self.redo()? {
                    self.print_prompts(out)?;
                } else {
                    out.print_system("Nothing to redo.");
                }
            }
            Command::UndoTo(index) => {
                let undone = self.undo_to(index)?;
                out.print_system(&format!("Undid {undone} entries."));
                self.print_prompts(out)?;
            }
            Command::History => {
                out.print_history(self.editor.history(), self.editor.redo_stack().len())
            }
            Command::Save => {
                self.save_snapshot()?;
                out.print_success("snapshot saved");
            }
            Command::Restore => {
                if self.editor.snapshot().is_none() {
                    out.print_system("No snapshot saved, prompts are emptied.");
                }
                self.restore_snapshot()?;
                self.print_prompts(out)?;
            }
            Command::Clear => {
                self.clear()?;
                out.print_success("prompts cleared");
            }
            Command::Prompt => self.print_prompts(out)?,
            Command::Reload => {
                let skipped = self.reload().await?;
                out.print_success(&format!("loaded {} catalogs", self.catalog.len()));
                if skipped > 0 {
                    out.print_system(&format!("{skipped} tag files were skipped, see the log."));
                }
            }
            Command::Help => out.print_help(),
            Command::Exit => return Ok(false),
        }
        Ok(true)
    }

    pub fn print_current(&self, out: &OutputHandler) {
        let buttons = self.buttons();
        let selected = self.selection(&buttons);
        out.print_buttons(&buttons, &selected);
    }

    fn print_prompts(&self, out: &OutputHandler) -> Result<()> {
        out.print_prompts(
            &self.prompt(Target::Positive)?,
            &self.prompt(Target::Negative)?,
        );
        Ok(())
    }
}
