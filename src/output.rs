use console::style;

use crate::catalog::TagCatalog;
use crate::commands::HELP;
use crate::engine::HistoryEntry;
use crate::tree::{ButtonKind, TagButton};

pub struct OutputHandler {
    debug: bool,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self { debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn print_banner(&self) {
        println!("{}", style("╔═══════════════════════════════════════╗").cyan().bold());
        println!("{}", style("║       tagpick - prompt tag picker     ║").cyan().bold());
        println!("{}", style("╚═══════════════════════════════════════╝").cyan().bold());
        println!("{}", style("Type 'help' for commands.").dim());
    }

    pub fn print_error(&self, content: &str) {
        println!("{} {}", style("Error:").red().bold(), content);
    }

    pub fn print_system(&self, content: &str) {
        println!("{}", style(content).yellow().dim());
    }

    pub fn print_success(&self, content: &str) {
        println!("{} {}", style("✓").green().bold(), content);
    }

    /// Catalog names with their tag counts, marking the selected one.
    pub fn print_catalogs(&self, catalog: &TagCatalog, current: Option<&str>) {
        if catalog.is_empty() {
            self.print_system("No catalogs loaded.");
            return;
        }
        for (name, node) in catalog.iter() {
            let count = style(format!("({} tags)", node.leaf_count())).dim();
            if Some(name) == current {
                println!("  {} {} {}", style("▸").cyan(), style(name).cyan().bold(), count);
            } else {
                println!("    {} {}", name, count);
            }
        }
    }

    /// Numbered button list; `selected[i]` marks tags present in the prompt.
    pub fn print_buttons(&self, buttons: &[TagButton], selected: &[bool]) {
        let width = buttons.len().to_string().len();
        for (i, button) in buttons.iter().enumerate() {
            let indent = "  ".repeat(button.depth);
            let number = style(format!("{:>width$}", i + 1)).dim();
            let mark = if selected.get(i).copied().unwrap_or(false) {
                style("●").green().to_string()
            } else {
                " ".to_string()
            };
            match button.kind {
                ButtonKind::Header => println!(
                    "{number} {mark} {indent}{} {}",
                    style(&button.label).magenta().bold(),
                    style(&button.value).dim()
                ),
                ButtonKind::Tag if self.debug && button.label != button.value => println!(
                    "{number} {mark} {indent}{} {}",
                    button.label,
                    style(format!("= {}", button.value)).dim()
                ),
                ButtonKind::Tag => println!("{number} {mark} {indent}{}", button.label),
            }
        }
        if buttons.is_empty() {
            self.print_system("This catalog has no tags.");
        }
    }

    pub fn print_prompts(&self, positive: &str, negative: &str) {
        println!("{} {}", style("Positive:").green().bold(), positive);
        println!("{} {}", style("Negative:").red().bold(), negative);
    }

    pub fn print_history(&self, history: &[HistoryEntry], redo_len: usize) {
        if history.is_empty() {
            self.print_system("History is empty.");
        }
        for (i, entry) in history.iter().enumerate() {
            println!("  {} {}", style(format!("{i:>3}")).dim(), entry.describe());
        }
        if redo_len > 0 {
            println!("{}", style(format!("  ({redo_len} undone, 'redo' to re-apply)")).dim());
        }
    }

    pub fn print_help(&self) {
        let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
        for (usage, description) in HELP {
            println!("  {} {}", style(format!("{usage:<width$}")).cyan(), description);
        }
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
