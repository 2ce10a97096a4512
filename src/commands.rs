//! REPL command parsing.

use crate::host::Target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(String),
    Pick { index: usize, target: Target },
    Text { target: Target, text: String },
    Undo,
    Redo,
    UndoTo(usize),
    History,
    Save,
    Restore,
    Clear,
    Prompt,
    Reload,
    Help,
    Exit,
}

/// Help text, one `(usage, description)` pair per command.
pub const HELP: &[(&str, &str)] = &[
    ("list", "List loaded catalogs"),
    ("show <name>", "Select a catalog and print its tags"),
    ("pick <n> [neg]", "Toggle tag n of the selected catalog"),
    ("add <text>", "Toggle free text in the positive prompt"),
    ("neg <text>", "Toggle free text in the negative prompt"),
    ("undo / redo", "Step through the edit history"),
    ("undo-to <i>", "Undo back to history entry i"),
    ("history", "Show the edit history"),
    ("save / restore", "Save or restore a snapshot of both prompts"),
    ("clear", "Empty both prompts"),
    ("prompt", "Print both prompts"),
    ("reload", "Reload tag files from the manifest"),
    ("exit", "Quit"),
];

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "show" | "cd" => {
                if rest.is_empty() {
                    return Err("usage: show <name>".to_string());
                }
                Command::Show(rest.to_string())
            }
            "pick" | "p" => parse_pick(rest)?,
            "add" | "neg" if rest.is_empty() => {
                return Err(format!("usage: {word} <text>"));
            }
            "add" => Command::Text {
                target: Target::Positive,
                text: rest.to_string(),
            },
            "neg" => Command::Text {
                target: Target::Negative,
                text: rest.to_string(),
            },
            "undo" | "u" => Command::Undo,
            "redo" | "r" => Command::Redo,
            "undo-to" => Command::UndoTo(parse_number(rest, "undo-to <i>")?),
            "history" | "h" => Command::History,
            "save" => Command::Save,
            "restore" => Command::Restore,
            "clear" => Command::Clear,
            "prompt" => Command::Prompt,
            "reload" => Command::Reload,
            "help" | "?" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "" => return Err("empty command".to_string()),
            other => {
                // a bare number picks that tag
                if other.parse::<usize>().is_ok() {
                    return parse_pick(line);
                }
                return Err(format!("unknown command '{other}', try 'help'"));
            }
        };
        Ok(command)
    }
}

fn parse_pick(args: &str) -> Result<Command, String> {
    let mut parts = args.split_whitespace();
    let index = parse_number(parts.next().unwrap_or(""), "pick <n> [neg]")?;
    let target = match parts.next() {
        None => Target::Positive,
        Some(flag) if flag.eq_ignore_ascii_case("neg") => Target::Negative,
        Some(_) => return Err("usage: pick <n> [neg]".to_string()),
    };
    if index == 0 {
        return Err("tags are numbered from 1".to_string());
    }
    Ok(Command::Pick { index, target })
}

fn parse_number(text: &str, usage: &str) -> Result<usize, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("usage: {usage}"))
}
