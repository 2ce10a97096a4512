use anyhow::Result;
use clap::{Parser, Subcommand};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;

use tagpick::commands::Command;
use tagpick::{logger, App, Config, OutputHandler};

#[derive(Parser)]
#[command(name = "tagpick")]
#[command(about = "Pick prompt tags from YAML catalogs", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.tagpick/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Manifest path, relative to the source
    #[arg(short, long)]
    manifest: Option<String>,

    /// Directory or http(s) URL holding the manifest and tag files
    #[arg(short, long)]
    source: Option<String>,

    /// Print load details
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging and show tag values
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Interactive picker (default)
    Repl,
    /// Print the numbered tags of one catalog, or of all catalogs
    Tree { name: Option<String> },
    /// Print the loaded catalog as JSON
    Dump,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let home = Config::home_dir();
    let log_path = logger::init_global_logger(&home, cli.debug)?;

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(manifest) = cli.manifest {
        config.manifest = manifest;
    }
    if let Some(source) = cli.source {
        config.source = source;
    }

    let out = OutputHandler::new().with_debug(cli.debug);
    if cli.verbose {
        out.print_system(&format!(
            "Loading {} from {} (log: {})",
            config.manifest,
            config.source,
            log_path.display()
        ));
    }

    let mut app = App::new(config)?;

    match cli.command.unwrap_or(Mode::Repl) {
        Mode::Repl => {
            if let Err(e) = app.reload().await {
                out.print_error(&format!("{e:#}"));
            }
            run_repl(&mut app, &out, &home).await
        }
        Mode::Tree { name } => {
            app.reload().await?;
            let names: Vec<String> = match name {
                Some(name) => vec![name],
                None => app.catalog().names().map(str::to_string).collect(),
            };
            for name in names {
                app.select(&name)?;
                println!("{}", console::style(&name).cyan().bold());
                app.print_current(&out);
            }
            Ok(())
        }
        Mode::Dump => {
            app.reload().await?;
            println!("{}", serde_json::to_string_pretty(app.catalog())?);
            Ok(())
        }
    }
}

async fn run_repl(app: &mut App, out: &OutputHandler, home: &std::path::Path) -> Result<()> {
    let history = FileBackedHistory::with_file(500, home.join("history.txt"))?;
    let mut line_editor = Reedline::create().with_history(Box::new(history));
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("tagpick".to_string()),
        DefaultPromptSegment::Empty,
    );

    out.print_banner();
    out.print_catalogs(app.catalog(), app.current());

    loop {
        let line = match line_editor.read_line(&prompt)? {
            Signal::Success(line) => line,
            _ => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                out.print_error(&message);
                continue;
            }
        };

        match app.handle_command(command, out).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                out.print_error(&format!("{e:#}"));
            }
        }
    }

    Ok(())
}
