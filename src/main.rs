use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use footquill::config::Config;
use footquill::editor::buffer::{EditableView, TextBuffer};
use footquill::editor::cursor::Position;
use footquill::file::{load_document, load_document_from_stdin, save_document};
use footquill::footnote::FootnoteIndex;
use footquill::navigator::NavigationOutcome;
use footquill::session::{Document, Session};

/// footquill - Footnote index, backreference labels and navigation for Markdown
#[derive(Parser)]
#[command(name = "footquill")]
#[command(version)]
#[command(about = "Footnote index, backreference labels and navigation for Markdown", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/footquill/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every footnote label with its references and definition
    Index {
        /// Markdown file ("-" for stdin)
        file: String,
        /// Print the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report orphaned, unused, duplicated and oddly named footnotes
    Check {
        /// Markdown file ("-" for stdin)
        file: String,
    },
    /// Suggest footnote labels from the document's content
    Suggest {
        /// Markdown file ("-" for stdin)
        file: String,
    },
    /// Jump between a marker and its definition, or insert a new footnote
    Nav {
        /// Markdown file
        file: PathBuf,
        /// Cursor line (1-based)
        #[arg(short, long)]
        line: usize,
        /// Cursor column (1-based)
        #[arg(long, default_value_t = 1)]
        ch: usize,
        /// Save the file when a footnote was inserted
        #[arg(short, long)]
        write: bool,
        /// Keep a .bak copy of the file when writing
        #[arg(long)]
        backup: bool,
    },
    /// Render the backreference links of every definition
    Render {
        /// Markdown file ("-" for stdin)
        file: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        load_document_from_stdin()
    } else {
        load_document(file)
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path).context("Failed to load config"),
        None => Ok(Config::load()),
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let mut session = Session::new(config);

    let code = match cli.command {
        Command::Index { file, json } => {
            let index = FootnoteIndex::build(&read_input(&file)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else {
                print_index(&index);
            }
            ExitCode::SUCCESS
        }
        Command::Check { file } => {
            let text = read_input(&file)?;
            let index = FootnoteIndex::build(&text);
            let issues = footquill::footnote::validate(&text, &index, session.config());
            println!("{}", footquill::footnote::summarize(&issues));
            if issues.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Suggest { file } => {
            for label in session.suggest(&read_input(&file)?) {
                println!("{}", label);
            }
            ExitCode::SUCCESS
        }
        Command::Nav {
            file,
            line,
            ch,
            write,
            backup,
        } => {
            let text = load_document(&file)?;
            let cursor = Position::new(line.saturating_sub(1), ch.saturating_sub(1));
            let mut buffer = TextBuffer::from_text(&text).with_cursor(cursor);
            let outcome = session.navigate(Some(&mut buffer));
            print_navigation(&outcome);

            if write && matches!(outcome, NavigationOutcome::Created { .. }) {
                save_document(&file, &buffer.text(), backup)?;
            }
            if outcome.performed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Render { file } => {
            let mut docs = vec![Document::rendered(file.clone(), read_input(&file)?)];
            session.sync_all(&mut docs);
            for backref in docs[0].backrefs() {
                println!("{}", backref);
            }
            ExitCode::SUCCESS
        }
    };

    session.shutdown();
    Ok(code)
}

fn print_index(index: &FootnoteIndex) {
    if index.is_empty() {
        println!("No footnotes");
        return;
    }
    for entry in index.iter() {
        let definition = if entry.definition.is_empty() {
            "(no definition)"
        } else {
            entry.definition.as_str()
        };
        println!(
            "[^{}] x{}: {}",
            entry.label,
            entry.references.len(),
            definition
        );
    }
}

fn print_navigation(outcome: &NavigationOutcome) {
    match outcome {
        NavigationOutcome::Unavailable => println!("No footnote navigation performed"),
        NavigationOutcome::JumpedToReference { label, position } => {
            println!("[^{}] reference at {}", label, position)
        }
        NavigationOutcome::JumpedToDefinition { label, position } => {
            println!("[^{}] definition at {}", label, position)
        }
        NavigationOutcome::Created { label, position } => {
            println!("Inserted [^{}], definition at {}", label, position)
        }
    }
}
