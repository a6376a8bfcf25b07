#![forbid(unsafe_code)]

mod config;
mod constants;
mod containment;
mod dom;
mod editor;
mod geometry;
mod gui;
mod interaction;
mod objects;
mod schema;
mod script;
mod settings;
mod templates;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use config::EditorConfig;
use editor::Editor;

/// Drag-and-drop database schema sketcher
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// TOML file with object templates
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the editor window (default)
    Gui,
    /// Replay a JSON editing script and print the resulting schema
    Replay {
        script: PathBuf,

        /// Write the schema here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective object templates as TOML
    Templates,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load_or_create(path)?,
        None => EditorConfig::load()?,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.effective_log_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let spec = config.templates(cli.templates.as_deref())?;

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => {
            info!("Starting editor window");
            gui::run_gui(&config, &spec)
        }
        Command::Replay { script, output } => {
            let steps = script::load(&script)?;
            let mut editor = Editor::new(&spec);
            script::replay(&mut editor, &steps)?;

            let schema = editor.serialize()?;
            let json = schema::to_json(&schema, config.pretty_json)
                .context("Failed to serialize schema to JSON")?;
            match output {
                Some(path) => {
                    fs::write(&path, json + "\n")
                        .with_context(|| format!("Failed to write schema to {}", path.display()))?;
                    info!(path = %path.display(), tables = schema.len(), "Wrote schema");
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Command::Templates => {
            print!("{}", spec.to_toml()?);
            Ok(())
        }
    }
}
