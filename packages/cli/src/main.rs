mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    edit, export, history, init, render, revert, show, watch, word, EditArgs, ExportArgs, HistoryArgs,
    InitArgs, RenderArgs, RevertArgs, ShowArgs, WatchArgs, WordArgs,
};
use tracing_subscriber::EnvFilter;

/// Beacon CLI - edit-this-page versions from the terminal
#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter beacon.config.json
    Init(InitArgs),

    /// List the saved versions of a page
    History(HistoryArgs),

    /// Show what a single version changed
    Show(ShowArgs),

    /// Edit elements of a page and save a new version
    Edit(EditArgs),

    /// Restore an older version as a new one
    Revert(RevertArgs),

    /// Render a page with its current version applied
    Render(RenderArgs),

    /// Follow versions saved by other editors
    Watch(WatchArgs),

    /// Back up every version as Markdown and JSON
    Export(ExportArgs),

    /// Export a page as a Word document
    Word(WordArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(dir) => run(cli.command, &dir.display().to_string()).await,
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

async fn run(command: Command, cwd: &str) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd),
        Command::History(args) => history(args, cwd).await,
        Command::Show(args) => show(args, cwd).await,
        Command::Edit(args) => edit(args, cwd).await,
        Command::Revert(args) => revert(args, cwd).await,
        Command::Render(args) => render(args, cwd).await,
        Command::Watch(args) => watch(args, cwd).await,
        Command::Export(args) => export(args, cwd).await,
        Command::Word(args) => word(args, cwd).await,
    }
}
