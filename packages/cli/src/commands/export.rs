use crate::config::Config;
use anyhow::Result;
use beacon_export::{write_backup, MarkdownLayout};
use beacon_store::VersionStore;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory to write the backup files into
    #[arg(short, long, default_value = "beacon-backup")]
    pub out_dir: String,

    /// Markdown layout (flat, sectioned)
    #[arg(short, long, default_value = "sectioned")]
    pub layout: MarkdownLayout,
}

pub async fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.rest_store()?;

    println!("{}", "📦 Exporting page versions...".bright_blue().bold());
    let versions = store.list_all().await?;
    println!("Found {} versions", versions.len());

    let dir = PathBuf::from(cwd).join(&args.out_dir);
    let exported_at = chrono::Local::now().naive_local();
    let files = write_backup(&dir, &versions, args.layout, exported_at)?;

    println!("  {} {}", "✓".green(), files.markdown.display());
    println!("  {} {}", "✓".green(), files.full_json.display());
    match &files.latest_json {
        Some(latest) => println!("  {} {}", "✓".green(), latest.display()),
        None => println!("  {} no versions yet, skipped current state", "⚠️".yellow()),
    }

    Ok(())
}
