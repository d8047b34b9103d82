use crate::config::Config;
use anyhow::Result;
use beacon_editor::{history_view, Badge};
use beacon_store::{PageId, VersionStore};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Page path or name (e.g. about.html)
    #[arg(default_value = "index.html")]
    pub page: String,

    /// Print the history as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn history(args: HistoryArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    if !config.is_configured() {
        let badge = Badge::local_mode();
        println!("{} {}", badge.title.yellow().bold(), badge.subtitle);
        return Ok(());
    }

    let store = config.rest_store()?;
    let page = PageId::from_path(&args.page);
    let records = store.list_versions(&page).await?;
    let now = chrono::Utc::now();
    let entries = history_view(&records, now);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let badge = Badge::for_history(&records, now);
    println!("{} {}", badge.title.bright_blue().bold(), badge.subtitle);
    println!("Page: {}", page);
    println!();

    if entries.is_empty() {
        println!("{}", "No versions saved yet".dimmed());
    }
    for entry in entries {
        let marker = if entry.is_current { "●".green() } else { "○".normal() };
        let current = if entry.is_current { " (current)".green().to_string() } else { String::new() };
        println!(
            "  {} {:<8} {:<24} {:<12} #{}{}",
            marker,
            entry.label.bold(),
            entry.author,
            entry.when.dimmed(),
            entry.id,
            current
        );
    }

    Ok(())
}
