use crate::config::Config;
use anyhow::{anyhow, Result};
use beacon_editor::detail_view;
use beacon_store::{PageId, VersionStore};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Page path or name (e.g. about.html)
    pub page: String,

    /// Version id (see `beacon history`)
    pub id: i64,

    /// Print the detail view as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.rest_store()?;
    let page = PageId::from_path(&args.page);

    let records = store.list_versions(&page).await?;
    let record = records
        .iter()
        .find(|record| record.id == args.id)
        .ok_or_else(|| anyhow!("Version #{} not found for page {}", args.id, page))?;
    let detail = detail_view(record, chrono::Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{} by {} - {}", detail.label.bright_blue().bold(), detail.author, detail.when);
    println!();
    if detail.changes.is_empty() {
        println!("{}", "No content in this version".dimmed());
    }
    for change in &detail.changes {
        println!("  {}", change.selector.cyan());
        println!("    {}", change.text);
    }

    Ok(())
}
