use super::{open_page, print_notices};
use crate::config::Config;
use anyhow::{anyhow, Result};
use beacon_editor::PreferenceStore;
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RevertArgs {
    /// HTML page the version belongs to
    pub input: String,

    /// Version id to restore (see `beacon history`)
    pub id: i64,

    /// Your name (defaults to the last name used)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Also write the restored content into the page file
    #[arg(short, long)]
    pub write: bool,
}

pub async fn revert(args: RevertArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.rest_store()?;
    let mut controller = open_page(&config, cwd, &args.input, Some(store)).await?;

    let name = match args.name {
        Some(name) => name,
        None => config
            .preferences(cwd)
            .editor_name()
            .ok_or_else(|| anyhow!("No editor name remembered yet; pass --name"))?,
    };

    let result = controller.revert(args.id, &name).await;
    print_notices(controller.drain_notices());
    let record = result?;

    println!("New version {} (#{})", record.version(), record.id);
    if args.write {
        fs::write(PathBuf::from(cwd).join(&args.input), controller.surface().to_html())?;
        println!("Wrote {}", args.input);
    }

    Ok(())
}
