use crate::config::Config;
use anyhow::Result;
use beacon_store::{PageId, VersionStore};
use clap::Args;
use colored::Colorize;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Page path or name (e.g. about.html)
    #[arg(default_value = "index.html")]
    pub page: String,
}

/// Print a line for every version other editors save, until Ctrl-C
pub async fn watch(args: WatchArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.rest_store()?;
    let page = PageId::from_path(&args.page);

    let mut subscription = store.subscribe(&page).await?;
    println!("{} {} (Ctrl-C to stop)", "👀 Watching".bright_blue().bold(), page);

    loop {
        tokio::select! {
            event = subscription.next() => match event {
                Some(record) => println!(
                    "  {} Page updated by {} ({}, #{})",
                    "●".green(),
                    record.author(),
                    record.version(),
                    record.id
                ),
                None => {
                    println!("{}", "Subscription closed".yellow());
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
