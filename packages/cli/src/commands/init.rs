use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use beacon_store::{PLACEHOLDER_KEY, PLACEHOLDER_URL};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Supabase project URL (placeholder when omitted)
    #[arg(long)]
    pub url: Option<String>,

    /// Supabase anonymous key (placeholder when omitted)
    #[arg(long)]
    pub key: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), DEFAULT_CONFIG_NAME.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let config = starter_config(args.url, args.key);
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    if config.is_configured() {
        println!("{}", "✅ Beacon is connected to your version store".green().bold());
    } else {
        println!("{}", "✅ Beacon initialized in local mode".green().bold());
        println!();
        println!("Next steps:");
        println!("  1. Create a Supabase project with a page_versions table");
        println!("  2. Replace the placeholder URL and key in {}", DEFAULT_CONFIG_NAME);
        println!("  3. Run: beacon history index.html");
    }

    Ok(())
}

fn starter_config(url: Option<String>, key: Option<String>) -> Config {
    Config {
        supabase_url: Some(url.unwrap_or_else(|| PLACEHOLDER_URL.to_string())),
        supabase_key: Some(key.unwrap_or_else(|| PLACEHOLDER_KEY.to_string())),
        ..Config::default()
    }
}
