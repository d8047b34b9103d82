use super::open_page;
use crate::config::Config;
use anyhow::Result;
use beacon_editor::EditableSurface;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// HTML page to render
    pub input: String,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Bake the current version of a page into static HTML
pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = config.rest_store()?;
    let controller = open_page(&config, cwd, &args.input, Some(store)).await?;

    let session = controller.session();
    let html = controller.surface().to_html();

    match &args.output {
        Some(output) => {
            let path = PathBuf::from(cwd).join(output);
            fs::write(&path, &html)?;
            println!(
                "  {} {} ({}, {} editable elements) → {}",
                "✓".green(),
                args.input,
                session.current_version(),
                controller.surface().editable_nodes().len(),
                path.display()
            );
        }
        None => print!("{}", html),
    }

    Ok(())
}
