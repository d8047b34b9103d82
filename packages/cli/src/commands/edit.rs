use super::{open_page, print_notices};
use crate::config::Config;
use anyhow::{anyhow, Result};
use beacon_editor::ControllerState;
use beacon_store::ReleaseKind;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// HTML page to edit
    pub input: String,

    /// Replace the inner HTML of an editable element (repeatable)
    #[arg(long = "set", num_args = 2, value_names = ["SELECTOR", "HTML"], required = true)]
    pub set: Vec<String>,

    /// Your name (defaults to the last name used)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Bump the major version instead of the minor one
    #[arg(long)]
    pub major: bool,

    /// Also write the edited page back to disk
    #[arg(short, long)]
    pub write: bool,
}

/// Run one edit-and-save cycle without a browser
pub async fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = if config.is_configured() {
        Some(config.rest_store()?)
    } else {
        None
    };
    let mut controller = open_page(&config, cwd, &args.input, store).await?;

    controller.toggle().await?;
    for pair in args.set.chunks(2) {
        let [selector, html] = pair else {
            return Err(anyhow!("--set takes a selector and an HTML fragment"));
        };
        if controller.surface_mut().edit(selector, html) {
            controller.note_input();
        } else {
            eprintln!("  {} no editable element matches {}", "⚠️".yellow(), selector);
        }
    }
    controller.toggle().await?;

    let remembered = match controller.state() {
        ControllerState::ShowingSaveDialog(dialog) => dialog.editor_name.clone(),
        _ => {
            // Nothing changed; the controller already queued a notice
            print_notices(controller.drain_notices());
            return Ok(());
        }
    };

    let name = args.name.unwrap_or(remembered);
    let kind = if args.major { ReleaseKind::Major } else { ReleaseKind::Minor };
    let result = controller.confirm(&name, kind).await;
    print_notices(controller.drain_notices());
    result?;

    if controller.is_local() {
        println!("{}", "Local mode: the version was not stored".yellow());
    }
    if args.write {
        fs::write(PathBuf::from(cwd).join(&args.input), controller.surface().to_html())?;
        println!("Wrote {}", args.input);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_edit_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<html><body><h1>Old</h1><p class=\"tagline\">Keep</p></body></html>",
        )
        .unwrap();

        let args = EditArgs {
            input: "index.html".into(),
            set: vec!["h1".into(), "New <em>title</em>".into()],
            name: Some("Ada".into()),
            major: false,
            write: true,
        };
        edit(args, cwd).await.unwrap();

        let written = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(
            written,
            "<html><body><h1>New <em>title</em></h1><p class=\"tagline\">Keep</p></body></html>"
        );
        let prefs = fs::read_to_string(dir.path().join(".beacon/preferences.json")).unwrap();
        assert!(prefs.contains("Ada"));
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join("index.html"), "<body><h1>Old</h1></body>").unwrap();

        let args = EditArgs {
            input: "index.html".into(),
            set: vec!["h1".into(), "New".into()],
            name: Some("  ".into()),
            major: true,
            write: true,
        };
        assert!(edit(args, cwd).await.is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join("index.html")).unwrap(),
            "<body><h1>Old</h1></body>"
        );
    }
}
