pub mod edit;
pub mod export;
pub mod history;
pub mod init;
pub mod render;
pub mod revert;
pub mod show;
pub mod watch;
pub mod word;

pub use edit::{edit, EditArgs};
pub use export::{export, ExportArgs};
pub use history::{history, HistoryArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
pub use revert::{revert, RevertArgs};
pub use show::{show, ShowArgs};
pub use watch::{watch, WatchArgs};
pub use word::{word, WordArgs};

use crate::config::Config;
use anyhow::Result;
use beacon_editor::{EditController, HtmlSurface, Notice, NoticeKind};
use beacon_store::RestStore;
use colored::Colorize;
use std::path::PathBuf;

pub(crate) type PageController = EditController<HtmlSurface, RestStore>;

/// Open `input` (relative to `cwd`) as an editable page and load its history
pub(crate) async fn open_page(
    config: &Config,
    cwd: &str,
    input: &str,
    store: Option<RestStore>,
) -> Result<PageController> {
    let surface = HtmlSurface::load(PathBuf::from(cwd).join(input), config.editor.clone())?;
    let prefs = Box::new(config.preferences(cwd));
    let mut controller = EditController::new(surface, store, prefs, input);
    controller.load().await?;
    Ok(controller)
}

pub(crate) fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => println!("  {} {}", "✓".green(), notice.message),
            NoticeKind::Error => eprintln!("  {} {}", "✗".red(), notice.message),
        }
    }
}
