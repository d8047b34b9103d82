//! Offline backup: Markdown transcript plus JSON dumps written to a directory.

use beacon_store::VersionRecord;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::error::ExportResult;
use crate::json::{full_dump, latest_state};
use crate::markdown::{render_markdown, MarkdownLayout};

pub const MARKDOWN_FILE: &str = "beacon_edits_backup.md";
pub const FULL_JSON_FILE: &str = "beacon_full_backup.json";
pub const LATEST_JSON_FILE: &str = "beacon_current_state.json";

/// Files written by [`write_backup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFiles {
    pub markdown: PathBuf,
    pub full_json: PathBuf,
    /// Absent when there are no versions
    pub latest_json: Option<PathBuf>,
}

pub fn write_backup(
    dir: &Path,
    versions: &[VersionRecord],
    layout: MarkdownLayout,
    exported_at: NaiveDateTime,
) -> ExportResult<BackupFiles> {
    std::fs::create_dir_all(dir)?;

    let markdown = dir.join(MARKDOWN_FILE);
    std::fs::write(&markdown, render_markdown(versions, layout, exported_at))?;

    let full_json = dir.join(FULL_JSON_FILE);
    std::fs::write(&full_json, full_dump(versions)?)?;

    let latest_json = match latest_state(versions)? {
        Some(latest) => {
            let path = dir.join(LATEST_JSON_FILE);
            std::fs::write(&path, latest)?;
            Some(path)
        }
        None => None,
    };

    tracing::info!(dir = %dir.display(), versions = versions.len(), "backup written");
    Ok(BackupFiles {
        markdown,
        full_json,
        latest_json,
    })
}
