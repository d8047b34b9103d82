//! # Markdown Backup
//!
//! Human-readable transcript of stored versions. Two layouts:
//!
//! - **Flat**: every version lists its first edits in stored order
//! - **Sectioned**: edits grouped by the first `#id` in their selector
//!   (`other` when there is none), sections sorted by name

use beacon_dom::strip_tags;
use beacon_store::VersionRecord;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::ExportError;

pub const FLAT_PREVIEW_LIMIT: usize = 10;
pub const FLAT_PREVIEW_CHARS: usize = 100;
pub const SECTION_PREVIEW_LIMIT: usize = 5;
pub const SECTION_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkdownLayout {
    Flat,
    #[default]
    Sectioned,
}

impl FromStr for MarkdownLayout {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "sectioned" | "sections" => Ok(Self::Sectioned),
            other => Err(ExportError::UnknownLayout(other.to_string())),
        }
    }
}

pub fn render_markdown(versions: &[VersionRecord], layout: MarkdownLayout, exported_at: NaiveDateTime) -> String {
    match layout {
        MarkdownLayout::Flat => flat_backup(versions, exported_at),
        MarkdownLayout::Sectioned => sectioned_backup(versions, exported_at),
    }
}

pub fn flat_backup(versions: &[VersionRecord], exported_at: NaiveDateTime) -> String {
    let mut md = String::from("# Beacon Platform - Edit Backup\n\n");
    md.push_str(&format!("Exported: {}\n", exported_at.format("%Y-%m-%d %H:%M")));
    md.push_str(&format!("Total versions: {}\n\n---\n\n", versions.len()));

    for version in versions {
        md.push_str(&version_header(version));
        md.push('\n');

        let count = version.content.len();
        md.push_str(&format!("Edited {} elements.\n\n", count));

        for (selector, html) in version.content.iter().take(FLAT_PREVIEW_LIMIT) {
            md.push_str(&format!("- `{}`: {}...\n", selector, excerpt(html, FLAT_PREVIEW_CHARS)));
        }
        if count > FLAT_PREVIEW_LIMIT {
            md.push_str(&format!("- ... and {} more edits\n", count - FLAT_PREVIEW_LIMIT));
        }
        md.push_str("\n---\n\n");
    }

    md
}

pub fn sectioned_backup(versions: &[VersionRecord], exported_at: NaiveDateTime) -> String {
    let mut lines: Vec<String> = vec![
        "# Beacon Platform - Edit History Backup".to_string(),
        format!("\nExported: {}", exported_at.format("%Y-%m-%d %H:%M")),
        format!("\nTotal versions: {}\n", versions.len()),
        "---\n".to_string(),
    ];

    for version in versions {
        lines.extend(version_header(version).lines().map(str::to_string));
        lines.push(String::new());
        lines.push("### Edited Sections\n".to_string());

        let mut sections: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
        for (selector, html) in version.content.iter() {
            sections.entry(section_of(selector)).or_default().push((selector, html));
        }

        for (section, items) in sections {
            lines.push(format!("#### {}", section));
            for (selector, html) in items.iter().take(SECTION_PREVIEW_LIMIT) {
                let text = excerpt(html, SECTION_PREVIEW_CHARS);
                if !text.is_empty() {
                    lines.push(format!("- `{}`: {}...", selector, text));
                }
            }
            if items.len() > SECTION_PREVIEW_LIMIT {
                lines.push(format!(
                    "- ... and {} more edits in this section",
                    items.len() - SECTION_PREVIEW_LIMIT
                ));
            }
            lines.push(String::new());
        }

        lines.push("---\n".to_string());
    }

    lines.join("\n")
}

/// Section key of a selector: the first `#id` in it, else `other`
pub fn section_of(selector: &str) -> &str {
    let mut rest = selector;
    while let Some(hash) = rest.find('#') {
        let after = &rest[hash + 1..];
        let end = after
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(after.len());
        if end > 0 {
            return &after[..end];
        }
        rest = after;
    }
    "other"
}

fn version_header(version: &VersionRecord) -> String {
    let number = version.version();
    format!(
        "## Version {}.{}\n- **Updated by:** {}\n- **Updated at:** {}\n- **Page:** {}\n",
        number.major,
        number.minor,
        version.author(),
        version.updated_at.to_rfc3339(),
        version.page
    )
}

fn excerpt(html: &str, limit: usize) -> String {
    strip_tags(html).chars().take(limit).collect()
}
