//! # Beacon Export
//!
//! Offline renderings of page versions and pages:
//!
//! - Markdown backup transcripts (flat or sectioned)
//! - JSON dumps of every record or the newest one
//! - Word documents of the visible page (WordprocessingML or HTML `.doc`)

mod backup;
mod context;
mod error;
mod json;
mod markdown;
mod visible;
mod word;

pub use backup::{write_backup, BackupFiles, FULL_JSON_FILE, LATEST_JSON_FILE, MARKDOWN_FILE};
pub use error::{ExportError, ExportResult};
pub use json::{full_dump, latest_state};
pub use markdown::{
    flat_backup, render_markdown, section_of, sectioned_backup, MarkdownLayout, FLAT_PREVIEW_CHARS,
    FLAT_PREVIEW_LIMIT, SECTION_PREVIEW_CHARS, SECTION_PREVIEW_LIMIT,
};
pub use visible::{page_title, visible_blocks, visible_document, Block};
pub use word::{compile_to_word_html, compile_to_wordml, WordOptions};

#[cfg(test)]
mod tests;
