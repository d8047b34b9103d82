//! # Content Application
//!
//! Writes stored content back onto a surface.
//!
//! Records hold only the elements changed by one save, so the page a
//! visitor sees is the overlay of every record for the page, oldest first
//! ([`materialize`]). A record holding a full set folds the same way.

use beacon_store::{Content, VersionRecord};

use crate::surface::EditableSurface;

/// Outcome of one [`apply_content`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: Vec<String>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Replace the inner HTML of every element the content addresses.
///
/// Selectors that do not resolve (or do not parse) are skipped; applying
/// the same content twice leaves the surface as after the first time.
pub fn apply_content<S: EditableSurface>(surface: &mut S, content: &Content) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (selector, html) in content.iter() {
        match surface.resolve(selector) {
            Some(node) => {
                surface.write_content(node, html);
                report.applied += 1;
            }
            None => {
                tracing::debug!(selector, "skipping unresolved selector");
                report.skipped.push(selector.to_string());
            }
        }
    }

    report
}

/// Effective content of a page from its history (newest first, as listed)
pub fn materialize(history: &[VersionRecord]) -> Content {
    let mut content = Content::new();
    for record in history.iter().rev() {
        content.overlay(&record.content);
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorConfig, HtmlSurface};
    use chrono::{TimeZone, Utc};

    const PAGE: &str = r#"<body><h1>Title</h1><p class="tagline">Tag</p><p>Body</p></body>"#;

    fn content(entries: &[(&str, &str)]) -> Content {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn record(id: i64, entries: &[(&str, &str)]) -> VersionRecord {
        VersionRecord {
            id,
            page: "index".into(),
            content: content(entries),
            version_major: Some(1),
            version_minor: Some(id as u32),
            updated_by: Some("ada".into()),
            updated_at: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut surface = HtmlSurface::from_source(PAGE, EditorConfig::default());
        let content = content(&[("h1", "New <em>title</em>"), ("p.tagline:nth-of-type(1)", "New tag")]);

        apply_content(&mut surface, &content);
        let once = surface.to_html();
        apply_content(&mut surface, &content);
        assert_eq!(surface.to_html(), once);
    }

    #[test]
    fn test_partial_resolution() {
        let mut surface = HtmlSurface::from_source(PAGE, EditorConfig::default());
        let content = content(&[("h1", "Hello"), ("#gone", "x"), ("p[[", "y")]);

        let report = apply_content(&mut surface, &content);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, vec!["#gone".to_string(), "p[[".to_string()]);
        assert!(surface.to_html().contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_materialize_folds_oldest_first() {
        let history = vec![
            record(3, &[("h1", "Third")]),
            record(2, &[("p", "Second body")]),
            record(1, &[("h1", "First"), ("p", "First body")]),
        ];
        let effective = materialize(&history);
        assert_eq!(effective.get("h1"), Some("Third"));
        assert_eq!(effective.get("p"), Some("Second body"));
    }

    #[test]
    fn test_materialize_replays_container_then_newer_nested_write() {
        let page = r#"<body><div id="hero"><p>Start</p></div></body>"#;
        let history = vec![
            record(3, &[("#hero > p", "newest")]),
            record(2, &[("#hero", "<p>fresh</p>")]),
            record(1, &[("#hero > p", "old")]),
        ];

        let effective = materialize(&history);
        assert_eq!(effective.selectors().collect::<Vec<_>>(), vec!["#hero", "#hero > p"]);

        let mut surface = HtmlSurface::from_source(page, EditorConfig::default());
        apply_content(&mut surface, &effective);
        assert_eq!(surface.to_html(), r#"<body><div id="hero"><p>newest</p></div></body>"#);
    }
}
