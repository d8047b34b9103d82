//! # Views
//!
//! Display models for the overlay chrome: version badge, history panel,
//! version detail and notices. They carry text only; how they are drawn is
//! up to the host.

use beacon_dom::strip_tags;
use beacon_store::VersionRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Characters of plain text shown per changed element
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message for the visitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// `just now`, `5m ago`, `3h ago`, `2d ago`, then the calendar date
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else if seconds < 604_800 {
        format!("{}d ago", seconds / 86_400)
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

/// Plain-text excerpt of an HTML fragment
pub fn preview_text(html: &str, limit: usize) -> String {
    strip_tags(html).chars().take(limit).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub title: String,
    pub subtitle: String,
    pub show_history: bool,
}

impl Badge {
    pub fn local_mode() -> Self {
        Self {
            title: "Local Mode".to_string(),
            subtitle: "Setup Supabase to enable collaboration".to_string(),
            show_history: false,
        }
    }

    /// Badge for a page history listed newest first
    pub fn for_history(history: &[VersionRecord], now: DateTime<Utc>) -> Self {
        match history.first() {
            Some(latest) => Self {
                title: latest.version().to_string(),
                subtitle: format!("by {} - {}", latest.author(), relative_time(latest.updated_at, now)),
                show_history: history.len() > 1,
            },
            None => Self {
                title: "v1.0".to_string(),
                subtitle: "Initial version".to_string(),
                show_history: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub label: String,
    pub author: String,
    pub when: String,
    pub is_current: bool,
    pub can_revert: bool,
}

pub fn history_view(history: &[VersionRecord], now: DateTime<Utc>) -> Vec<HistoryEntry> {
    history
        .iter()
        .enumerate()
        .map(|(i, record)| HistoryEntry {
            id: record.id,
            label: record.version().to_string(),
            author: record.author().to_string(),
            when: relative_time(record.updated_at, now),
            is_current: i == 0,
            can_revert: i > 0,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePreview {
    pub selector: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub id: i64,
    pub label: String,
    pub author: String,
    pub when: String,
    pub changes: Vec<ChangePreview>,
}

pub fn detail_view(record: &VersionRecord, now: DateTime<Utc>) -> DetailView {
    DetailView {
        id: record.id,
        label: record.version().to_string(),
        author: record.author().to_string(),
        when: relative_time(record.updated_at, now),
        changes: record
            .content
            .iter()
            .map(|(selector, html)| ChangePreview {
                selector: selector.to_string(),
                text: preview_text(html, PREVIEW_CHARS),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_store::Content;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn record(id: i64, minor: u32, ago: Duration) -> VersionRecord {
        let mut content = Content::new();
        content.insert("h1", "<b>Hello</b>   world");
        VersionRecord {
            id,
            page: "index".into(),
            content,
            version_major: Some(1),
            version_minor: Some(minor),
            updated_by: Some("ada".into()),
            updated_at: now() - ago,
        }
    }

    #[test]
    fn test_relative_time() {
        let now = now();
        assert_eq!(relative_time(now - Duration::seconds(59), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::minutes(150), now), "2h ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3d ago");
        assert_eq!(relative_time(now - Duration::days(8), now), "2024-03-02");
        assert_eq!(relative_time(now + Duration::seconds(5), now), "just now");
    }

    #[test]
    fn test_badge() {
        assert_eq!(Badge::for_history(&[], now()).title, "v1.0");
        assert_eq!(Badge::for_history(&[], now()).subtitle, "Initial version");

        let history = vec![record(2, 1, Duration::minutes(3)), record(1, 0, Duration::hours(1))];
        let badge = Badge::for_history(&history, now());
        assert_eq!(badge.title, "v1.1");
        assert_eq!(badge.subtitle, "by ada - 3m ago");
        assert!(badge.show_history);
        assert!(!Badge::for_history(&history[..1], now()).show_history);
    }

    #[test]
    fn test_history_view_marks_current() {
        let history = vec![record(2, 1, Duration::minutes(3)), record(1, 0, Duration::hours(1))];
        let entries = history_view(&history, now());
        assert!(entries[0].is_current && !entries[0].can_revert);
        assert!(!entries[1].is_current && entries[1].can_revert);
        assert_eq!(entries[1].when, "1h ago");
    }

    #[test]
    fn test_detail_preview_strips_markup() {
        let detail = detail_view(&record(1, 0, Duration::zero()), now());
        assert_eq!(detail.changes[0].selector, "h1");
        assert_eq!(detail.changes[0].text, "Hello world");
    }

    #[test]
    fn test_preview_truncates_by_chars() {
        let long = "é".repeat(150);
        assert_eq!(preview_text(&long, PREVIEW_CHARS).chars().count(), 100);
    }
}
