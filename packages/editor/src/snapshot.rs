//! # Content Snapshot
//!
//! Baseline of every editable element taken when editing starts. The
//! change set of a save is whatever differs from it byte for byte.

use beacon_store::Content;
use indexmap::IndexMap;

use crate::surface::EditableSurface;

#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    baseline: IndexMap<String, String>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the baseline with the surface's current editable content
    pub fn begin_tracking<S: EditableSurface>(&mut self, surface: &S) {
        self.baseline.clear();
        for node in surface.editable_nodes() {
            if let Some(key) = surface.derive_key(node) {
                self.baseline.insert(key, surface.read_content(node));
            }
        }
        tracing::debug!(tracked = self.baseline.len(), "snapshot taken");
    }

    /// Editable elements whose HTML moved away from the baseline.
    ///
    /// Keys the baseline never saw are ignored, as are baseline keys that
    /// no longer resolve.
    pub fn compute_changes<S: EditableSurface>(&self, surface: &S) -> Content {
        let mut changes = Content::new();
        for node in surface.editable_nodes() {
            let Some(key) = surface.derive_key(node) else {
                continue;
            };
            let Some(original) = self.baseline.get(&key) else {
                continue;
            };
            let current = surface.read_content(node);
            if &current != original {
                changes.insert(key, current);
            }
        }
        changes
    }

    pub fn clear(&mut self) {
        self.baseline.clear();
    }

    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }

    pub fn baseline(&self, key: &str) -> Option<&str> {
        self.baseline.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorConfig, HtmlSurface};

    const PAGE: &str = "<body><h1>Title</h1><p>One</p><p>Two</p></body>";

    #[test]
    fn test_untouched_page_has_no_changes() {
        let surface = HtmlSurface::from_source(PAGE, EditorConfig::default());
        let mut snapshot = SnapshotStore::new();
        snapshot.begin_tracking(&surface);
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.compute_changes(&surface).is_empty());
    }

    #[test]
    fn test_only_modified_entries_are_reported() {
        let mut surface = HtmlSurface::from_source(PAGE, EditorConfig::default());
        let mut snapshot = SnapshotStore::new();
        snapshot.begin_tracking(&surface);

        surface.set_editing(true);
        surface.edit("p:nth-of-type(2)", "Two <b>bold</b>");

        let changes = snapshot.compute_changes(&surface);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("p:nth-of-type(2)"), Some("Two <b>bold</b>"));
        assert_eq!(snapshot.baseline("p:nth-of-type(2)"), Some("Two"));
    }

    #[test]
    fn test_edit_back_to_original_is_not_a_change() {
        let mut surface = HtmlSurface::from_source(PAGE, EditorConfig::default());
        let mut snapshot = SnapshotStore::new();
        snapshot.begin_tracking(&surface);

        surface.set_editing(true);
        surface.edit("h1", "Other");
        surface.edit("h1", "Title");
        assert!(snapshot.compute_changes(&surface).is_empty());
    }
}
