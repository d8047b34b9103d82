//! # Page Session
//!
//! Everything the controller knows about the page it is attached to:
//! which page, the loaded history and the version counters. Navigating
//! to another document starts a fresh session.

use beacon_store::{PageId, VersionNumber, VersionRecord};

#[derive(Debug, Clone)]
pub struct Session {
    path: String,
    page: PageId,

    /// Counters the next save bumps from
    current_version: VersionNumber,

    /// Page records, newest first
    history: Vec<VersionRecord>,

    /// Author of a remote insert that arrived mid-edit
    deferred_remote: Option<String>,
}

impl Session {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            page: PageId::from_path(&path),
            path,
            current_version: VersionNumber::INITIAL,
            history: Vec::new(),
            deferred_remote: None,
        }
    }

    /// Drop all state and attach to `path`
    pub fn navigate(&mut self, path: impl Into<String>) {
        *self = Self::new(path);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self) -> &PageId {
        &self.page
    }

    pub fn current_version(&self) -> VersionNumber {
        self.current_version
    }

    pub fn history(&self) -> &[VersionRecord] {
        &self.history
    }

    /// Newest record, if the page has any
    pub fn current(&self) -> Option<&VersionRecord> {
        self.history.first()
    }

    pub fn find(&self, version_id: i64) -> Option<&VersionRecord> {
        self.history.iter().find(|record| record.id == version_id)
    }

    pub fn has_deferred_reload(&self) -> bool {
        self.deferred_remote.is_some()
    }

    pub(crate) fn set_history(&mut self, history: Vec<VersionRecord>) {
        self.current_version = history
            .first()
            .map(VersionRecord::version)
            .unwrap_or(VersionNumber::INITIAL);
        self.history = history;
    }

    pub(crate) fn advance(&mut self, version: VersionNumber) {
        self.current_version = version;
    }

    pub(crate) fn defer_remote(&mut self, author: String) {
        self.deferred_remote = Some(author);
    }

    pub(crate) fn take_deferred(&mut self) -> Option<String> {
        self.deferred_remote.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_resets() {
        let mut session = Session::new("/docs/about.html");
        assert_eq!(session.page().as_str(), "about");

        session.advance(VersionNumber::new(3, 2));
        session.defer_remote("ada".into());
        session.navigate("/");

        assert_eq!(session.page().as_str(), "index");
        assert_eq!(session.current_version(), VersionNumber::INITIAL);
        assert!(!session.has_deferred_reload());
        assert!(session.current().is_none());
    }
}
