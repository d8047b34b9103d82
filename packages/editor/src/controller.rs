//! # Edit-Mode Controller
//!
//! Drives one page through viewing, editing and saving.
//!
//! ```text
//!            toggle                     toggle (changes)
//! Viewing ──────────→ Editing{dirty} ─────────────────→ ShowingSaveDialog
//!    ↑  ←── toggle (no changes) ──┘ ↑                     │        │
//!    │  ←── cancel_edits ─────────┘ └──── cancel_dialog ──┘        │ confirm
//!    │                                   ↑ insert failed           ↓
//!    └────────────── insert ok ───────── Saving ←──────────────────┘
//! ```
//!
//! The controller is a plain struct driven through `&mut self`, so at most
//! one operation touches the surface at a time. Remote inserts arriving
//! while an edit is open are remembered and applied once the controller is
//! back in `Viewing`.

use beacon_store::{
    Content, NewVersion, ReleaseKind, StoreError, Subscription, VersionRecord, VersionStore,
};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::apply::{apply_content, materialize};
use crate::errors::{EditorError, EditorResult};
use crate::prefs::PreferenceStore;
use crate::session::Session;
use crate::snapshot::SnapshotStore;
use crate::surface::EditableSurface;
use crate::views::{detail_view, history_view, Badge, DetailView, HistoryEntry, Notice};

/// Pending save awaiting an editor name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDialog {
    /// Elements that differ from the pre-edit snapshot
    pub changes: Content,

    /// Prefilled from the last name used
    pub editor_name: String,

    pub kind: ReleaseKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Viewing,
    Editing { dirty: bool },
    ShowingSaveDialog(SaveDialog),
    Saving,
}

impl ControllerState {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerState::Viewing => "viewing",
            ControllerState::Editing { .. } => "editing",
            ControllerState::ShowingSaveDialog(_) => "showing the save dialog",
            ControllerState::Saving => "saving",
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, ControllerState::Editing { .. })
    }
}

pub struct EditController<S: EditableSurface, V: VersionStore> {
    surface: S,

    /// `None` in local mode
    store: Option<V>,

    prefs: Box<dyn PreferenceStore>,
    session: Session,
    state: ControllerState,
    snapshot: SnapshotStore,
    notices: VecDeque<Notice>,
}

impl<S: EditableSurface, V: VersionStore> EditController<S, V> {
    /// Attach to the page at `path`. Call [`load`](Self::load) before use.
    pub fn new(surface: S, store: Option<V>, prefs: Box<dyn PreferenceStore>, path: &str) -> Self {
        Self {
            surface,
            store,
            prefs,
            session: Session::new(path),
            state: ControllerState::Viewing,
            snapshot: SnapshotStore::new(),
            notices: VecDeque::new(),
        }
    }

    /// Load the page history and render the current version
    pub async fn load(&mut self) -> EditorResult<()> {
        self.refresh().await?;
        tracing::info!(
            page = %self.session.page(),
            versions = self.session.history().len(),
            local = self.is_local(),
            "page loaded"
        );
        Ok(())
    }

    /// Re-list the page's versions and re-apply them to the surface.
    ///
    /// On failure the cached history is kept and an error notice is queued.
    pub async fn refresh(&mut self) -> EditorResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let listed = store.list_versions(self.session.page()).await;
        match listed {
            Ok(records) => {
                self.session.set_history(records);
                let content = materialize(self.session.history());
                let report = apply_content(&mut self.surface, &content);
                if !report.is_complete() {
                    tracing::debug!(skipped = report.skipped.len(), "some stored selectors did not resolve");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(page = %self.session.page(), "failed to load versions: {}", e);
                self.notify(Notice::error(format!("Failed to load versions: {}", e)));
                Err(e.into())
            }
        }
    }

    /// Edit button: start editing, or finish and open the save dialog
    pub async fn toggle(&mut self) -> EditorResult<()> {
        match self.state {
            ControllerState::Viewing => {
                self.surface.set_editing(true);
                self.snapshot.begin_tracking(&self.surface);
                self.state = ControllerState::Editing { dirty: false };
                self.notify(Notice::success("Edit mode ON - Click any text to edit"));
                Ok(())
            }
            ControllerState::Editing { .. } => {
                let changes = self.snapshot.compute_changes(&self.surface);
                if changes.is_empty() {
                    self.return_to_viewing(false).await;
                    self.notify(Notice::success("No changes to save"));
                    return Ok(());
                }

                tracing::debug!(changed = changes.len(), "opening save dialog");
                self.state = ControllerState::ShowingSaveDialog(SaveDialog {
                    changes,
                    editor_name: self.prefs.editor_name().unwrap_or_default(),
                    kind: ReleaseKind::default(),
                });
                Ok(())
            }
            _ => Err(EditorError::invalid_transition(self.state.name(), "toggle edit mode")),
        }
    }

    /// Save the dialog's change set as a new version.
    ///
    /// Returns the stored record, or `None` in local mode. If the insert
    /// fails the controller goes back to `Editing { dirty: true }` with the
    /// page edits intact and the error is returned.
    pub async fn confirm(&mut self, name: &str, kind: ReleaseKind) -> EditorResult<Option<VersionRecord>> {
        let ControllerState::ShowingSaveDialog(dialog) = &self.state else {
            return Err(EditorError::invalid_transition(self.state.name(), "confirm a save"));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }

        let changes = dialog.changes.clone();
        self.remember_name(name);
        let next = self.session.current_version().bump(kind);
        self.state = ControllerState::Saving;

        let Some(store) = &self.store else {
            self.session.advance(next);
            self.return_to_viewing(false).await;
            self.notify(Notice::success(format!("Saved as {}!", next)));
            return Ok(None);
        };

        let version = NewVersion::new(self.session.page().as_str(), changes, next, name);
        let inserted = store.insert_version(version).await;
        match inserted {
            Ok(record) => {
                tracing::info!(page = %self.session.page(), version = %next, "saved");
                self.session.advance(next);
                self.return_to_viewing(true).await;
                self.notify(Notice::success(format!("Saved as {}!", next)));
                Ok(Some(record))
            }
            Err(e) => {
                tracing::warn!(page = %self.session.page(), "save failed: {}", e);
                self.state = ControllerState::Editing { dirty: true };
                self.surface.set_editing(true);
                self.notify(Notice::error(format!("Save failed! {}", e)));
                Err(e.into())
            }
        }
    }

    /// Close the save dialog and keep editing
    pub fn cancel_dialog(&mut self) -> EditorResult<()> {
        match self.state {
            ControllerState::ShowingSaveDialog(_) => {
                self.state = ControllerState::Editing { dirty: true };
                Ok(())
            }
            _ => Err(EditorError::invalid_transition(self.state.name(), "cancel the save dialog")),
        }
    }

    /// Throw away unsaved edits: restore the page source, then the current version
    pub async fn cancel_edits(&mut self) -> EditorResult<()> {
        if !self.state.is_editing() {
            return Err(EditorError::invalid_transition(self.state.name(), "cancel edits"));
        }

        self.surface.reload()?;
        let content = materialize(self.session.history());
        apply_content(&mut self.surface, &content);
        self.return_to_viewing(false).await;
        Ok(())
    }

    /// The visitor typed into an editable element
    pub fn note_input(&mut self) {
        if let ControllerState::Editing { dirty } = &mut self.state {
            *dirty = true;
        }
    }

    /// React to an insert pushed by the realtime feed
    pub async fn handle_remote_insert(&mut self, record: &VersionRecord) {
        if record.page != self.session.page().as_str() {
            return;
        }
        let author = record
            .updated_by
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "someone".to_string());

        if self.state == ControllerState::Viewing {
            if self.refresh().await.is_ok() {
                self.notify(Notice::success(format!("Page updated by {}", author)));
            }
        } else {
            tracing::debug!(id = record.id, "remote insert deferred until editing ends");
            self.session.defer_remote(author);
        }
    }

    /// Re-publish an older version's content as a new version
    pub async fn revert(&mut self, version_id: i64, name: &str) -> EditorResult<VersionRecord> {
        if self.state != ControllerState::Viewing {
            return Err(EditorError::invalid_transition(self.state.name(), "revert"));
        }
        let target = self
            .session
            .find(version_id)
            .cloned()
            .ok_or(EditorError::UnknownVersion(version_id))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyName);
        }
        self.remember_name(name);

        let Some(store) = &self.store else {
            return Err(StoreError::NotConfigured.into());
        };

        let label = target.version();
        let version = NewVersion::new(
            self.session.page().as_str(),
            target.content.clone(),
            self.session.current_version().bump(ReleaseKind::Minor),
            format!("{} (reverted to {})", name, label),
        );
        let inserted = store.insert_version(version).await;
        match inserted {
            Ok(record) => {
                tracing::info!(page = %self.session.page(), target = %label, "reverted");
                // A failed reload has already queued its own notice
                let _ = self.refresh().await;
                self.notify(Notice::success(format!("Reverted to {}", label)));
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(page = %self.session.page(), "revert failed: {}", e);
                self.notify(Notice::error("Revert failed!"));
                Err(e.into())
            }
        }
    }

    /// Attach to another page, dropping all per-page state
    pub async fn navigate(&mut self, path: &str, surface: S) -> EditorResult<()> {
        self.surface = surface;
        self.session.navigate(path);
        self.snapshot.clear();
        self.state = ControllerState::Viewing;
        self.load().await
    }

    /// Realtime feed for the current page; `None` in local mode
    pub async fn subscribe(&self) -> EditorResult<Option<Subscription>> {
        match &self.store {
            Some(store) => Ok(Some(store.subscribe(self.session.page()).await?)),
            None => Ok(None),
        }
    }

    pub fn badge(&self, now: DateTime<Utc>) -> Badge {
        if self.is_local() {
            Badge::local_mode()
        } else {
            Badge::for_history(self.session.history(), now)
        }
    }

    pub fn history(&self, now: DateTime<Utc>) -> Vec<HistoryEntry> {
        history_view(self.session.history(), now)
    }

    pub fn detail(&self, version_id: i64, now: DateTime<Utc>) -> EditorResult<DetailView> {
        self.session
            .find(version_id)
            .map(|record| detail_view(record, now))
            .ok_or(EditorError::UnknownVersion(version_id))
    }

    /// Take every queued notice, oldest first
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for the host to forward visitor input
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_local(&self) -> bool {
        self.store.is_none()
    }

    fn notify(&mut self, notice: Notice) {
        tracing::debug!(kind = ?notice.kind, "{}", notice.message);
        self.notices.push_back(notice);
    }

    fn remember_name(&self, name: &str) {
        if let Err(e) = self.prefs.set_editor_name(name) {
            tracing::warn!("could not persist editor name: {}", e);
        }
    }

    async fn return_to_viewing(&mut self, reload: bool) {
        self.state = ControllerState::Viewing;
        self.surface.set_editing(false);
        self.snapshot.clear();

        let deferred = self.session.take_deferred();
        if !reload && deferred.is_none() {
            return;
        }
        let refreshed = self.refresh().await.is_ok();
        if let (true, Some(author)) = (refreshed, deferred) {
            self.notify(Notice::success(format!("Page updated by {}", author)));
        }
    }
}
