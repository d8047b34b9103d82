//! # Beacon Editor
//!
//! In-page editing engine: turns a rendered page into an editable surface,
//! tracks what a visitor changed and records each save as a page version.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ surface: EditableSurface capability         │
//! │  (HtmlSurface over beacon-dom)              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ controller: edit-mode state machine         │
//! │  - snapshot baseline + change set           │
//! │  - save / revert through VersionStore       │
//! │  - realtime inserts, deferred while editing │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ views: badge, history, detail, notices      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use beacon_editor::{EditController, EditorConfig, HtmlSurface, MemoryPreferences};
//! use beacon_store::{MemoryStore, ReleaseKind};
//!
//! let surface = HtmlSurface::load("site/index.html", EditorConfig::default())?;
//! let mut controller = EditController::new(
//!     surface,
//!     Some(MemoryStore::new()),
//!     Box::new(MemoryPreferences::new()),
//!     "/index.html",
//! );
//! controller.load().await?;
//!
//! controller.toggle().await?;
//! controller.surface_mut().edit("h1", "New headline");
//! controller.toggle().await?;
//! controller.confirm("ada", ReleaseKind::Minor).await?;
//! ```

mod apply;
mod config;
mod controller;
mod errors;
mod html_surface;
mod prefs;
mod session;
mod snapshot;
mod surface;
mod views;

pub use apply::{apply_content, materialize, ApplyReport};
pub use config::{EditorConfig, DEFAULT_EDITABLE, DEFAULT_UI_CONTAINERS};
pub use controller::{ControllerState, EditController, SaveDialog};
pub use errors::{EditorError, EditorResult};
pub use html_surface::HtmlSurface;
pub use prefs::{FilePreferences, MemoryPreferences, PreferenceStore, EDITOR_NAME_KEY};
pub use session::Session;
pub use snapshot::SnapshotStore;
pub use surface::EditableSurface;
pub use views::{
    detail_view, history_view, preview_text, relative_time, Badge, ChangePreview, DetailView,
    HistoryEntry, Notice, NoticeKind, PREVIEW_CHARS,
};
