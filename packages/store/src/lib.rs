//! # Beacon Store
//!
//! Version records and the clients that read and write them.
//!
//! ```text
//!                 VersionStore (async trait)
//!          ┌──────────────┼───────────────┐
//!     MemoryStore      RestStore ──── realtime (websocket)
//!   (broadcast feed)  (PostgREST)     (Phoenix channel)
//! ```

mod config;
mod error;
mod memory;
mod page;
pub mod realtime;
mod record;
mod rest;
mod store;

pub use config::{StoreConfig, DEFAULT_TABLE, PLACEHOLDER_KEY, PLACEHOLDER_URL};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use page::PageId;
pub use record::{sort_newest_first, Content, NewVersion, ReleaseKind, VersionNumber, VersionRecord};
pub use rest::RestStore;
pub use store::{Subscription, VersionStore};
