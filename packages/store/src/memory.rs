//! In-process version store.
//!
//! Backs tests and local embedding. Inserts fan out to subscribers through a
//! broadcast channel, the same way a realtime feed would deliver them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use tokio::sync::{broadcast, mpsc};

use crate::error::{StoreError, StoreResult};
use crate::page::PageId;
use crate::record::{sort_newest_first, NewVersion, VersionRecord};
use crate::store::{Subscription, VersionStore};

const CHANNEL_CAPACITY: usize = 64;

pub struct MemoryStore {
    state: Mutex<State>,
    events: broadcast::Sender<VersionRecord>,
}

#[derive(Default)]
struct State {
    records: Vec<VersionRecord>,
    next_id: i64,
    last_timestamp: Option<DateTime<Utc>>,
    failing: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
            events,
        }
    }

    /// Store pre-populated with existing rows (kept as given, not broadcast)
    pub fn with_records(records: impl IntoIterator<Item = VersionRecord>) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            for record in records {
                state.next_id = state.next_id.max(record.id + 1);
                state.last_timestamp = state.last_timestamp.max(Some(record.updated_at));
                state.records.push(record);
            }
        }
        store
    }

    /// Make every following insert fail with `reason` (`None` heals the store)
    pub fn set_failing(&self, reason: Option<&str>) {
        self.lock().failing = reason.map(str::to_string);
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock leaves the vector intact
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> StoreResult<()> {
        match &self.lock().failing {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn list_versions(&self, page: &PageId) -> StoreResult<Vec<VersionRecord>> {
        self.check_available()?;
        let mut records: Vec<VersionRecord> = self
            .lock()
            .records
            .iter()
            .filter(|r| r.page == page.as_str())
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn list_all(&self) -> StoreResult<Vec<VersionRecord>> {
        self.check_available()?;
        let mut records = self.lock().records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn insert_version(&self, version: NewVersion) -> StoreResult<VersionRecord> {
        self.check_available()?;

        let record = {
            let mut state = self.lock();
            // Timestamps strictly increase so insertion order is the listing order
            let now = Utc::now();
            let updated_at = match state.last_timestamp {
                Some(last) if now <= last => last + Duration::microseconds(1),
                _ => now,
            };

            let record = VersionRecord {
                id: state.next_id,
                page: version.page,
                content: version.content,
                version_major: Some(version.version_major),
                version_minor: Some(version.version_minor),
                updated_by: Some(version.updated_by),
                updated_at,
            };
            state.next_id += 1;
            state.last_timestamp = Some(updated_at);
            state.records.push(record.clone());
            record
        };

        tracing::debug!(id = record.id, page = %record.page, "memory store insert");
        // No receivers is fine
        let _ = self.events.send(record.clone());
        Ok(record)
    }

    async fn subscribe(&self, page: &PageId) -> StoreResult<Subscription> {
        let mut events = self.events.subscribe();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let page = page.clone();

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(record) if record.page == page.as_str() => {
                        if tx.send(record).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscription lagged, dropping events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(rx, Some(task)))
    }
}
