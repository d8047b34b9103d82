//! # Version Store
//!
//! The seam between the editor and whatever persists versions. Everything
//! the controller needs from the database goes through [`VersionStore`].

use async_trait::async_trait;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::Stream;

use crate::error::StoreResult;
use crate::page::PageId;
use crate::record::{NewVersion, VersionRecord};

#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Records for `page`, newest first
    async fn list_versions(&self, page: &PageId) -> StoreResult<Vec<VersionRecord>>;

    /// Records for every page, newest first
    async fn list_all(&self) -> StoreResult<Vec<VersionRecord>>;

    /// Insert one record and return it as stored
    async fn insert_version(&self, version: NewVersion) -> StoreResult<VersionRecord>;

    /// Live feed of inserts for `page`. Best effort, nothing is replayed.
    async fn subscribe(&self, page: &PageId) -> StoreResult<Subscription>;
}

#[async_trait]
impl<S: VersionStore + ?Sized> VersionStore for Arc<S> {
    async fn list_versions(&self, page: &PageId) -> StoreResult<Vec<VersionRecord>> {
        (**self).list_versions(page).await
    }

    async fn list_all(&self) -> StoreResult<Vec<VersionRecord>> {
        (**self).list_all().await
    }

    async fn insert_version(&self, version: NewVersion) -> StoreResult<VersionRecord> {
        (**self).insert_version(version).await
    }

    async fn subscribe(&self, page: &PageId) -> StoreResult<Subscription> {
        (**self).subscribe(page).await
    }
}

/// Receiving end of a store subscription.
///
/// Dropping it stops the background task feeding it.
pub struct Subscription {
    receiver: mpsc::Receiver<VersionRecord>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(receiver: mpsc::Receiver<VersionRecord>, task: Option<JoinHandle<()>>) -> Self {
        Self { receiver, task }
    }

    /// Wait for the next insert; `None` once the feed has closed
    pub async fn next(&mut self) -> Option<VersionRecord> {
        self.receiver.recv().await
    }

    /// Next insert if one is already queued
    pub fn try_next(&mut self) -> Option<VersionRecord> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = VersionRecord;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("has_task", &self.task.is_some())
            .finish()
    }
}
