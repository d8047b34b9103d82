//! PostgREST client for the hosted `page_versions` table.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::page::PageId;
use crate::realtime;
use crate::record::{sort_newest_first, NewVersion, VersionRecord};
use crate::store::{Subscription, VersionStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RestStore {
    client: Client,
    endpoint: Url,
    key: String,
    config: StoreConfig,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let endpoint = config.rest_endpoint()?;
        let key = config
            .key
            .as_deref()
            .map(str::trim)
            .ok_or(StoreError::NotConfigured)?
            .to_string();
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            key,
            config: config.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    async fn fetch(&self, page: Option<&PageId>) -> StoreResult<Vec<VersionRecord>> {
        let mut query = vec![("select", "*".to_string())];
        if let Some(page) = page {
            query.push(("page", format!("eq.{}", page)));
        }
        query.push(("order", "updated_at.desc".to_string()));

        let response = self
            .authorized(self.client.get(self.endpoint.clone()))
            .query(&query)
            .send()
            .await?;
        let body = checked(response).await?;

        let mut records: Vec<VersionRecord> = serde_json::from_str(&body)?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

async fn checked(response: Response) -> StoreResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl VersionStore for RestStore {
    async fn list_versions(&self, page: &PageId) -> StoreResult<Vec<VersionRecord>> {
        let records = self.fetch(Some(page)).await?;
        tracing::debug!(page = %page, count = records.len(), "loaded versions");
        Ok(records)
    }

    async fn list_all(&self) -> StoreResult<Vec<VersionRecord>> {
        self.fetch(None).await
    }

    async fn insert_version(&self, version: NewVersion) -> StoreResult<VersionRecord> {
        let response = self
            .authorized(self.client.post(self.endpoint.clone()))
            .header("Prefer", "return=representation")
            .json(&version)
            .send()
            .await?;
        let body = checked(response).await?;

        let mut inserted: Vec<VersionRecord> = serde_json::from_str(&body)?;
        if inserted.is_empty() {
            return Err(StoreError::EmptyInsert);
        }
        let record = inserted.remove(0);
        tracing::info!(id = record.id, page = %record.page, version = %record.version(), "inserted version");
        Ok(record)
    }

    async fn subscribe(&self, page: &PageId) -> StoreResult<Subscription> {
        realtime::subscribe(&self.config, page).await
    }
}
