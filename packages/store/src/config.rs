use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{StoreError, StoreResult};

pub const DEFAULT_TABLE: &str = "page_versions";

/// Values shipped in starter configs; treated as "not configured"
pub const PLACEHOLDER_URL: &str = "YOUR_SUPABASE_URL";
pub const PLACEHOLDER_KEY: &str = "YOUR_SUPABASE_ANON_KEY";

/// Connection settings for the hosted version store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: default_table(),
        }
    }
}

/// Parse `url` as a join base; a missing trailing slash would make
/// `Url::join` drop the last path segment
fn base_url(url: &str) -> StoreResult<Url> {
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{}/", url))?)
    }
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            key: Some(key.into()),
            table: default_table(),
        }
    }

    /// False when the URL or key is missing, blank or still a placeholder
    pub fn is_configured(&self) -> bool {
        let usable = |value: &Option<String>, placeholder: &str| {
            value
                .as_deref()
                .map(str::trim)
                .is_some_and(|v| !v.is_empty() && v != placeholder)
        };
        usable(&self.url, PLACEHOLDER_URL) && usable(&self.key, PLACEHOLDER_KEY)
    }

    pub(crate) fn credentials(&self) -> StoreResult<(Url, &str)> {
        if !self.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        let (Some(url), Some(key)) = (self.url.as_deref(), self.key.as_deref()) else {
            return Err(StoreError::NotConfigured);
        };
        Ok((base_url(url.trim())?, key.trim()))
    }

    /// `{url}/rest/v1/{table}`, keeping any path prefix of `url`
    pub fn rest_endpoint(&self) -> StoreResult<Url> {
        let (base, _) = self.credentials()?;
        Ok(base.join(&format!("rest/v1/{}", self.table))?)
    }

    /// `ws(s)://{host}/realtime/v1/websocket?apikey=..&vsn=1.0.0`
    pub fn realtime_endpoint(&self) -> StoreResult<Url> {
        let (base, key) = self.credentials()?;
        let mut url = base.join("realtime/v1/websocket")?;

        let scheme = if url.scheme() == "http" { "ws" } else { "wss" };
        url.set_scheme(scheme)
            .map_err(|_| StoreError::realtime(format!("cannot use {} for realtime", base)))?;
        url.query_pairs_mut()
            .append_pair("apikey", key)
            .append_pair("vsn", "1.0.0");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_local_mode() {
        assert!(!StoreConfig::default().is_configured());
        assert!(!StoreConfig::new(PLACEHOLDER_URL, "k").is_configured());
        assert!(!StoreConfig::new("https://x.supabase.co", PLACEHOLDER_KEY).is_configured());
        assert!(!StoreConfig::new("https://x.supabase.co", "  ").is_configured());
        assert!(StoreConfig::new("https://x.supabase.co", "anon").is_configured());
    }

    #[test]
    fn test_endpoints() {
        let config = StoreConfig::new("https://x.supabase.co", "anon");
        assert_eq!(
            config.rest_endpoint().unwrap().as_str(),
            "https://x.supabase.co/rest/v1/page_versions"
        );
        assert_eq!(
            config.realtime_endpoint().unwrap().as_str(),
            "wss://x.supabase.co/realtime/v1/websocket?apikey=anon&vsn=1.0.0"
        );
    }

    #[test]
    fn test_endpoints_keep_path_prefix() {
        for url in ["https://proxy.example.com/supabase", "https://proxy.example.com/supabase/"] {
            let config = StoreConfig::new(url, "anon");
            assert_eq!(
                config.rest_endpoint().unwrap().as_str(),
                "https://proxy.example.com/supabase/rest/v1/page_versions"
            );
            assert!(config
                .realtime_endpoint()
                .unwrap()
                .as_str()
                .starts_with("wss://proxy.example.com/supabase/realtime/v1/websocket?"));
        }
    }

    #[test]
    fn test_local_http_maps_to_ws() {
        let config = StoreConfig::new("http://127.0.0.1:54321", "anon");
        assert!(config.realtime_endpoint().unwrap().as_str().starts_with("ws://127.0.0.1:54321/"));
    }

    #[test]
    fn test_unconfigured_endpoint_errors() {
        assert!(matches!(
            StoreConfig::default().rest_endpoint(),
            Err(StoreError::NotConfigured)
        ));
    }
}
