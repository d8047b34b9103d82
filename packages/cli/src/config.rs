use anyhow::{anyhow, Result};
use beacon_editor::{EditorConfig, FilePreferences};
use beacon_store::{RestStore, StoreConfig, DEFAULT_TABLE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "beacon.config.json";
pub const DEFAULT_PREFERENCES_PATH: &str = ".beacon/preferences.json";

pub const URL_ENV: &str = "BEACON_SUPABASE_URL";
pub const KEY_ENV: &str = "BEACON_SUPABASE_KEY";

/// Beacon configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project URL of the hosted version store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,

    /// Anonymous API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    /// Which elements are editable and which belong to the overlay
    #[serde(default)]
    pub editor: EditorConfig,

    /// Where the last-used editor name is remembered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences_path: Option<String>,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            table: default_table(),
            editor: EditorConfig::default(),
            preferences_path: None,
        }
    }
}

impl Config {
    /// Load config from a directory, then apply environment overrides
    pub fn load(cwd: &str) -> Result<Self> {
        let mut config = Self::load_file(cwd)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn load_file(cwd: &str) -> Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow!("invalid {}: {}", config_path.display(), e))
        } else {
            Ok(Config::default())
        }
    }

    /// Non-empty variables win over the file
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(URL_ENV) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = non_empty(KEY_ENV) {
            self.supabase_key = Some(key);
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            url: self.supabase_url.clone(),
            key: self.supabase_key.clone(),
            table: self.table.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.store_config().is_configured()
    }

    /// REST client for the configured store, or an error in local mode
    pub fn rest_store(&self) -> Result<RestStore> {
        let store_config = self.store_config();
        if !store_config.is_configured() {
            return Err(anyhow!(
                "Supabase is not configured. Set supabaseUrl and supabaseKey in {} or {} / {}",
                DEFAULT_CONFIG_NAME,
                URL_ENV,
                KEY_ENV
            ));
        }
        Ok(RestStore::new(&store_config)?)
    }

    pub fn preferences(&self, cwd: &str) -> FilePreferences {
        let relative = self
            .preferences_path
            .as_deref()
            .unwrap_or(DEFAULT_PREFERENCES_PATH);
        FilePreferences::new(PathBuf::from(cwd).join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_store::{PLACEHOLDER_KEY, PLACEHOLDER_URL};

    #[test]
    fn test_parse_config() {
        let json = r##"{
            "supabaseUrl": "https://abc.supabase.co",
            "supabaseKey": "anon",
            "editor": { "editable": ["h1", ".lead"], "uiContainers": ["#toolbar"] },
            "preferencesPath": "prefs.json"
        }"##;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.supabase_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.table, "page_versions");
        assert_eq!(config.editor.editable, vec!["h1", ".lead"]);
        assert_eq!(config.editor.ui_containers, vec!["#toolbar"]);
        assert_eq!(config.editor.reserved_prefix, "beacon-");
        assert!(config.is_configured());
    }

    #[test]
    fn test_default_config_is_local() {
        let config = Config::default();
        assert!(!config.is_configured());
        assert!(config.rest_store().is_err());
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_placeholders_are_local() {
        let config = Config {
            supabase_url: Some(PLACEHOLDER_URL.into()),
            supabase_key: Some(PLACEHOLDER_KEY.into()),
            ..Config::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config {
            supabase_url: Some(PLACEHOLDER_URL.into()),
            supabase_key: Some("file-key".into()),
            ..Config::default()
        };
        config.apply_env(|name| match name {
            URL_ENV => Some("https://env.supabase.co".to_string()),
            KEY_ENV => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.supabase_url.as_deref(), Some("https://env.supabase.co"));
        assert_eq!(config.supabase_key.as_deref(), Some("file-key"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_file(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_preferences_path_is_relative_to_cwd() {
        let config = Config::default();
        let prefs = config.preferences("/srv/site");
        assert_eq!(prefs.path(), std::path::Path::new("/srv/site/.beacon/preferences.json"));
    }
}
