//! Client-side preferences (the last editor name used)

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::EditorResult;

/// Key the editor name is stored under
pub const EDITOR_NAME_KEY: &str = "beacon-editor";

pub trait PreferenceStore: Send + Sync {
    fn editor_name(&self) -> Option<String>;

    fn set_editor_name(&self, name: &str) -> EditorResult<()>;
}

/// Preferences held for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    name: Mutex<Option<String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Mutex::new(Some(name.into())),
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn editor_name(&self) -> Option<String> {
        self.name.lock().ok().and_then(|name| name.clone())
    }

    fn set_editor_name(&self, name: &str) -> EditorResult<()> {
        if let Ok(mut slot) = self.name.lock() {
            *slot = Some(name.to_string());
        }
        Ok(())
    }
}

/// Preferences in a JSON object file; other keys in the file are preserved
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> EditorResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl PreferenceStore for FilePreferences {
    fn editor_name(&self) -> Option<String> {
        match self.read() {
            Ok(map) => map.get(EDITOR_NAME_KEY)?.as_str().map(str::to_string),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "unreadable preferences: {}", e);
                None
            }
        }
    }

    fn set_editor_name(&self, name: &str) -> EditorResult<()> {
        let mut map = self.read().unwrap_or_default();
        map.insert(EDITOR_NAME_KEY.to_string(), Value::String(name.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        Ok(())
    }
}
