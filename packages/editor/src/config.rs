use serde::{Deserialize, Serialize};

/// Elements a visitor may edit, unless they sit inside a UI container
pub const DEFAULT_EDITABLE: &[&str] = &[
    "h1",
    "h2",
    "h3",
    ".tagline",
    ".subtitle",
    ".card h2",
    ".card h3",
    ".card p",
    "p",
    "li",
    "td",
    "th",
    ".hero .stat .num",
    ".hero .stat .label",
];

/// Overlay chrome; nothing inside these is ever editable or exported
pub const DEFAULT_UI_CONTAINERS: &[&str] = &[
    "#beacon-edit-ui",
    "#beacon-version-badge",
    "#beacon-history-panel",
    "#beacon-format-toolbar",
    "#beacon-notification",
    "#beacon-publish-widget",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default = "default_editable")]
    pub editable: Vec<String>,

    #[serde(default = "default_ui_containers")]
    pub ui_containers: Vec<String>,

    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
}

fn default_editable() -> Vec<String> {
    DEFAULT_EDITABLE.iter().map(|s| s.to_string()).collect()
}

fn default_ui_containers() -> Vec<String> {
    DEFAULT_UI_CONTAINERS.iter().map(|s| s.to_string()).collect()
}

fn default_reserved_prefix() -> String {
    beacon_dom::RESERVED_CLASS_PREFIX.to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            editable: default_editable(),
            ui_containers: default_ui_containers(),
            reserved_prefix: default_reserved_prefix(),
        }
    }
}

impl EditorConfig {
    /// Allow-list as one selector group
    pub fn editable_selector(&self) -> String {
        self.editable.join(", ")
    }

    pub fn ui_container_selector(&self) -> String {
        self.ui_containers.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "editable": ["h1", ".lead"] }"#).unwrap();
        assert_eq!(config.editable_selector(), "h1, .lead");
        assert_eq!(config.ui_containers.len(), 6);
        assert_eq!(config.reserved_prefix, "beacon-");
    }
}
