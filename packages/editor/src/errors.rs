//! Error types for the editor

use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("An editor name is required")]
    EmptyName,

    #[error("Version {0} is not in the loaded history")]
    UnknownVersion(i64),

    #[error("Store error: {0}")]
    Store(#[from] beacon_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub fn invalid_transition(state: &'static str, action: &'static str) -> Self {
        Self::InvalidTransition { state, action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EditorError::invalid_transition("saving", "revert");
        assert_eq!(err.to_string(), "Cannot revert while saving");

        let err: EditorError = beacon_store::StoreError::NotConfigured.into();
        assert!(matches!(err, EditorError::Store(_)));
    }
}
