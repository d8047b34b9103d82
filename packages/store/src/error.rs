use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Version store is not configured (set supabaseUrl and supabaseKey)")]
    NotConfigured,

    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store returned no record for the insert")]
    EmptyInsert,

    #[error("Realtime error: {0}")]
    Realtime(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn realtime(message: impl ToString) -> Self {
        Self::Realtime(message.to_string())
    }
}
