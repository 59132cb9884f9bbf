use thiserror::Error;

/// Errors from the settings store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),

    #[error("settings store quota exceeded")]
    QuotaExceeded,

    #[error("malformed stored value for {key}: {reason}")]
    Malformed { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;
