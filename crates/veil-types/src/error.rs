use thiserror::Error;

/// Errors from the settings layer.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("unknown toggle key: {0}")]
    UnknownKey(String),

    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    #[error("non-boolean value for key {key}: {value}")]
    NonBooleanValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, SettingsError>;
