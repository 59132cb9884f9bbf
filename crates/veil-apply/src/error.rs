use thiserror::Error;

/// Errors from a visibility applier.
///
/// Absent target elements are never an error; this exists for the cases
/// where the document boundary itself gives out.
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("document unavailable: {0}")]
    Document(String),
}

pub type Result<T> = std::result::Result<T, ApplyError>;
