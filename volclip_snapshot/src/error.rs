use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("clipboard payload is empty")]
    Empty,

    #[error("clipboard payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("clipboard payload must be a JSON array of volumes, found {0}")]
    NotAnArray(&'static str),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
