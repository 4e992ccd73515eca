use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("tracker api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
