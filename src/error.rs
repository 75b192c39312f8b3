use thiserror::Error;

// One variant per failure kind so callers can branch on the kind
// instead of matching message text.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid format: {0}")]
    Format(String),

    #[error("size limit exceeded: {0}")]
    SizeLimit(String),

    #[error("out of range: {0}")]
    Range(String),

    #[error("missing required field: {0}")]
    MissingRequiredField(String),

    #[error("invalid attribute schema: {0}")]
    Schema(String),

    #[error("base64 decode failed: {0}")]
    Decode(String),

    #[error("transport failure: {0}")]
    Transport(String),
}
