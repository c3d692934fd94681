#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed {event} frame: expected {expected} bytes, got {actual}")]
    MalformedEventFrame {
        event: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode {event} payload: {reason}")]
    Decode { event: String, reason: String },

    #[error("invalid program id {value}: {reason}")]
    InvalidProgramId { value: String, reason: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
