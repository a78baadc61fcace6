pub type StreamResult<T> = Result<T, StreamError>;

/// Construction-time failures. Runtime operations on a valid streamer are total.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    #[error("grid size must be positive and finite, got {0}")]
    InvalidGridSize(f32),

    #[error("invalid streamer config: {0}")]
    InvalidConfig(String),
}
