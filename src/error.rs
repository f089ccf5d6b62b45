// Error types surfaced by the streaming reader boundary
use thiserror::Error;

/// Failure of one streaming reader. One failed series never aborts the
/// others; the loader logs these and lays out whatever did arrive.
#[derive(Debug, Clone, Error)]
pub enum ReadError {
    #[error("backend request failed for {series}: {reason}")]
    Backend { series: String, reason: String },
    #[error("malformed sample payload for {series}: {reason}")]
    Malformed { series: String, reason: String },
}

impl ReadError {
    pub fn series(&self) -> &str {
        match self {
            ReadError::Backend { series, .. } => series,
            ReadError::Malformed { series, .. } => series,
        }
    }
}
