use std::fmt;

use thiserror::Error;

/// Terminal failures of the news read-through path.
///
/// Per-window upstream failures are absorbed inside the fetch pass and never
/// surface here; quota exhaustion travels as a [`crate::NewsOutcome`] variant
/// rather than an error.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No company found for ticker: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}

/// Failure of a single upstream search call.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    /// HTTP status, when the provider answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl UpstreamError {
    /// Whether this error signals that the provider quota is spent.
    ///
    /// Providers disagree on the signal: some answer 429, others answer
    /// 400/403 with a quota message in the payload. Both are treated as
    /// equally valid triggers.
    pub fn quota_exhausted(&self) -> bool {
        match self.status {
            Some(429) => true,
            Some(400) | Some(403) => {
                let message = self.message.to_lowercase();
                message.contains("limit") || message.contains("quota")
            }
            _ => false,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for UpstreamError {}
