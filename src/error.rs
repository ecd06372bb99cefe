use thiserror::Error;

/// Errors surfaced by the EBITDA ledger core.
///
/// A missing payment or financial entry row is never an error: it computes as zero.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller supplied malformed input (bad date, negative amount, unparsable decimal)
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage or connectivity failure, passed through unchanged
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    /// True for errors that are the caller's fault and must not be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, LedgerError::Validation(_) | LedgerError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
