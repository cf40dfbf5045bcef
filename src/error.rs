use thiserror::Error;

/// Every failure the ATM core can report.
///
/// The business-rule variants carry the caller-visible message as their
/// `Display` text, so `err.to_string()` is what an ATM screen would show.
#[derive(Error, Debug)]
pub enum AtmError {
    /// Malformed amount (non-positive, wrong multiple).
    #[error("{0}")]
    InvalidAmount(String),
    #[error("{0}")]
    InsufficientFunds(String),
    /// Per-transaction cap or per-card daily cap exceeded.
    #[error("{0}")]
    LimitExceeded(String),
    /// PIN mismatch, unknown card, blocked card or missing session.
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    InvalidPinFormat(String),
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AtmError>;
