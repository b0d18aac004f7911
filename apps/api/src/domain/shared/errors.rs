use thiserror::Error;

/// Failure kinds surfaced by the submission and moderation workflows.
///
/// Every variant maps onto exactly one HTTP status at the presentation layer,
/// so the client-visible error is decided here and never re-classified later.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing photo file")]
    MissingFile,
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Rate limit exceeded")]
    TooManyRequests,
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}
