use thiserror::Error;

/// Errors that cross the analysis boundary.
///
/// Only `InputRejected` is produced by the orchestration itself; every fault
/// downstream of input validation is absorbed by the fallback policy.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Nothing usable to analyze (no text, and OCR yielded nothing readable)
    #[error("{0}")]
    InputRejected(String),

    /// Failed to read an input file
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// The configured provider could not be set up
    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderSetupError),
}

/// Reasons a reasoning service client could not be constructed.
#[derive(Error, Debug)]
pub enum ProviderSetupError {
    /// No API key in config or environment
    #[error("{0} not found in config or environment")]
    MissingCredential(String),

    #[error("Provider '{0}' is not enabled in configuration")]
    Disabled(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failures of the reasoning service call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Network or authentication failure, or an unusable reply
    #[error("Reasoning service unavailable: {0}")]
    Unavailable(String),

    /// The request did not complete within the configured timeout
    #[error("Reasoning service timed out")]
    Timeout,

    /// The service refused the request (quota exhausted, unknown model, bad request)
    #[error("Reasoning service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ServiceError {
    /// Classify an HTTP error status returned by the service.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ServiceError::Unavailable(format!("authentication failed ({status})")),
            400..=499 => ServiceError::Rejected { status, message },
            _ => ServiceError::Unavailable(format!("HTTP {status}: {message}")),
        }
    }
}

// Request URLs carry the Google API key, so they are stripped from the message
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Unavailable(err.without_url().to_string())
        }
    }
}

/// The reply could not be turned into an analysis result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed response: {0}")]
pub struct MalformedResponse(pub String);

/// OCR collaborator failures. The orchestrator treats all of them as "no text".
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR is not configured: {0}")]
    NotConfigured(String),

    #[error("OCR request failed: {0}")]
    Request(reqwest::Error),

    #[error("OCR service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("No text found in image")]
    NoText,
}

impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Request(err.without_url())
    }
}
