use thiserror::Error;

/// Errors raised while detecting duplicate issues.
///
/// Every variant is surfaced to the process boundary; none are retried.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Missing, invalid or expired GitHub credential
    #[error("GitHub authentication failed: {0}")]
    Authentication(String),
    /// Transport failure or timeout
    #[error("Network error: {0}")]
    Network(String),
    /// Nothing left to compare the target issue against
    #[error("No issues found in {repository} to compare against")]
    EmptyCorpus { repository: String },
    /// GitHub answered with an unexpected status
    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid issue event: {0}")]
    InvalidEvent(String),
    #[error("Invalid response from GitHub API: {0}")]
    InvalidResponse(String),
}

impl DetectorError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, DetectorError::Authentication(_))
    }
}

impl From<reqwest::Error> for DetectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DetectorError::InvalidResponse(err.to_string())
        } else {
            DetectorError::Network(err.to_string())
        }
    }
}
