use thiserror::Error;

/// Failures talking to the dashboard backend.
#[derive(Debug, Error)]
pub enum ScreensaverError {
    #[error("request to {endpoint} failed: {message}")]
    Network { endpoint: String, message: String },
    #[error("{endpoint} answered with status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
    #[error("backend is unavailable")]
    Unavailable,
}

impl ScreensaverError {
    pub fn network(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("video playback failed for {url}: {reason}")]
pub struct MediaError {
    pub url: String,
    pub reason: String,
}

impl MediaError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("screensaver timeout is not a number: {0:?}")]
    NotNumeric(String),
    #[error("screensaver timeout must not be negative: {0}")]
    Negative(i64),
}
