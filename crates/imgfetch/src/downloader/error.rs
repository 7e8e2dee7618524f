//! Error types for slot downloads

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by a slot download
///
/// Cancellation is deliberately absent: a cancelled download resolves to
/// `Ok(None)` rather than an error.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The address string cannot be turned into a request
    #[error("invalid download address '{url}'")]
    InvalidAddress {
        url: String,
        #[source]
        reason: AddressError,
    },

    /// The server answered, but not with a body this engine can track
    #[error("download of '{url}' rejected by server")]
    Remote {
        url: String,
        #[source]
        reason: RemoteFailure,
    },

    /// Network-level failure while fetching headers or streaming the body
    #[error("transport failure while downloading '{url}'")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Why an address was rejected before any request went out
#[derive(Error, Debug)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("unsupported scheme '{0}' (supported: http, https)")]
    UnsupportedScheme(String),

    #[error("address does not parse")]
    Parse(#[from] url::ParseError),
}

/// Why a served response was unusable
#[derive(Error, Debug)]
pub enum RemoteFailure {
    #[error("status {0}")]
    Status(StatusCode),

    /// Progress tracking needs the total up front, so a missing
    /// Content-Length header fails the download outright
    #[error("response carries no Content-Length")]
    MissingLength,
}

pub type Result<T> = std::result::Result<T, DownloadError>;

impl DownloadError {
    pub(crate) fn invalid_address(url: impl Into<String>, reason: AddressError) -> Self {
        DownloadError::InvalidAddress {
            url: url.into(),
            reason,
        }
    }

    pub(crate) fn remote(url: impl Into<String>, reason: RemoteFailure) -> Self {
        DownloadError::Remote {
            url: url.into(),
            reason,
        }
    }

    pub(crate) fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        DownloadError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    /// The address the failed download was issued for
    pub fn url(&self) -> &str {
        match self {
            DownloadError::InvalidAddress { url, .. } => url,
            DownloadError::Remote { url, .. } => url,
            DownloadError::Transport { url, .. } => url,
        }
    }

    /// HTTP status carried by the failure, if the server got far enough to send one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DownloadError::Remote {
                reason: RemoteFailure::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            DownloadError::InvalidAddress { .. } => "invalid_address",
            DownloadError::Remote { .. } => "remote",
            DownloadError::Transport { .. } => "transport",
        }
    }
}
