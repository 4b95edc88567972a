use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to an upstream gateway. The resolver never surfaces
/// these; they downgrade resolution to the next fallback tier.
#[derive(Error, Debug)]
pub enum UpstreamUnavailable {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Failed to parse response from {url}: {reason}")]
    Parse { url: String, reason: String },
}

pub type UpstreamResult<T> = std::result::Result<T, UpstreamUnavailable>;
