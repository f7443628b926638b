//! Error types raised while fetching the country dataset.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`CountriesError`] failures.
pub type CountriesResult<T> = Result<T, CountriesError>;

/// Failures that can occur while fetching the country dataset.
///
/// The game only sees a single "load failed" outcome; the variants exist for logs.
#[derive(Debug, Error)]
pub enum CountriesError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or the connection dropped.
    #[error("failed to send request to `{url}`")]
    RequestSend {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The upstream API answered with a non-success status.
    #[error("unexpected response status {status} from `{url}`")]
    RequestStatus { url: String, status: StatusCode },
    /// The payload did not match the expected country schema.
    #[error("failed to decode country list from `{url}`")]
    DecodeResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
