//! Startup errors of the console.
//!
//! Per-submission failures never reach this type: they are rendered into the
//! page (see [`crate::client::TransportError`]).

use thiserror::Error;

use crate::server::ServerError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("invalid query service endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error(transparent)]
    Server(#[from] ServerError),
}
