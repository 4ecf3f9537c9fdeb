//! The single outbound call: POST the query to the remote service and decode
//! its reply.

use reqwest::{Client, Url};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{self, ConsoleConfig};
use crate::error::ConsoleError;
use crate::query::{QueryRequest, QueryResponse};

const USER_AGENT: &str = concat!("query-console/", env!("CARGO_PKG_VERSION"));

/// The request could not be completed at the HTTP level.
///
/// The display text is what the user sees after "Failed to execute query:".
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Send(#[source] reqwest::Error),

    #[error("{status} for url: {url}")]
    Status {
        status: reqwest::StatusCode,
        url: Url,
    },

    #[error("response is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

impl TransportError {
    /// HTTP status of a non-2xx reply.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Send(e) | Self::Decode(e) => e.status(),
        }
    }
}

/// Client for the remote query service.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: Client,
    endpoint: Url,
}

impl QueryClient {
    /// Builds a client for `config.endpoint`.
    ///
    /// No timeout is set unless `config.request_timeout_secs` is.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::InvalidEndpoint`] for a non-HTTP endpoint,
    /// [`ConsoleError::HttpClient`] if the TLS backend fails to initialise.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        config::ensure_http(&config.endpoint)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConsoleError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `request` and decodes the reply. Never retries.
    ///
    /// # Errors
    ///
    /// [`TransportError`] for connection failures, timeouts, non-2xx statuses
    /// and bodies that are not JSON. A JSON body in an unexpected shape is
    /// not an error; it decodes to [`QueryResponse::Unrecognized`].
    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryResponse, TransportError> {
        let started = Instant::now();
        debug!(endpoint = %self.endpoint, query_len = request.query.len(), "sending query");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "query service unreachable");
                TransportError::Send(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "query service returned an error status");
            return Err(TransportError::Status {
                status,
                url: response.url().clone(),
            });
        }

        let reply = response
            .json::<QueryResponse>()
            .await
            .map_err(TransportError::Decode)?;

        debug!(
            endpoint = %self.endpoint,
            kind = reply.kind(),
            elapsed = ?started.elapsed(),
            "query service replied"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> ConsoleConfig {
        ConsoleConfig::new(Url::parse(endpoint).unwrap())
    }

    #[test]
    fn builds_for_http_and_https() {
        assert!(QueryClient::new(&config("http://localhost:5000/query")).is_ok());
        let client = QueryClient::new(&config("https://example.com/query")).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://example.com/query");
    }

    #[test]
    fn rejects_other_schemes() {
        let err = QueryClient::new(&config("ftp://example.com/query")).unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidEndpoint { .. }));
    }

    #[test]
    fn status_error_text() {
        let err = TransportError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            url: Url::parse("http://localhost:5000/query").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "500 Internal Server Error for url: http://localhost:5000/query"
        );
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }
}
