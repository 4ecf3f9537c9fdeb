//! Console configuration, read from command-line flags or the environment.

use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::error::ConsoleError;

/// Query service the console talks to unless told otherwise.
pub const DEFAULT_ENDPOINT: &str = "https://music-streaming-flask-backend.onrender.com/query";

/// Text pre-filled into the query box.
pub const DEFAULT_QUERY: &str = "SELECT * FROM artists LIMIT 5";

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Everything the console needs to start.
///
/// # Examples
///
/// ```
/// use clap::Parser;
/// use query_console::config::ConsoleConfig;
///
/// let config = ConsoleConfig::try_parse_from([
///     "query-console",
///     "--endpoint",
///     "http://localhost:5000/query",
///     "--show-schema",
/// ])
/// .unwrap();
/// assert!(config.show_schema);
/// assert_eq!(config.endpoint.as_str(), "http://localhost:5000/query");
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "query-console",
    version,
    about = "Browser console that sends raw SQL to a remote query service"
)]
pub struct ConsoleConfig {
    /// URL of the remote query service; receives `POST {"query": ...}`
    #[arg(
        long,
        env = "QUERY_CONSOLE_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        value_parser = endpoint_arg
    )]
    pub endpoint: Url,

    /// Address the console's web server listens on
    #[arg(long, env = "QUERY_CONSOLE_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Show the database schema panel next to the query box
    #[arg(long, env = "QUERY_CONSOLE_SHOW_SCHEMA")]
    pub show_schema: bool,

    /// Query pre-filled into the text box
    #[arg(long, env = "QUERY_CONSOLE_DEFAULT_QUERY", default_value = DEFAULT_QUERY)]
    pub default_query: String,

    /// Per-request timeout for the query service in whole seconds (at least 1); unset means no timeout
    #[arg(
        long,
        env = "QUERY_CONSOLE_REQUEST_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: Option<u64>,
}

impl ConsoleConfig {
    /// Defaults for everything except the endpoint.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            bind: DEFAULT_BIND.to_owned(),
            show_schema: false,
            default_query: DEFAULT_QUERY.to_owned(),
            request_timeout_secs: None,
        }
    }

    #[must_use]
    pub fn with_schema_panel(mut self, show: bool) -> Self {
        self.show_schema = show;
        self
    }

    #[must_use]
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Sets the query service timeout in whole seconds. `0` clears it.
    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = (secs > 0).then_some(secs);
        self
    }

    /// The client timeout, if one is configured. A zero value counts as unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }
}

/// Parses and checks a query service URL.
///
/// # Errors
///
/// [`ConsoleError::InvalidEndpoint`] when the text is not an absolute
/// `http` or `https` URL.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConsoleError> {
    let invalid = |reason: String| ConsoleError::InvalidEndpoint {
        endpoint: raw.to_owned(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    ensure_http(&url)?;
    Ok(url)
}

/// Rejects URLs the HTTP client cannot POST to.
pub fn ensure_http(url: &Url) -> Result<(), ConsoleError> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        "http" | "https" => Err(ConsoleError::InvalidEndpoint {
            endpoint: url.to_string(),
            reason: "missing host".to_owned(),
        }),
        other => Err(ConsoleError::InvalidEndpoint {
            endpoint: url.to_string(),
            reason: format!("unsupported scheme {other:?}, expected http or https"),
        }),
    }
}

fn endpoint_arg(raw: &str) -> Result<Url, String> {
    parse_endpoint(raw).map_err(|e| e.to_string())
}
