//! # query-console
//!
//! A browser console for a remote SQL query service. The user types a
//! statement, the console POSTs it verbatim as `{"query": "..."}` to the
//! configured endpoint, and renders the JSON reply as a result table, a
//! rows-affected confirmation, or an error banner.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use query_console::config::{ConsoleConfig, parse_endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConsoleConfig::new(parse_endpoint("http://localhost:5000/query")?)
//!         .with_schema_panel(true);
//!     query_console::app::serve(config, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

// ── Console ───────────────────────────────────────────────────────────────────
pub mod app;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod query;
pub mod schema;

// ── HTTP plumbing ─────────────────────────────────────────────────────────────
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use config::ConsoleConfig;
pub use console::QueryConsole;
pub use error::ConsoleError;
pub use http::{Method, Request, Response, StatusCode};
pub use query::{QueryRequest, QueryResponse};
pub use server::{Server, ServerError};
