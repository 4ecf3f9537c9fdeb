//! The query console: one text box, one button, one result area.
//!
//! A page is described by a [`ConsoleView`], which is either idle (input
//! only) or displaying the [`Outcome`] of the last submission. Every
//! submission produces a fresh view, so nothing carries over between
//! requests except the text the user typed.

use std::fmt;

use tracing::info;

use crate::client::{QueryClient, TransportError};
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::query::{QueryRequest, QueryResponse, ResultTable, UnrecognizedShape};

mod page;

pub use page::escape_html;

/// Page title.
pub const TITLE: &str = "Music Streaming Database Query Interface";

/// What happened to one submission.
#[derive(Debug)]
pub enum Outcome {
    /// The service could not be reached or did not answer `2xx` with JSON.
    Failed(TransportError),
    /// The service answered; the reply may still be an application error.
    Replied(QueryResponse),
}

impl Outcome {
    /// The banner shown above (or instead of) the table, if any.
    pub fn banner(&self) -> Option<Banner> {
        let banner = match self {
            Self::Failed(e) => Banner::new(BannerKind::Failure, e.to_string()),
            Self::Replied(QueryResponse::Error { error }) => {
                Banner::new(BannerKind::Error, error.clone())
            }
            Self::Replied(QueryResponse::Mutation {
                message,
                rows_affected,
            }) => Banner::new(
                BannerKind::Success,
                format!("{message} (Rows affected: {rows_affected})"),
            ),
            Self::Replied(QueryResponse::Unrecognized { reason, .. }) => {
                Banner::new(BannerKind::Warning, reason.to_string())
            }
            Self::Replied(QueryResponse::Rows(_)) => return None,
        };
        Some(banner)
    }

    /// The result table; only result-set replies have one.
    pub fn table(&self) -> Option<ResultTable> {
        match self {
            Self::Replied(QueryResponse::Rows(rows)) => Some(ResultTable::from_rows(rows)),
            _ => None,
        }
    }

    /// Raw body of an unrecognized reply, for display under the warning.
    pub fn unrecognized(&self) -> Option<(&UnrecognizedShape, &serde_json::Value)> {
        match self {
            Self::Replied(QueryResponse::Unrecognized { reason, body }) => Some((reason, body)),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Failed(_) => "transport_error",
            Self::Replied(reply) => reply.kind(),
        }
    }
}

/// Banner styling. Transport failures and application errors look different
/// but are handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Failure,
    Warning,
}

impl BannerKind {
    fn css_class(self) -> &'static str {
        match self {
            Self::Success => "banner-success",
            Self::Error => "banner-error",
            Self::Failure => "banner-failure",
            Self::Warning => "banner-warning",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Success => "",
            Self::Error => "Error: ",
            Self::Failure => "Failed to execute query: ",
            Self::Warning => "Unrecognized response: ",
        }
    }
}

/// A one-line status message.
///
/// `message` is the payload exactly as received or composed; the
/// [`Display`](fmt::Display) form adds the kind's prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.message)
    }
}

/// Which of the two console states a view is in.
#[derive(Debug)]
pub enum ConsoleState {
    Idle,
    Displaying(Outcome),
}

/// Everything needed to draw one page.
#[derive(Debug)]
pub struct ConsoleView {
    query_text: String,
    state: ConsoleState,
}

impl ConsoleView {
    /// An idle view with `query_text` in the input.
    pub fn idle(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            state: ConsoleState::Idle,
        }
    }

    /// Moves to `Displaying`, replacing any earlier outcome.
    #[must_use]
    pub fn show(self, outcome: Outcome) -> Self {
        Self {
            query_text: self.query_text,
            state: ConsoleState::Displaying(outcome),
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ConsoleState::Idle)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            ConsoleState::Idle => None,
            ConsoleState::Displaying(outcome) => Some(outcome),
        }
    }
}

/// The console component.
///
/// Holds only immutable configuration and a pooled HTTP client, so one
/// instance is shared by every connection.
#[derive(Debug, Clone)]
pub struct QueryConsole {
    config: ConsoleConfig,
    client: QueryClient,
}

impl QueryConsole {
    /// # Errors
    ///
    /// See [`QueryClient::new`].
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let client = QueryClient::new(&config)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// The view a fresh visitor sees: default query, no result.
    pub fn idle(&self) -> ConsoleView {
        ConsoleView::idle(self.config.default_query.clone())
    }

    /// Draws `view` as a complete HTML document.
    pub fn render(&self, view: &ConsoleView) -> String {
        page::render(view, self.config.show_schema)
    }

    /// Forwards `query_text` verbatim and returns the view to draw next.
    ///
    /// The returned view keeps `query_text` in the input whatever the outcome.
    pub async fn on_submit(&self, query_text: impl Into<String>) -> ConsoleView {
        let request = QueryRequest::new(query_text);
        let outcome = match self.client.execute(&request).await {
            Ok(reply) => Outcome::Replied(reply),
            Err(e) => Outcome::Failed(e),
        };

        info!(
            endpoint = %self.client.endpoint(),
            outcome = outcome.kind(),
            "query submitted"
        );

        ConsoleView::idle(request.query).show(outcome)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn replied(body: serde_json::Value) -> Outcome {
        Outcome::Replied(QueryResponse::from(body))
    }

    #[test]
    fn mutation_banner_text() {
        let banner = replied(json!({"message": "Deleted", "rows_affected": 1}))
            .banner()
            .unwrap();
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.message, "Deleted (Rows affected: 1)");
        assert_eq!(banner.to_string(), "Deleted (Rows affected: 1)");
    }

    #[test]
    fn error_banner_keeps_exact_text() {
        let outcome = replied(json!({"error": "relation \"nosuchtable\" does not exist"}));
        let banner = outcome.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(banner.message, "relation \"nosuchtable\" does not exist");
        assert_eq!(
            banner.to_string(),
            "Error: relation \"nosuchtable\" does not exist"
        );
        assert!(outcome.table().is_none());
    }

    #[test]
    fn rows_have_table_and_no_banner() {
        let outcome = replied(json!([{"a": 1}]));
        assert!(outcome.banner().is_none());
        assert_eq!(outcome.table().unwrap().row_count(), 1);
    }

    #[test]
    fn unrecognized_is_a_warning() {
        let outcome = replied(json!({"message": "Deleted"}));
        let banner = outcome.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Warning);
        assert!(outcome.table().is_none());
        assert!(outcome.unrecognized().is_some());
    }

    #[test]
    fn view_transitions() {
        let view = ConsoleView::idle("SELECT 1");
        assert!(view.is_idle());
        assert!(view.outcome().is_none());

        let view = view.show(replied(json!([])));
        assert!(!view.is_idle());
        assert_eq!(view.query_text(), "SELECT 1");

        let view = view.show(replied(json!({"error": "x"})));
        assert!(matches!(
            view.state(),
            ConsoleState::Displaying(Outcome::Replied(QueryResponse::Error { .. }))
        ));
    }

    #[test]
    fn idle_view_uses_default_query() {
        let config = ConsoleConfig::new(reqwest::Url::parse("http://localhost:5000/query").unwrap());
        let console = QueryConsole::new(config).unwrap();
        let view = console.idle();
        assert!(view.is_idle());
        assert_eq!(view.query_text(), "SELECT * FROM artists LIMIT 5");
    }
}
