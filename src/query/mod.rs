//! Wire types exchanged with the remote query service.
//!
//! A submission is a [`QueryRequest`]; the reply is decoded into the
//! [`QueryResponse`] tagged union. The service never labels its replies, so
//! the variant is chosen from the keys present in the JSON document:
//!
//! | Body                                          | Variant                         |
//! |-----------------------------------------------|---------------------------------|
//! | object with `error`                           | [`QueryResponse::Error`]        |
//! | object with `message` and `rows_affected`     | [`QueryResponse::Mutation`]     |
//! | array of objects                              | [`QueryResponse::Rows`]         |
//! | anything else                                 | [`QueryResponse::Unrecognized`] |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod table;

pub use table::ResultTable;

/// Body of the POST sent to the remote query service.
///
/// The SQL text is forwarded exactly as typed.
///
/// # Examples
///
/// ```
/// use query_console::query::QueryRequest;
///
/// let body = serde_json::to_string(&QueryRequest::new("SELECT 1")).unwrap();
/// assert_eq!(body, r#"{"query":"SELECT 1"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// One result row: column name to scalar, in the order the service sent them.
pub type Row = Map<String, Value>;

/// A decoded reply from the remote query service.
///
/// Implements [`Deserialize`] through [`From<Value>`], so any syntactically
/// valid JSON body decodes; shape problems surface as
/// [`QueryResponse::Unrecognized`] rather than as deserialization errors.
///
/// # Examples
///
/// ```
/// use query_console::query::QueryResponse;
///
/// let reply: QueryResponse =
///     serde_json::from_str(r#"{"message":"Deleted","rows_affected":1}"#).unwrap();
/// assert_eq!(
///     reply,
///     QueryResponse::Mutation { message: "Deleted".into(), rows_affected: 1 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum QueryResponse {
    /// The service rejected the statement.
    Error { error: String },
    /// A statement without a result set (INSERT / UPDATE / DELETE / DDL).
    Mutation { message: String, rows_affected: i64 },
    /// A result set. May be empty.
    Rows(Vec<Row>),
    /// Valid JSON in none of the three known shapes. The body is kept for display.
    Unrecognized { reason: UnrecognizedShape, body: Value },
}

/// Why a reply did not match any known shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnrecognizedShape {
    #[error("acknowledgement has a message but no integer rows_affected")]
    MissingRowsAffected,

    #[error("object has none of the keys error, message")]
    UnknownObject,

    #[error("element {index} of the result array is {found}, not an object")]
    NonObjectRow { index: usize, found: &'static str },

    #[error("expected an object or an array, got {found}")]
    UnexpectedType { found: &'static str },
}

impl QueryResponse {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Mutation { .. } => "mutation",
            Self::Rows(_) => "rows",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }

    fn from_object(object: Map<String, Value>) -> Self {
        if let Some(error) = object.get("error") {
            return Self::Error {
                error: text_of(error),
            };
        }

        if let Some(message) = object.get("message") {
            return match object.get("rows_affected").and_then(Value::as_i64) {
                Some(rows_affected) => Self::Mutation {
                    message: text_of(message),
                    rows_affected,
                },
                None => Self::Unrecognized {
                    reason: UnrecognizedShape::MissingRowsAffected,
                    body: Value::Object(object),
                },
            };
        }

        Self::Unrecognized {
            reason: UnrecognizedShape::UnknownObject,
            body: Value::Object(object),
        }
    }

    fn from_array(elements: Vec<Value>) -> Self {
        if let Some((index, found)) = elements
            .iter()
            .enumerate()
            .find(|(_, element)| !element.is_object())
        {
            let reason = UnrecognizedShape::NonObjectRow {
                index,
                found: json_type_name(found),
            };
            return Self::Unrecognized {
                reason,
                body: Value::Array(elements),
            };
        }

        let rows = elements
            .into_iter()
            .filter_map(|element| match element {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect();
        Self::Rows(rows)
    }
}

impl From<Value> for QueryResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => Self::from_object(object),
            Value::Array(elements) => Self::from_array(elements),
            other => Self::Unrecognized {
                reason: UnrecognizedShape::UnexpectedType {
                    found: json_type_name(&other),
                },
                body: other,
            },
        }
    }
}

// Strings are shown raw; anything else as compact JSON.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decode(body: &str) -> QueryResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn error_shape() {
        let reply = decode(r#"{"error":"relation \"nosuchtable\" does not exist"}"#);
        assert_eq!(
            reply,
            QueryResponse::Error {
                error: r#"relation "nosuchtable" does not exist"#.into()
            }
        );
    }

    #[test]
    fn error_wins_over_message() {
        let reply = decode(r#"{"message":"Deleted","rows_affected":1,"error":"boom"}"#);
        assert!(matches!(reply, QueryResponse::Error { error } if error == "boom"));
    }

    #[test]
    fn non_string_error_is_shown_as_json() {
        let reply = decode(r#"{"error":{"code":42}}"#);
        assert!(matches!(reply, QueryResponse::Error { error } if error == r#"{"code":42}"#));
    }

    #[test]
    fn mutation_shape() {
        let reply = decode(r#"{"message":"Inserted","rows_affected":3}"#);
        assert_eq!(
            reply,
            QueryResponse::Mutation {
                message: "Inserted".into(),
                rows_affected: 3
            }
        );
    }

    #[test]
    fn message_without_rows_affected_is_unrecognized() {
        let reply = decode(r#"{"message":"Deleted"}"#);
        assert!(matches!(
            reply,
            QueryResponse::Unrecognized {
                reason: UnrecognizedShape::MissingRowsAffected,
                ..
            }
        ));
    }

    #[test]
    fn fractional_rows_affected_is_unrecognized() {
        let reply = decode(r#"{"message":"Deleted","rows_affected":1.5}"#);
        assert_eq!(reply.kind(), "unrecognized");
    }

    #[test]
    fn rows_keep_column_order() {
        let reply = decode(r#"[{"name":"A","artist_id":"1","popularity":10}]"#);
        let QueryResponse::Rows(rows) = reply else {
            panic!("expected rows");
        };
        let keys: Vec<_> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "artist_id", "popularity"]);
    }

    #[test]
    fn empty_array_is_empty_rows() {
        assert_eq!(decode("[]"), QueryResponse::Rows(Vec::new()));
    }

    #[test]
    fn array_with_scalar_is_unrecognized() {
        let reply = decode(r#"[{"a":1}, 2]"#);
        match reply {
            QueryResponse::Unrecognized { reason, body } => {
                assert_eq!(
                    reason,
                    UnrecognizedShape::NonObjectRow {
                        index: 1,
                        found: "a number"
                    }
                );
                assert_eq!(body, json!([{"a": 1}, 2]));
            }
            other => panic!("expected unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn object_without_known_keys_is_unrecognized() {
        let reply = decode(r#"{"status":"ok"}"#);
        assert!(matches!(
            reply,
            QueryResponse::Unrecognized {
                reason: UnrecognizedShape::UnknownObject,
                ..
            }
        ));
    }

    #[test]
    fn top_level_scalar_is_unrecognized() {
        let reply = decode(r#""hello""#);
        assert!(matches!(
            reply,
            QueryResponse::Unrecognized {
                reason: UnrecognizedShape::UnexpectedType { found: "a string" },
                ..
            }
        ));
    }

    #[test]
    fn reason_messages() {
        assert_eq!(
            UnrecognizedShape::UnexpectedType { found: "null" }.to_string(),
            "expected an object or an array, got null"
        );
    }
}
