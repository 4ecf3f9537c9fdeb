//! `application/x-www-form-urlencoded` decoding.
//!
//! The same encoding is used for URL query strings and for the body a browser
//! sends when the console's `<form method="post">` is submitted.

use percent_encoding::percent_decode_str;

/// Media type of a browser form submission.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Decoded `key=value` pairs, in the order they appeared.
///
/// # Examples
///
/// ```
/// use query_console::http::FormData;
///
/// let form = FormData::parse("query=SELECT+*+FROM+artists%3B&x=1");
/// assert_eq!(form.get("query"), Some("SELECT * FROM artists;"));
/// assert_eq!(form.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    /// Parses an urlencoded string. Malformed escapes are kept literally and
    /// invalid UTF-8 is replaced, so parsing never fails.
    pub fn parse(encoded: &str) -> Self {
        let pairs = encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    /// Parses a raw request body.
    pub fn from_body(body: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(body))
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// `+` must become a space before percent-decoding so that `%2B` survives as a literal plus.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
