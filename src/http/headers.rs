//! Ordered, case-insensitive header map.

/// A case-insensitive, multi-value HTTP header map.
///
/// Insertion order is preserved so responses are serialized in the order the
/// console builds them.
///
/// # Examples
///
/// ```
/// use query_console::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8");
///
/// assert_eq!(headers.media_type(), Some("application/x-www-form-urlencoded"));
/// assert!(headers.contains("content-type"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Appends a header entry. Repeated names are kept side by side.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the first value for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns the `Content-Type` essence: the media type with parameters
    /// (`; charset=...`) stripped and surrounding whitespace trimmed.
    pub fn media_type(&self) -> Option<&str> {
        let value = self.get("content-type")?;
        let essence = value.split(';').next().unwrap_or(value).trim();
        Some(essence)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_get() {
        let mut h = Headers::new();
        h.insert("Content-Length", "12");
        assert_eq!(h.get("content-length"), Some("12"));
        assert_eq!(h.get("CONTENT-LENGTH"), Some("12"));
    }

    #[test]
    fn first_value_wins() {
        let mut h = Headers::new();
        h.insert("Allow", "GET");
        h.insert("Allow", "POST");
        assert_eq!(h.get("allow"), Some("GET"));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn media_type_strips_parameters() {
        let mut h = Headers::new();
        h.insert("Content-Type", " text/html ; charset=utf-8");
        assert_eq!(h.media_type(), Some("text/html"));
    }

    #[test]
    fn media_type_absent() {
        assert_eq!(Headers::new().media_type(), None);
    }
}
