//! HTTP/1.1 request parsing using the [`httparse`] crate.

use bytes::Bytes;
use thiserror::Error;

use super::form::{FORM_URLENCODED, FormData};
use super::{Headers, Method};

/// Errors that can occur while parsing an HTTP/1.1 request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is incomplete, more data needed")]
    Incomplete,

    #[error("HTTP parse error: {0}")]
    Parse(#[from] httparse::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid Content-Length header: {value:?}")]
    InvalidContentLength { value: String },

    #[error("request body exceeds maximum allowed size of {max_bytes} bytes")]
    BodyTooLarge { max_bytes: usize },
}

/// Largest request (headers plus body) accepted before answering `413` (8 MiB).
pub const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// A fully parsed HTTP/1.1 request, body included.
///
/// # Examples
///
/// ```
/// use query_console::http::Request;
///
/// let raw = b"POST /query HTTP/1.1\r\nHost: localhost\r\n\
///     Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 14\r\n\r\n\
///     query=SELECT+1";
/// let (request, consumed) = Request::parse(raw).unwrap();
///
/// assert_eq!(request.path(), "/query");
/// assert_eq!(consumed, raw.len());
/// assert_eq!(request.form().unwrap().get("query"), Some("SELECT 1"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    /// HTTP minor version: 0 for HTTP/1.0, 1 for HTTP/1.1.
    version: u8,
    headers: Headers,
    query: FormData,
    body: Bytes,
}

impl Request {
    /// Maximum number of headers accepted per request.
    const MAX_HEADERS: usize = 64;

    /// Parses one request from the front of `buf`.
    ///
    /// Returns the request and the number of bytes it occupied (headers plus
    /// `Content-Length` bytes of body). Bytes past that point belong to the
    /// next pipelined request and are left untouched.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Incomplete`] — the headers or the body are not fully buffered yet.
    /// - [`RequestError::Parse`] — the data is malformed.
    /// - [`RequestError::MissingField`] — method, path or version is absent.
    /// - [`RequestError::InvalidContentLength`] — `Content-Length` is not a number.
    /// - [`RequestError::BodyTooLarge`] — the declared request size exceeds
    ///   [`MAX_REQUEST_SIZE`]; reported before any body bytes are awaited.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), RequestError> {
        let mut headers = [httparse::EMPTY_HEADER; Self::MAX_HEADERS];
        let mut raw_req = httparse::Request::new(&mut headers);

        let body_offset = match raw_req.parse(buf)? {
            httparse::Status::Complete(offset) => offset,
            httparse::Status::Partial => return Err(RequestError::Incomplete),
        };

        let method = match raw_req
            .method
            .ok_or(RequestError::MissingField { field: "method" })?
            .parse::<Method>()
        {
            Ok(method) => method,
            Err(never) => match never {},
        };

        let raw_path = raw_req
            .path
            .ok_or(RequestError::MissingField { field: "path" })?;
        let (path, query) = match raw_path.split_once('?') {
            Some((path, query)) => (path.to_owned(), FormData::parse(query)),
            None => (raw_path.to_owned(), FormData::default()),
        };

        let version = raw_req
            .version
            .ok_or(RequestError::MissingField { field: "version" })?;

        let mut header_map = Headers::with_capacity(raw_req.headers.len());
        for header in raw_req.headers.iter() {
            if let Ok(value) = std::str::from_utf8(header.value) {
                header_map.insert(header.name, value);
            }
        }

        let content_length = match header_map.get("content-length") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| {
                RequestError::InvalidContentLength {
                    value: value.to_owned(),
                }
            })?,
            None => 0,
        };

        let consumed = body_offset
            .checked_add(content_length)
            .filter(|&total| total <= MAX_REQUEST_SIZE)
            .ok_or(RequestError::BodyTooLarge {
                max_bytes: MAX_REQUEST_SIZE,
            })?;
        if buf.len() < consumed {
            return Err(RequestError::Incomplete);
        }
        let body = Bytes::copy_from_slice(&buf[body_offset..consumed]);

        Ok((
            Self {
                method,
                path,
                version,
                headers: header_map,
                query,
                body,
            },
            consumed,
        ))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP minor version (0 = HTTP/1.0, 1 = HTTP/1.1).
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a decoded query-string parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decodes the body as a browser form submission.
    ///
    /// Returns `None` when the body carries a different media type. A request
    /// without a `Content-Type` and without a body decodes to an empty form.
    pub fn form(&self) -> Option<FormData> {
        match self.headers.media_type() {
            Some(media) if media.eq_ignore_ascii_case(FORM_URLENCODED) => {
                Some(FormData::from_body(&self.body))
            }
            None if self.body.is_empty() => Some(FormData::default()),
            _ => None,
        }
    }

    /// Returns `true` if the connection should stay open after this request.
    ///
    /// HTTP/1.1 defaults to keep-alive; HTTP/1.0 only when asked for explicitly.
    pub fn is_keep_alive(&self) -> bool {
        match self.headers.get("connection") {
            Some(conn) => conn.eq_ignore_ascii_case("keep-alive"),
            None => self.version == 1,
        }
    }
}
