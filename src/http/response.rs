use std::collections::BTreeMap;
use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::config::VirtualHosts;
use crate::http::mime::{format_time, mime_type_for_path};
use crate::http::request::Request;
use crate::http::resolve::locate;

/// HTTP status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use triton::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use triton::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A response ready to be written to a client.
///
/// Headers are kept sorted by name, which is also the order they go out on
/// the wire. The body is never held in memory here: `file_path` names the
/// file whose bytes are streamed after the header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: BTreeMap<String, String>,
    pub file_path: Option<PathBuf>,
}

/// Builder for constructing responses in a fluent style.
///
/// `Date` is filled in by [`ResponseBuilder::build`] unless already set.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::NotFound)
///     .close(req.close)
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    file_path: Option<PathBuf>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            file_path: None,
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds `Connection: close` when `close` is true.
    pub fn close(self, close: bool) -> Self {
        if close {
            self.header("Connection", "close")
        } else {
            self
        }
    }

    /// Serves the regular file at `path`, described by `meta`.
    pub fn file(mut self, path: PathBuf, meta: &Metadata) -> Self {
        self.headers
            .insert("Content-Type".to_string(), mime_type_for_path(&path).to_string());
        self.headers
            .insert("Content-Length".to_string(), meta.len().to_string());
        let modified = meta.modified().unwrap_or_else(|e| {
            tracing::debug!(path = %path.display(), error = %e, "no modification time");
            SystemTime::UNIX_EPOCH
        });
        self.headers
            .insert("Last-Modified".to_string(), format_time(modified));
        self.file_path = Some(path);
        self
    }

    pub fn build(mut self) -> Response {
        self.headers
            .entry("Date".to_string())
            .or_insert_with(|| format_time(SystemTime::now()));

        Response {
            status: self.status,
            headers: self.headers,
            file_path: self.file_path,
        }
    }
}

impl Response {
    /// Answers a well-formed request from the virtual host table.
    ///
    /// An unknown host, a target that escapes its document root and a
    /// missing or non-regular file are all answered with 404; the client
    /// cannot tell them apart.
    pub async fn serve(req: &Request, hosts: &VirtualHosts) -> Self {
        let Some(doc_root) = hosts.doc_root(&req.host) else {
            return Self::not_found(req);
        };

        match locate(doc_root, &req.target).await {
            Ok((path, meta)) => ResponseBuilder::new(StatusCode::Ok)
                .file(path, &meta)
                .close(req.close)
                .build(),
            Err(_) => Self::not_found(req),
        }
    }

    pub fn not_found(req: &Request) -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .close(req.close)
            .build()
    }

    /// A 400 always asks for the connection to be closed.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .close(true)
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Whether the connection must be closed once this response is written.
    pub fn closes_connection(&self) -> bool {
        self.status == StatusCode::BadRequest || self.header("Connection") == Some("close")
    }
}
