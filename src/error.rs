//! Error taxonomy for request handling.
//!
//! Parse and timeout errors never leave the connection that produced them;
//! the listener only ever sees accept failures.

use std::io;
use thiserror::Error;

/// Why a request could not be read off the wire.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Wrong field count, unsupported method or version, or a relative target.
    #[error("malformed start line: {0:?}")]
    MalformedStartLine(String),

    /// A header line with no colon.
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// The header block ended without a `Host` header.
    #[error("missing Host header")]
    MissingHostHeader,

    /// The underlying read failed (end of stream, deadline, bad bytes).
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    pub fn is_eof(&self) -> bool {
        matches!(self, ParseError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ParseError::Io(e) if e.kind() == io::ErrorKind::TimedOut)
    }
}

/// How a connection came to an end, other than a clean `Connection: close`.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed by peer")]
    ConnectionClosedByPeer,

    #[error("idle timeout")]
    IdleTimeout,

    #[error("read deadline expired mid-request")]
    MidRequestTimeout,

    #[error("bad request: {0}")]
    BadRequest(#[source] ParseError),

    #[error("failed to write response: {0}")]
    WriteFailure(#[source] io::Error),
}

impl ConnectionError {
    /// Sort a parse failure into its connection-level outcome.
    ///
    /// `start_line_valid` tells a timeout on an idle connection apart from
    /// one that hit while a request was being read.
    pub fn classify(error: ParseError, start_line_valid: bool) -> Self {
        if error.is_eof() {
            ConnectionError::ConnectionClosedByPeer
        } else if error.is_timeout() {
            if start_line_valid {
                ConnectionError::MidRequestTimeout
            } else {
                ConnectionError::IdleTimeout
            }
        } else {
            ConnectionError::BadRequest(error)
        }
    }

    /// True when the socket should be dropped without sending anything.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ConnectionError::ConnectionClosedByPeer | ConnectionError::IdleTimeout
        )
    }
}

/// Reasons a target cannot be served. Both collapse to 404 on the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("path escapes the document root")]
    PathOutsideRoot,

    #[error("file not found")]
    FileNotFound,
}
