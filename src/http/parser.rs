use std::io;

use tokio::io::AsyncBufRead;

use crate::error::{ConnectionError, ParseError};
use crate::http::HTTP_VERSION;
use crate::http::line::read_line;
use crate::http::request::{Method, Request, RequestBuilder, canonical_header_key};

/// A parse that stopped early, together with how far it got.
#[derive(Debug)]
pub struct ParseFailure {
    pub error: ParseError,
    /// Whether a well-formed start line had been read before the failure.
    pub start_line_valid: bool,
}

impl From<ParseFailure> for ConnectionError {
    fn from(failure: ParseFailure) -> Self {
        ConnectionError::classify(failure.error, failure.start_line_valid)
    }
}

/// Reads one request (start line and header block) off `reader`.
///
/// Read errors, including end of stream and an expired deadline, are
/// returned as soon as they happen with `start_line_valid` reflecting the
/// progress made so far. No body is ever read.
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseFailure>
where
    R: AsyncBufRead + Unpin,
{
    let mut start_line_valid = false;
    let result = parse(reader, &mut start_line_valid).await;
    result.map_err(|error| ParseFailure {
        error,
        start_line_valid,
    })
}

async fn parse<R>(reader: &mut R, start_line_valid: &mut bool) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let line = next_line(reader).await?;
    let (method, target) = parse_start_line(&line)?;
    *start_line_valid = true;

    let mut builder = RequestBuilder::new().method(method).target(target);
    let mut host = None;

    loop {
        let line = next_line(reader).await?;
        if line.is_empty() {
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeaderLine(line.clone()))?;
        let name = canonical_header_key(name.trim());
        let value = value.trim();

        match name.as_str() {
            "Connection" if value == "close" => builder = builder.close(true),
            "Host" => host = Some(value.to_string()),
            _ => builder = builder.header(&name, value),
        }
    }

    let host = host
        .filter(|h| !h.is_empty())
        .ok_or(ParseError::MissingHostHeader)?;

    builder
        .host(host)
        .build()
        .map_err(|_| ParseError::MissingHostHeader)
}

/// Splits `METHOD SP TARGET SP VERSION` and validates each field.
pub fn parse_start_line(line: &str) -> Result<(Method, String), ParseError> {
    let malformed = || ParseError::MalformedStartLine(line.to_string());

    let fields: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = fields.as_slice() else {
        return Err(malformed());
    };

    let method = Method::from_str(method).ok_or_else(malformed)?;
    if !target.starts_with('/') || *version != HTTP_VERSION {
        return Err(malformed());
    }

    Ok((method, target.to_string()))
}

async fn next_line<R>(reader: &mut R) -> Result<String, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    read_line(reader).await.map_err(|e| ParseError::Io(io::Error::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_line_fields() {
        let (method, target) = parse_start_line("GET /index.html HTTP/1.1").unwrap();
        assert_eq!(method, Method::GET);
        assert_eq!(target, "/index.html");
    }

    #[test]
    fn start_line_rejects_double_space() {
        assert!(matches!(
            parse_start_line("GET  / HTTP/1.1"),
            Err(ParseError::MalformedStartLine(_))
        ));
    }

    #[tokio::test]
    async fn parse_simple_get() {
        let mut input: &[u8] = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let req = parse_request(&mut input).await.unwrap();

        assert_eq!(req.target, "/");
        assert_eq!(req.host, "example.com");
        assert!(req.headers.is_empty());
        assert!(input.is_empty());
    }
}
