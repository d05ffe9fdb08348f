use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET is served; any other verb makes the start line malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// # Example
    ///
    /// ```
    /// # use triton::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// Represents a parsed HTTP request from a client.
///
/// `Host` and `Connection: close` are lifted out of the header block into
/// [`Request::host`] and [`Request::close`]; everything else lands in
/// `headers` under its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target, always starting with `/`
    pub target: String,
    /// HTTP version, always "HTTP/1.1"
    pub version: String,
    /// Remaining headers; the last duplicate wins
    pub headers: HashMap<String, String>,
    /// Value of the `Host` header
    pub host: String,
    /// Whether the client sent `Connection: close`
    pub close: bool,
}

/// Builder for constructing Request objects.
///
/// The parser assembles requests through this; tests use it to make
/// requests without going through the wire format.
pub struct RequestBuilder {
    method: Method,
    target: Option<String>,
    host: Option<String>,
    headers: HashMap<String, String>,
    close: bool,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            target: None,
            host: None,
            headers: HashMap::new(),
            close: false,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(canonical_header_key(key), value.into());
        self
    }

    pub fn close(mut self, close: bool) -> Self {
        self.close = close;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method,
            target: self.target.ok_or("target missing")?,
            version: super::HTTP_VERSION.to_string(),
            headers: self.headers,
            host: self.host.ok_or("host missing")?,
            close: self.close,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Retrieves a header value by name, in any capitalisation.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_key(key))
            .map(|v| v.as_str())
    }
}

/// Returns the canonical form of a header name.
///
/// The first letter and any letter following a hyphen are upper-cased and
/// the rest lower-cased, so `content-type` becomes `Content-Type`. A name
/// containing a space or any other non-token byte is returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
