//! HTTP/1.1 static file serving.
//!
//! This module implements the subset of HTTP/1.1 the server speaks: `GET`
//! requests for files under a virtual host's document root, over
//! persistent connections.
//!
//! # Architecture
//!
//! - **`line`**: reads one CRLF-terminated line off a buffered stream
//! - **`deadline`**: read adapter that fails reads once a deadline passes
//! - **`request`**: HTTP request representation and header canonicalisation
//! - **`parser`**: builds a validated [`request::Request`] from the stream
//! - **`resolve`**: maps a request target onto a path inside a document root
//! - **`response`**: classifies a request into a 200, 404 or 400 response
//! - **`writer`**: serializes a response and streams the file body
//! - **`connection`**: the per-connection request/response state machine
//! - **`mime`**: MIME type lookup and HTTP date formatting
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← arm read deadline, parse request
//!        └──────┬───────────┘
//!               │ valid request         EOF / idle timeout → Closed (silent)
//!               ▼                       parse error / stall → 400 → Closed
//!        ┌──────────────────┐
//!        │    Writing       │ ← 200 or 404
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ keep-alive → AwaitingRequest (same connection)
//!               └─ Connection: close → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use triton::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! let listener = TcpListener::bind(&cfg.listen_addr).await?;
//! loop {
//!     let (socket, peer) = listener.accept().await?;
//!     let cfg = Arc::clone(&cfg);
//!     tokio::spawn(async move {
//!         let _ = Connection::new(socket, cfg, peer.to_string()).run().await;
//!     });
//! }
//! ```

pub mod connection;
pub mod deadline;
pub mod line;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolve;
pub mod response;
pub mod writer;

/// The only protocol version accepted on requests and sent on responses.
pub const HTTP_VERSION: &str = "HTTP/1.1";
