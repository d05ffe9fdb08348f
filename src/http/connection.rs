use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ConnectionError;
use crate::http::deadline::Deadline;
use crate::http::parser::parse_request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Drives one client connection through request/response cycles until it
/// closes.
pub struct Connection<S> {
    reader: BufReader<Deadline<ReadHalf<S>>>,
    writer: WriteHalf<S>,
    config: Arc<Config>,
    peer: String,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingRequest,
    Writing(Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>, peer: impl Into<String>) -> Self {
        let (read_half, writer) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(Deadline::new(read_half, config.idle_timeout)),
            writer,
            config,
            peer: peer.into(),
            state: ConnectionState::AwaitingRequest,
        }
    }

    /// Serves requests until the connection ends.
    ///
    /// Returns `Ok` only when the client asked for `Connection: close` and
    /// got its response. Every other ending is reported as an error; a 400
    /// has already been sent for those that call for one.
    pub async fn run(&mut self) -> Result<(), ConnectionError> {
        let result = self.serve().await;
        self.state = ConnectionState::Closed;
        if let Err(e) = self.writer.shutdown().await {
            debug!(peer = %self.peer, error = %e, "shutdown failed");
        }
        result
    }

    async fn serve(&mut self) -> Result<(), ConnectionError> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequest => {
                    self.reader.get_mut().arm(self.config.idle_timeout);

                    match parse_request(&mut self.reader).await {
                        Ok(req) => {
                            info!(
                                peer = %self.peer,
                                method = req.method.as_str(),
                                host = %req.host,
                                target = %req.target,
                                close = req.close,
                                agent = req.header("User-Agent").unwrap_or("-"),
                                "handle good request"
                            );
                            let response = Response::serve(&req, &self.config.virtual_hosts).await;
                            self.state = ConnectionState::Writing(response);
                        }
                        Err(failure) => {
                            let err = ConnectionError::from(failure);
                            return Err(self.reject(err).await);
                        }
                    }
                }

                ConnectionState::Writing(response) => {
                    self.write(&response).await?;
                    debug!(peer = %self.peer, status = response.status.as_u16(), "response sent");

                    if response.closes_connection() {
                        self.state = ConnectionState::Closed;
                    } else {
                        self.state = ConnectionState::AwaitingRequest;
                    }
                }

                ConnectionState::Closed => return Ok(()),
            }
        }
    }

    /// Ends the connection after a failed parse, answering 400 unless the
    /// failure calls for a silent close.
    async fn reject(&mut self, err: ConnectionError) -> ConnectionError {
        match &err {
            ConnectionError::ConnectionClosedByPeer => {
                info!(peer = %self.peer, "connection closed by peer");
            }
            ConnectionError::IdleTimeout => {
                info!(peer = %self.peer, "connection timed out");
            }
            _ => {
                warn!(peer = %self.peer, error = %err, "handle bad request");
                if let Err(write_err) = self.write(&Response::bad_request()).await {
                    return write_err;
                }
            }
        }
        err
    }

    async fn write(&mut self, response: &Response) -> Result<(), ConnectionError> {
        let result = match ResponseWriter::new(response).await {
            Ok(mut writer) => writer.write_to_stream(&mut self.writer).await,
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            warn!(peer = %self.peer, error = %e, "failed to write response");
            ConnectionError::WriteFailure(e)
        })
    }
}
