use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::HTTP_VERSION;
use crate::http::response::Response;

/// Status line, headers and the blank line that ends them.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers, already sorted by name
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    /// Serializes `response`, reading its file body from disk.
    ///
    /// The file is read in full before anything is sent, so a failed read
    /// leaves the connection untouched.
    pub async fn new(response: &Response) -> io::Result<Self> {
        let mut buffer = serialize_head(response);
        if let Some(path) = &response.file_path {
            buffer.extend_from_slice(&tokio::fs::read(path).await?);
        }

        Ok(Self { buffer, written: 0 })
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }

            self.written += n;
        }

        stream.flush().await
    }
}
