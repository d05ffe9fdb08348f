use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A read that stopped before a full line arrived.
#[derive(Debug)]
pub struct LineError {
    /// Whatever bytes were read before the failure.
    pub partial: Vec<u8>,
    pub source: io::Error,
}

impl From<LineError> for io::Error {
    fn from(err: LineError) -> Self {
        err.source
    }
}

/// Reads one CRLF-terminated line and returns it without the terminator.
///
/// A bare `\n` does not end a line. End of stream is reported as
/// `UnexpectedEof`; any deadline is the caller's business and shows up here
/// as an ordinary read error.
pub async fn read_line<R>(reader: &mut R) -> Result<String, LineError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                return Err(LineError {
                    partial: buf,
                    source: io::ErrorKind::UnexpectedEof.into(),
                });
            }
            Ok(_) if buf.ends_with(b"\r\n") => break,
            Ok(_) => continue,
            Err(source) => return Err(LineError { partial: buf, source }),
        }
    }

    buf.truncate(buf.len() - 2);
    String::from_utf8(buf).map_err(|e| LineError {
        partial: e.into_bytes(),
        source: io::Error::new(io::ErrorKind::InvalidData, "line is not valid UTF-8"),
    })
}
