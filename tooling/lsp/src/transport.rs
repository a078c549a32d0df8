//! Content-Length framed JSON-RPC messages over byte streams.

use std::io::{self, BufRead, Write};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("missing Content-Length header")]
    MissingContentLength,
    #[error("invalid Content-Length header")]
    InvalidContentLength,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Read one message. `Ok(None)` is a clean end of stream between messages.
pub fn read_message<R: BufRead>(reader: &mut R) -> TransportResult<Option<Value>> {
    let Some(length) = read_headers(reader)? else {
        return Ok(None);
    };
    let mut body = vec![0_u8; length];
    reader.read_exact(&mut body)?;
    Ok(Some(serde_json::from_slice(&body)?))
}

/// Headers up to the blank line; only Content-Length matters, the rest
/// (Content-Type, mostly) are skipped.
fn read_headers<R: BufRead>(reader: &mut R) -> TransportResult<Option<usize>> {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return match content_length {
                None => Ok(None),
                Some(_) => Err(TransportError::MissingContentLength),
            };
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return match content_length {
                None => Err(TransportError::MissingContentLength),
                some => Ok(some),
            };
        }
        if let Some(value) = trimmed.strip_prefix("Content-Length:") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|_| TransportError::InvalidContentLength)?;
            content_length = Some(parsed);
        }
    }
}

pub fn write_message<W: Write>(writer: &mut W, payload: &Value) -> TransportResult<()> {
    let body = serde_json::to_vec(payload)?;
    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}
