use std::collections::BTreeMap;
use std::io;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Serializes a status line, headers and body into wire format.
///
/// Headers go out in map order, so the output is deterministic.
pub fn serialize_response(
    status: StatusCode,
    headers: &BTreeMap<String, String>,
    body: &[u8],
    buf: &mut BytesMut,
) {
    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    // Headers
    for (k, v) in headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    // Body
    buf.put_slice(body);
}

/// Collects one response for one handler invocation.
///
/// `status`, `header` and `body` only record state. `send` serializes that
/// state into the output buffer once; the connection flushes the buffer to
/// the socket after the handler returns. Bytes written through the
/// [`io::Write`] impl go to the same buffer verbatim and skip the automatic
/// status line and headers, so a handler should use one style or the other.
/// Raw writes are buffered too, not streamed: the whole output stays in
/// memory until the handler returns, with no size bound.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
    output: BytesMut,
    sent: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status code; the last call wins.
    pub fn status(&mut self, code: impl Into<StatusCode>) {
        self.status = Some(code.into());
    }

    /// Adds or replaces a header.
    pub fn header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Replaces the whole body.
    pub fn body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Serializes the response into the output buffer.
    ///
    /// Defaults the status to `200` and `Content-Type` to `text/plain`, and
    /// always recomputes `Content-Length` from the final body. Only the first
    /// call has any effect.
    pub fn send(&mut self) {
        if self.sent {
            tracing::warn!("response already sent, ignoring repeated send");
            return;
        }
        self.sent = true;

        let status = self.status.unwrap_or_default();

        if !self
            .headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("Content-Type"))
        {
            self.headers
                .insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        }

        self.headers
            .retain(|k, _| !k.eq_ignore_ascii_case("Content-Length"));
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());

        serialize_response(status, &self.headers, &self.body, &mut self.output);
    }

    /// The status that was, or will be, written by `send`.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or_default()
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// True once anything is waiting to go on the wire, from `send` or a raw write.
    pub fn has_output(&self) -> bool {
        self.sent || !self.output.is_empty()
    }

    /// Bytes waiting to be flushed.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Writes all pending output to `stream`, leaving the buffer empty.
    pub async fn write_to_stream<W: AsyncWrite + Unpin>(
        &mut self,
        stream: &mut W,
    ) -> anyhow::Result<()> {
        let mut written = 0;

        while written < self.output.len() {
            let n = stream.write(&self.output[written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            written += n;
        }

        stream.flush().await?;
        self.output.clear();

        Ok(())
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.output.put_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
