use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::Limits;
use crate::http::handler::Handler;
use crate::http::line_reader::LineReader;
use crate::http::parser::{parse_request, ParseError, ParseLimits};
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

/// One accepted socket and the request/response cycles run over it.
pub struct Connection<S> {
    reader: LineReader<S>,
    handler: Arc<dyn Handler>,
    parse_limits: ParseLimits,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingRequest,
    Dispatching(Request),
    Responding(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S, handler: Arc<dyn Handler>, limits: &Limits) -> Self {
        Self {
            reader: LineReader::with_max_line(stream, limits.max_line_bytes),
            handler,
            parse_limits: ParseLimits {
                max_body: limits.max_body_bytes,
                max_headers: limits.max_headers,
            },
            read_timeout: limits.read_timeout(),
            write_timeout: limits.write_timeout(),
            state: ConnectionState::AwaitingRequest,
        }
    }

    /// Serves requests until the peer closes, asks to close, or sends
    /// something unparsable.
    ///
    /// Returns an error only for socket-level failures.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequest => match self.read_request().await {
                    Ok(Some(req)) => {
                        self.state = ConnectionState::Dispatching(req);
                    }
                    Ok(None) | Err(ParseError::EndOfStream) => {
                        self.state = ConnectionState::Closed;
                    }
                    Err(e) if e.is_protocol_error() => {
                        warn!(error = %e, "rejecting malformed request");
                        self.reject(&e).await;
                        self.state = ConnectionState::Closed;
                    }
                    Err(e) => return Err(e.into()),
                },

                ConnectionState::Dispatching(mut req) => {
                    let keep_alive = req.keep_alive();
                    let mut writer = ResponseWriter::new();

                    self.handler.serve(&mut writer, &mut req);

                    if !writer.has_output() {
                        warn!(path = %req.path, "handler returned without responding");
                        writer.send();
                    }

                    debug!(
                        method = %req.method,
                        path = %req.path,
                        status = writer.status_code().as_u16(),
                        keep_alive,
                        "request handled"
                    );
                    self.state = ConnectionState::Responding(writer, keep_alive);
                }

                ConnectionState::Responding(mut writer, keep_alive) => {
                    self.write_response(&mut writer).await?;

                    if keep_alive {
                        self.state = ConnectionState::AwaitingRequest; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Parses the next request, or `None` if the read deadline passed first.
    async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        let parse = parse_request(&mut self.reader, self.parse_limits);

        match self.read_timeout {
            Some(limit) => match timeout(limit, parse).await {
                Ok(res) => res.map(Some),
                Err(_) => {
                    debug!("read deadline passed, closing connection");
                    Ok(None)
                }
            },
            None => parse.await.map(Some),
        }
    }

    async fn write_response(&mut self, writer: &mut ResponseWriter) -> anyhow::Result<()> {
        let stream = self.reader.get_mut();

        match self.write_timeout {
            Some(limit) => timeout(limit, writer.write_to_stream(stream))
                .await
                .map_err(|_| anyhow::anyhow!("write deadline passed"))?,
            None => writer.write_to_stream(stream).await,
        }
    }

    /// Best-effort `400` for a request that failed to parse.
    async fn reject(&mut self, err: &ParseError) {
        let mut writer = ResponseWriter::new();
        writer.status(StatusCode::BAD_REQUEST);
        writer.header("Connection", "close");
        writer.body(err.to_string());
        writer.send();

        if let Err(e) = self.write_response(&mut writer).await {
            debug!(error = %e, "could not deliver 400 response");
        }
    }
}
