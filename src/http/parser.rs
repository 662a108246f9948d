use std::collections::HashMap;

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::http::line_reader::LineReader;
use crate::http::request::{parse_query, split_target, Method, Request};

pub const DEFAULT_MAX_BODY: usize = 64 * 1024;
pub const DEFAULT_MAX_HEADERS: usize = 100;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line")]
    BadRequestLine,
    #[error("header section too large")]
    HeaderTooLarge,
    #[error("invalid Content-Length")]
    BadContentLength,
    #[error("request body too large")]
    BodyTooLarge,
    #[error("request head is not valid UTF-8")]
    InvalidEncoding,
    #[error("unexpected EOF")]
    UnexpectedEof,
    #[error("end of stream")]
    EndOfStream,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// True for malformed input that deserves a `400` before closing.
    /// Stream failures and a clean close are not protocol errors.
    pub fn is_protocol_error(&self) -> bool {
        !matches!(self, ParseError::EndOfStream | ParseError::Io(_))
    }
}

/// Bounds enforced while parsing one request.
#[derive(Debug, Clone, Copy)]
pub struct ParseLimits {
    pub max_body: usize,
    pub max_headers: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_body: DEFAULT_MAX_BODY,
            max_headers: DEFAULT_MAX_HEADERS,
        }
    }
}

/// Reads exactly one request from `reader`.
///
/// Never reads past the declared body, so the next request on the same
/// connection starts at the first unread byte.
pub async fn parse_request<R: AsyncRead + Unpin>(
    reader: &mut LineReader<R>,
    limits: ParseLimits,
) -> Result<Request, ParseError> {
    // Request line
    let line = reader.read_line().await?;
    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[method, target, version] = fields.as_slice() else {
        return Err(ParseError::BadRequestLine);
    };

    let method = Method::from_str(method).ok_or(ParseError::BadRequestLine)?;
    let (path, qs) = split_target(target);

    // Headers
    let mut headers = HashMap::new();
    let mut count = 0;

    loop {
        let line = reader.read_line().await.map_err(|e| match e {
            ParseError::EndOfStream => ParseError::UnexpectedEof,
            e => e,
        })?;
        if line.is_empty() {
            break;
        }

        count += 1;
        if count > limits.max_headers {
            return Err(ParseError::HeaderTooLarge);
        }

        // Lines without a colon are skipped, not rejected.
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    // Body
    let body = match headers.get("Content-Length") {
        Some(raw) => {
            let len: usize = raw
                .trim()
                .parse()
                .map_err(|_| ParseError::BadContentLength)?;

            if len > limits.max_body {
                return Err(ParseError::BodyTooLarge);
            }

            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf).await?;
            Some(buf)
        }
        None => None,
    };

    Ok(Request {
        method,
        path: path.to_string(),
        query: parse_query(qs),
        params: HashMap::new(),
        headers,
        body,
        version: version.to_string(),
    })
}
