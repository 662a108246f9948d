use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::http::parser::ParseError;

pub const DEFAULT_MAX_LINE: usize = 4096;

/// Buffers a byte stream and hands out bounded, newline-terminated lines.
///
/// A line is never held in memory past `max_line` bytes: as soon as the
/// running length exceeds the bound the read fails with
/// [`ParseError::HeaderTooLarge`], whether or not a terminator was seen.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_line: usize,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(stream: R) -> Self {
        Self::with_max_line(stream, DEFAULT_MAX_LINE)
    }

    pub fn with_max_line(stream: R, max_line: usize) -> Self {
        Self {
            inner: BufReader::new(stream),
            max_line,
        }
    }

    /// Returns the next line with trailing CR/LF stripped.
    ///
    /// A clean close before any byte of the line yields
    /// [`ParseError::EndOfStream`]; a close mid-line yields
    /// [`ParseError::UnexpectedEof`]. Bytes that are not UTF-8 fail with
    /// [`ParseError::InvalidEncoding`] rather than being rewritten.
    pub async fn read_line(&mut self) -> Result<String, ParseError> {
        let mut line = Vec::new();

        loop {
            let available = self.inner.fill_buf().await?;

            if available.is_empty() {
                return Err(if line.is_empty() {
                    ParseError::EndOfStream
                } else {
                    ParseError::UnexpectedEof
                });
            }

            let (chunk, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (&available[..=i], true),
                None => (available, false),
            };

            if line.len() + chunk.len() > self.max_line {
                return Err(ParseError::HeaderTooLarge);
            }

            line.extend_from_slice(chunk);
            let used = chunk.len();
            self.inner.consume(used);

            if done {
                break;
            }
        }

        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }

        String::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)
    }

    /// Fills `buf` completely from the stream, draining buffered bytes first.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ParseError> {
        self.inner.read_exact(buf).await?;
        Ok(())
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut()
    }
}
