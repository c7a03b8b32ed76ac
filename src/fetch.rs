//! Remote blocklist transport.
//!
//! Fetches a list over HTTP(S) and exposes the response body as a
//! [`LineSource`], pulling chunks from the connection only as lines are
//! consumed.

use std::io;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::config::HttpSettings;
use crate::filter::LineSource;

/// User-Agent header value for HTTP requests.
pub const USER_AGENT: &str = concat!("rpzgate/", env!("CARGO_PKG_VERSION"));

/// Error type for remote fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed with a non-success status code.
    #[error("HTTP request failed for {url}: status {status}")]
    HttpStatus {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned.
        status: u16,
    },

    /// Network error during HTTP request.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// URL that was requested.
        url: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// Timeout fetching the remote URL.
    #[error("timeout fetching {url}")]
    Timeout {
        /// URL that timed out.
        url: String,
    },

    /// The response body failed after streaming had started.
    #[error("transfer from {url} interrupted: {source}")]
    Interrupted {
        /// URL that was being streamed.
        url: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to create HTTP client.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Opens remote blocklists as line streams.
pub struct RemoteFetcher {
    client: Client,
}

impl RemoteFetcher {
    /// Create a new fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &HttpSettings) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(Self { client })
    }

    /// Send the request and return the body as a line stream.
    ///
    /// Only the status line and headers have been received when this
    /// returns; the body is read as the lines are consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if:
    /// - The HTTP request fails ([`TransportError::Network`])
    /// - The server returns a non-success status ([`TransportError::HttpStatus`])
    /// - The request times out ([`TransportError::Timeout`])
    pub async fn open(&self, url: &str) -> Result<ResponseLines, TransportError> {
        let response = self.client.get(url).send().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransportError::Network {
                    url: url.to_string(),
                    source: err,
                }
            }
        })?;

        if !response.status().is_success() {
            tracing::warn!(
                url = %url,
                status = %response.status(),
                "remote blocklist request failed"
            );
            return Err(TransportError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(ResponseLines::new(response))
    }
}

/// Line-by-line view of a streaming HTTP response body.
///
/// Lines end at LF or CRLF; a final line without a terminator is still
/// returned. Invalid UTF-8 is replaced rather than rejected.
pub struct ResponseLines {
    response: Response,
    buffer: LineBuffer,
    exhausted: bool,
}

impl ResponseLines {
    fn new(response: Response) -> Self {
        Self {
            response,
            buffer: LineBuffer::default(),
            exhausted: false,
        }
    }
}

impl LineSource for ResponseLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.buffer.next_line() {
                return Ok(Some(line));
            }
            if self.exhausted {
                return Ok(self.buffer.take_rest());
            }

            match self.response.chunk().await.map_err(io::Error::other)? {
                Some(chunk) => self.buffer.extend(&chunk),
                None => self.exhausted = true,
            }
        }
    }
}

/// Accumulates body chunks and splits them into lines.
///
/// Consumed bytes are only discarded when the next chunk arrives, and the
/// newline search resumes where the previous one stopped.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8>,
    /// Start of the first unconsumed line.
    start: usize,
    /// Bytes before this offset are known to contain no newline.
    scanned: usize,
}

impl LineBuffer {
    fn extend(&mut self, chunk: &[u8]) {
        if self.start > 0 {
            self.bytes.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
        self.bytes.extend_from_slice(chunk);
    }

    fn next_line(&mut self) -> Option<String> {
        match self.bytes[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(offset) => {
                let end = self.scanned + offset;
                let line = decode_line(&self.bytes[self.start..end]);
                self.start = end + 1;
                self.scanned = self.start;
                Some(line)
            }
            None => {
                self.scanned = self.bytes.len();
                None
            }
        }
    }

    fn take_rest(&mut self) -> Option<String> {
        if self.start == self.bytes.len() {
            return None;
        }
        let line = decode_line(&self.bytes[self.start..]);
        self.start = self.bytes.len();
        self.scanned = self.start;
        Some(line)
    }
}

fn decode_line(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
