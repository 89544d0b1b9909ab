//! Pieces of HTTP/1.1 the request worker needs: URL splitting, the request
//! head and the status line of the response.

use core::fmt::{self, Write};

pub type StatusCode = u16;

/// Port used when the URL names none
pub const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlError {
    /// Only plain `http://` is supported
    UnsupportedScheme,
    MissingHost,
    InvalidPort,
}

impl fmt::Display for UrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UrlError::UnsupportedScheme => "unsupported scheme",
            UrlError::MissingHost => "missing host",
            UrlError::InvalidPort => "invalid port",
        };
        f.write_str(text)
    }
}

impl core::error::Error for UrlError {}

/// A split `http://host[:port]/path` URL borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Url<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

impl<'a> Url<'a> {
    pub fn parse(url: &'a str) -> Result<Self, UrlError> {
        let rest = url
            .strip_prefix("http://")
            .ok_or(UrlError::UnsupportedScheme)?;

        let (authority, path) = match rest.find('/') {
            Some(pos) => rest.split_at(pos),
            None => (rest, "/"),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (
                host,
                port.parse::<u16>().map_err(|_| UrlError::InvalidPort)?,
            ),
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self { host, port, path })
    }
}

/// HTTP Content Type.
#[derive(Debug)]
pub enum ContentType {
    Json,
}

impl ContentType {
    fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
        }
    }
}

/// Head of a POST request.
pub struct RequestHead<'a> {
    url: &'a Url<'a>,
    content_type: ContentType,
    content_length: usize,
}

impl<'a> RequestHead<'a> {
    pub const fn json(url: &'a Url<'a>, content_length: usize) -> Self {
        Self {
            url,
            content_type: ContentType::Json,
            content_length,
        }
    }

    /// Write the request line and headers, including the blank line
    pub fn write_to(&self, writer: &mut impl Write) -> fmt::Result {
        write!(writer, "POST {} HTTP/1.1\r\n", self.url.path)?;
        if self.url.port == DEFAULT_PORT {
            write!(writer, "Host: {}\r\n", self.url.host)?;
        } else {
            write!(writer, "Host: {}:{}\r\n", self.url.host, self.url.port)?;
        }
        write!(writer, "Content-Type: {}\r\n", self.content_type.as_str())?;
        write!(writer, "Content-Length: {}\r\n", self.content_length)?;
        write!(writer, "Connection: close\r\n")?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}

/// Status line of a response could not be understood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatusLine;

/// Parse the status code from the start of a response.
///
/// Returns `Ok(None)` while the first line is still incomplete.
pub fn parse_status_line(buf: &[u8]) -> Result<Option<StatusCode>, InvalidStatusLine> {
    let Some(line_end) = buf.windows(2).position(|w| w == b"\r\n") else {
        return Ok(None);
    };
    let line = core::str::from_utf8(&buf[..line_end]).map_err(|_| InvalidStatusLine)?;

    let mut parts = line.split_whitespace();
    let version = parts.next().ok_or(InvalidStatusLine)?;
    if !version.starts_with("HTTP/") {
        return Err(InvalidStatusLine);
    }
    let code = parts.next().ok_or(InvalidStatusLine)?;
    if code.len() != 3 {
        return Err(InvalidStatusLine);
    }
    code.parse::<StatusCode>()
        .map(Some)
        .map_err(|_| InvalidStatusLine)
}
