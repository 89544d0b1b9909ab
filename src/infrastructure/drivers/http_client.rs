//! Minimal HTTP/1.1 client for the treat request
//!
//! One request per connection: the head and body are written, the status line
//! is read and the socket is closed. Response headers and body are ignored.

use core::fmt;

use embassy_net::Stack;
use embassy_net::tcp::{self, TcpSocket};
use embassy_time::Duration;
use embedded_io_async::Write as _;
use heapless::String;
use log::debug;
use treat_button_core::http::{InvalidStatusLine, RequestHead, Url, UrlError, parse_status_line};
use treat_button_core::{HttpClient, TransportError};

use super::resolve_host;

const RX_BUFFER_SIZE: usize = 512;
const TX_BUFFER_SIZE: usize = 512;
const HEAD_BUFFER_SIZE: usize = 256;
const STATUS_BUFFER_SIZE: usize = 128;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpClientError {
    Url(UrlError),
    Dns,
    Connect(tcp::ConnectError),
    Socket(tcp::Error),
    HeadTooLong,
    InvalidStatus,
    Closed,
}

impl fmt::Display for HttpClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpClientError::Url(e) => write!(f, "bad url: {e}"),
            HttpClientError::Dns => f.write_str("host not resolved"),
            HttpClientError::Connect(e) => write!(f, "connect failed: {e:?}"),
            HttpClientError::Socket(e) => write!(f, "socket error: {e:?}"),
            HttpClientError::HeadTooLong => f.write_str("request head too long"),
            HttpClientError::InvalidStatus => f.write_str("invalid status line"),
            HttpClientError::Closed => f.write_str("closed before status line"),
        }
    }
}

impl From<UrlError> for HttpClientError {
    fn from(e: UrlError) -> Self {
        HttpClientError::Url(e)
    }
}

impl From<tcp::ConnectError> for HttpClientError {
    fn from(e: tcp::ConnectError) -> Self {
        HttpClientError::Connect(e)
    }
}

impl From<tcp::Error> for HttpClientError {
    fn from(e: tcp::Error) -> Self {
        HttpClientError::Socket(e)
    }
}

impl From<InvalidStatusLine> for HttpClientError {
    fn from(_: InvalidStatusLine) -> Self {
        HttpClientError::InvalidStatus
    }
}

impl From<HttpClientError> for TransportError {
    fn from(e: HttpClientError) -> Self {
        match e {
            HttpClientError::Url(_) => TransportError::InvalidUrl,
            HttpClientError::Dns => TransportError::Dns,
            HttpClientError::Connect(tcp::ConnectError::TimedOut) => TransportError::Timeout,
            HttpClientError::Connect(_) => TransportError::Connect,
            HttpClientError::Socket(_) => TransportError::Io,
            HttpClientError::HeadTooLong => TransportError::Encode,
            HttpClientError::InvalidStatus | HttpClientError::Closed => {
                TransportError::InvalidResponse
            }
        }
    }
}

/// HTTP client opening a fresh TCP connection per request
pub struct TcpHttpClient {
    stack: Stack<'static>,
}

impl TcpHttpClient {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }

    async fn post(&mut self, url: &str, body: &[u8]) -> Result<u16, HttpClientError> {
        let url = Url::parse(url)?;
        let address = resolve_host(self.stack, url.host)
            .await
            .map_err(|()| HttpClientError::Dns)?;

        let mut head = String::<HEAD_BUFFER_SIZE>::new();
        RequestHead::json(&url, body.len())
            .write_to(&mut head)
            .map_err(|_| HttpClientError::HeadTooLong)?;

        let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
        let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
        let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(REQUEST_TIMEOUT));

        debug!("http: connecting to {:?}:{}", address, url.port);
        if let Err(e) = socket.connect((address, url.port)).await {
            socket.abort();
            return Err(e.into());
        }

        let result = exchange(&mut socket, head.as_bytes(), body).await;
        socket.close();
        result
    }
}

async fn exchange(
    socket: &mut TcpSocket<'_>,
    head: &[u8],
    body: &[u8],
) -> Result<u16, HttpClientError> {
    socket.write_all(head).await?;
    socket.write_all(body).await?;
    socket.flush().await?;

    let mut status = [0u8; STATUS_BUFFER_SIZE];
    let mut filled = 0;
    loop {
        if filled == status.len() {
            return Err(HttpClientError::InvalidStatus);
        }
        let n = socket.read(&mut status[filled..]).await?;
        if n == 0 {
            return Err(HttpClientError::Closed);
        }
        filled += n;
        if let Some(code) = parse_status_line(&status[..filled])? {
            return Ok(code);
        }
    }
}

impl HttpClient for TcpHttpClient {
    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<u16, TransportError> {
        self.post(url, body).await.map_err(|e| {
            debug!("http: {e}");
            e.into()
        })
    }
}
