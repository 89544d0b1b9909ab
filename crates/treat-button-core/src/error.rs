use core::fmt;

/// Failure of the network call itself, as reported by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The target URL could not be parsed
    InvalidUrl,
    /// Host name resolution failed
    Dns,
    /// TCP connection could not be established
    Connect,
    /// The connection broke while sending or receiving
    Io,
    /// The transport gave up waiting
    Timeout,
    /// The peer answered with something that is not an HTTP status line
    InvalidResponse,
    /// The request payload did not fit the send buffer
    Encode,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TransportError::InvalidUrl => "invalid url",
            TransportError::Dns => "dns lookup failed",
            TransportError::Connect => "connection failed",
            TransportError::Io => "connection reset",
            TransportError::Timeout => "timed out",
            TransportError::InvalidResponse => "malformed response",
            TransportError::Encode => "payload does not fit",
        };
        f.write_str(text)
    }
}

impl core::error::Error for TransportError {}

/// Outcome of a failed treat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Another request is still in flight; the new one was rejected, not queued
    AlreadyInProgress,
    /// The worker could not be started or ended without reporting
    WorkerUnavailable,
    /// The call failed before a status code was received
    Transport(TransportError),
    /// The server answered with a non-2xx status
    BadStatus(u16),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::AlreadyInProgress => f.write_str("request already in progress"),
            RequestError::WorkerUnavailable => f.write_str("request worker unavailable"),
            RequestError::Transport(err) => write!(f, "transport error: {err}"),
            RequestError::BadStatus(code) => write!(f, "returned status {code}"),
        }
    }
}

impl core::error::Error for RequestError {}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        RequestError::Transport(err)
    }
}

impl From<SpawnError> for RequestError {
    fn from(_err: SpawnError) -> Self {
        RequestError::WorkerUnavailable
    }
}

/// The worker could not be launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// No free worker slot
    Busy,
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no free worker slot")
    }
}

impl core::error::Error for SpawnError {}

/// Terminal failure of the Wi-Fi bring-up.
///
/// Only produced when a bounded [`ConnectPolicy`](crate::ConnectPolicy) is
/// configured; the default policy retries forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    Timeout { attempts: u32 },
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::Timeout { attempts } => {
                write!(f, "not connected after {attempts} attempts")
            }
        }
    }
}

impl core::error::Error for ConnectError {}

/// Invalid configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    SsidTooLong,
    PassphraseTooLong,
    HostnameTooLong,
    UrlTooLong,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConfigError::SsidTooLong => "ssid is too long",
            ConfigError::PassphraseTooLong => "passphrase is too long",
            ConfigError::HostnameTooLong => "dhcp hostname is too long",
            ConfigError::UrlTooLong => "treat url is too long",
        };
        f.write_str(text)
    }
}

impl core::error::Error for ConfigError {}
