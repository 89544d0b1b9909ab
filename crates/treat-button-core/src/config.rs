use core::net::Ipv4Addr;
use core::time::Duration;

use heapless::String;
use serde::Serialize;

use crate::blinker::BlinkPlan;
use crate::error::ConfigError;

/// Maximum length of the network name
pub const MAX_SSID_LEN: usize = 32;

/// Maximum length of the WPA passphrase
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Maximum length of the DHCP hostname
pub const MAX_HOSTNAME_LEN: usize = 32;

/// Maximum length of the treat endpoint URL
pub const MAX_URL_LEN: usize = 128;

/// Size of the buffer the JSON payload is rendered into
pub const PAYLOAD_CAPACITY: usize = 32;

/// Static IPv4 settings applied instead of the DHCP lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAddress {
    pub ip: Ipv4Addr,
    pub dns: Ipv4Addr,
}

/// What network to join and how to present ourselves on it.
#[derive(Debug, Clone)]
pub struct ConnectionIntent {
    pub ssid: String<MAX_SSID_LEN>,
    pub passphrase: String<MAX_PASSPHRASE_LEN>,
    pub dhcp_hostname: String<MAX_HOSTNAME_LEN>,
    pub static_address: Option<StaticAddress>,
}

impl ConnectionIntent {
    pub fn new(ssid: &str, passphrase: &str, dhcp_hostname: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            ssid: String::try_from(ssid).map_err(|()| ConfigError::SsidTooLong)?,
            passphrase: String::try_from(passphrase)
                .map_err(|()| ConfigError::PassphraseTooLong)?,
            dhcp_hostname: String::try_from(dhcp_hostname)
                .map_err(|()| ConfigError::HostnameTooLong)?,
            static_address: None,
        })
    }

    #[must_use]
    pub fn with_static_address(mut self, address: StaticAddress) -> Self {
        self.static_address = Some(address);
        self
    }
}

/// How long the connection loop may keep trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectPolicy {
    /// Heartbeats to wait before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl ConnectPolicy {
    pub const UNBOUNDED: Self = Self { max_attempts: None };

    pub const fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }
}

/// Delays and blink plans used while joining the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectTimings {
    /// Pause after powering the interface up; the driver ignores configuration before that
    pub settle: Duration,
    /// One "still trying" heartbeat per connection check
    pub heartbeat: BlinkPlan,
    /// Shown once the interface is connected
    pub connected: BlinkPlan,
    /// Shown when a bounded policy gives up
    pub failed: BlinkPlan,
}

impl ConnectTimings {
    pub const DEFAULT: Self = Self {
        settle: Duration::from_secs(1),
        heartbeat: BlinkPlan::from_millis(200, 50),
        connected: BlinkPlan::from_millis(2000, 500),
        failed: BlinkPlan::from_millis(600, 30),
    };
}

impl Default for ConnectTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Delays and blink plans used while a request is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimings {
    /// Poll interval while waiting for the worker to start
    pub dispatch_poll: Duration,
    /// One heartbeat per check of the in-flight request
    pub heartbeat: BlinkPlan,
    pub success: BlinkPlan,
    pub error: BlinkPlan,
}

impl RequestTimings {
    pub const DEFAULT: Self = Self {
        dispatch_poll: Duration::from_millis(10),
        heartbeat: BlinkPlan::from_millis(100, 50),
        success: BlinkPlan::from_millis(600, 100),
        error: BlinkPlan::from_millis(600, 30),
    };
}

impl Default for RequestTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTimings {
    pub sample_interval: Duration,
}

impl ButtonTimings {
    pub const DEFAULT: Self = Self {
        sample_interval: Duration::from_millis(50),
    };
}

impl Default for ButtonTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Body sent to the dispenser
#[derive(Serialize)]
struct TreatPayload {
    portion: i8,
}

/// The remote action triggered by a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatRequest {
    url: String<MAX_URL_LEN>,
    portion: i8,
}

impl TreatRequest {
    pub fn new(url: &str, portion: i8) -> Result<Self, ConfigError> {
        Ok(Self {
            url: String::try_from(url).map_err(|()| ConfigError::UrlTooLong)?,
            portion,
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn portion(&self) -> i8 {
        self.portion
    }

    /// Render the JSON body into `buf` and return its length
    pub fn encode_body(&self, buf: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
        serde_json_core::to_slice(
            &TreatPayload {
                portion: self.portion,
            },
            buf,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_portion() {
        let request = TreatRequest::new("http://dispenser.local:2477/treat", 2).unwrap();
        let mut buf = [0u8; PAYLOAD_CAPACITY];
        let n = request.encode_body(&mut buf).unwrap();
        assert_eq!(&buf[..n], br#"{"portion":2}"#);
    }

    #[test]
    fn widest_payload_fits_buffer() {
        let request = TreatRequest::new("http://x/", i8::MIN).unwrap();
        let mut buf = [0u8; PAYLOAD_CAPACITY];
        let n = request.encode_body(&mut buf).unwrap();
        assert_eq!(&buf[..n], br#"{"portion":-128}"#);
    }

    #[test]
    fn oversized_strings_are_rejected() {
        let long = "x".repeat(MAX_SSID_LEN + 1);
        assert_eq!(
            ConnectionIntent::new(&long, "pass", "host").unwrap_err(),
            ConfigError::SsidTooLong
        );
        let long_url = "u".repeat(MAX_URL_LEN + 1);
        assert_eq!(
            TreatRequest::new(&long_url, 1).unwrap_err(),
            ConfigError::UrlTooLong
        );
    }
}
