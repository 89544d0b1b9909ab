use core::net::Ipv4Addr;

use log::warn;
use treat_button_core::{
    ConfigError, ConnectPolicy, ConnectionIntent, StaticAddress, TreatRequest,
};

pub(crate) struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
    pub hostname: &'static str,
    pub static_ip: Option<&'static str>,
    pub static_dns: Option<&'static str>,
    pub max_attempts: Option<&'static str>,
}

pub(crate) struct TreatConfig {
    pub url: &'static str,
    pub portion: Option<&'static str>,
}

const DEFAULT_HOSTNAME: &str = "treat-button";
const DEFAULT_PORTION: i8 = 1;

pub(crate) const WIFI: WifiConfig = WifiConfig {
    ssid: env!("WIFI_SSID"),
    password: env!("WIFI_PASSWORD"),
    hostname: match option_env!("WIFI_HOSTNAME") {
        Some(hostname) => hostname,
        None => DEFAULT_HOSTNAME,
    },
    static_ip: option_env!("WIFI_STATIC_IP"),
    static_dns: option_env!("WIFI_STATIC_DNS"),
    max_attempts: option_env!("WIFI_MAX_ATTEMPTS"),
};

pub(crate) const TREAT: TreatConfig = TreatConfig {
    url: env!("TREAT_URL"),
    portion: option_env!("TREAT_PORTION"),
};

/// Network to join, with the static address if both parts are configured
pub fn connection_intent() -> Result<ConnectionIntent, ConfigError> {
    let intent = ConnectionIntent::new(WIFI.ssid, WIFI.password, WIFI.hostname)?;

    let (ip, dns) = match (WIFI.static_ip, WIFI.static_dns) {
        (None, None) => return Ok(intent),
        (Some(ip), Some(dns)) => (ip.parse::<Ipv4Addr>(), dns.parse::<Ipv4Addr>()),
        _ => {
            warn!("config: static address needs both WIFI_STATIC_IP and WIFI_STATIC_DNS, using dhcp");
            return Ok(intent);
        }
    };
    match (ip, dns) {
        (Ok(ip), Ok(dns)) => Ok(intent.with_static_address(StaticAddress { ip, dns })),
        _ => {
            warn!("config: invalid static address, using dhcp");
            Ok(intent)
        }
    }
}

/// Retry limit for joining the network; unbounded unless configured
pub fn connect_policy() -> ConnectPolicy {
    match WIFI.max_attempts.map(str::parse::<u32>) {
        None => ConnectPolicy::UNBOUNDED,
        Some(Ok(attempts)) if attempts > 0 => ConnectPolicy::bounded(attempts),
        Some(_) => {
            warn!("config: invalid WIFI_MAX_ATTEMPTS, retrying forever");
            ConnectPolicy::UNBOUNDED
        }
    }
}

pub fn treat_request() -> Result<TreatRequest, ConfigError> {
    let portion = match TREAT.portion.map(str::parse::<i8>) {
        None => DEFAULT_PORTION,
        Some(Ok(portion)) => portion,
        Some(Err(_)) => {
            warn!("config: invalid TREAT_PORTION, using {DEFAULT_PORTION}");
            DEFAULT_PORTION
        }
    };
    TreatRequest::new(TREAT.url, portion)
}

#[macro_export]
macro_rules! led_gpio {
    ($p:expr) => {
        $p.GPIO2
    };
}

#[macro_export]
macro_rules! button_gpio {
    ($p:expr) => {
        $p.GPIO15
    };
}
