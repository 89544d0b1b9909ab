use embassy_net::{Config, IpAddress, Runner, Stack, StackResources, dns::DnsQueryType};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};

use crate::mk_static;

const MAX_CONNECTIONS: usize = 4;

/// Create the radio, the station interface and the network stack.
///
/// The stack starts without an IPv4 configuration; the Wi-Fi interface
/// installs DHCP or a static address once it is told how to connect.
pub fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*mk_static!(
        esp_radio::Controller<'static>,
        esp_radio::init().expect("Failed to initialize radio")
    );
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, WifiConfig::default())
            .expect("Failed to initialize Wi-Fi");

    let network_resources = mk_static!(
        StackResources<MAX_CONNECTIONS>,
        StackResources::<MAX_CONNECTIONS>::new()
    );
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        Config::default(),
        network_resources,
        stack_seed(),
    );

    (stack, runner, controller)
}

fn stack_seed() -> u64 {
    let rng = Rng::new();
    (u64::from(rng.random()) << 32) | u64::from(rng.random())
}

/// Resolves a hostname to an IP address
pub async fn resolve_host(stack: Stack<'static>, host: &str) -> Result<IpAddress, ()> {
    if let Ok(ip) = host.parse::<embassy_net::Ipv4Address>() {
        return Ok(IpAddress::Ipv4(ip));
    }

    let Ok(addresses) = stack.dns_query(host, DnsQueryType::A).await else {
        return Err(());
    };

    addresses.first().copied().ok_or(())
}
