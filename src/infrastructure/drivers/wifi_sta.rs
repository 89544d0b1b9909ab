use core::net::Ipv4Addr;

use embassy_net::{ConfigV4, DhcpConfig, Ipv4Cidr, Stack, StaticConfigV4};
use esp_radio::wifi::{AuthMethod, ClientConfig, ModeConfig, WifiController, WifiStaState};
use heapless::{String, Vec};
use log::warn;
use treat_button_core::{AddressInfo, WifiInterface};

/// Wi-Fi station on top of the esp-radio controller and the embassy-net stack
pub struct EspWifiInterface {
    controller: WifiController<'static>,
    stack: Stack<'static>,
}

impl EspWifiInterface {
    pub fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self { controller, stack }
    }
}

impl WifiInterface for EspWifiInterface {
    async fn activate(&mut self, active: bool) {
        let result = if active {
            if matches!(self.controller.is_started(), Ok(true)) {
                return;
            }
            let mode_config = ModeConfig::Client(ClientConfig::default());
            if let Err(e) = self.controller.set_config(&mode_config) {
                warn!("network: failed to set station mode: {e:?}");
            }
            self.controller.start_async().await
        } else {
            self.controller.stop_async().await
        };
        if let Err(e) = result {
            warn!("network: failed to switch radio (active: {active}): {e:?}");
        }
    }

    fn configure(&mut self, dhcp_hostname: &str) {
        let mut dhcp_config = DhcpConfig::default();
        let mut hostname = String::new();
        if hostname.push_str(dhcp_hostname).is_ok() {
            dhcp_config.hostname = Some(hostname);
        } else {
            warn!("network: hostname too long, not sent");
        }
        self.stack.set_config_v4(ConfigV4::Dhcp(dhcp_config));
    }

    async fn connect(&mut self, ssid: &str, passphrase: &str) {
        let client_config = if passphrase.is_empty() {
            ClientConfig::default()
                .with_ssid(ssid.into())
                .with_auth_method(AuthMethod::None)
        } else {
            ClientConfig::default()
                .with_ssid(ssid.into())
                .with_password(passphrase.into())
        };
        if let Err(e) = self.controller.set_config(&ModeConfig::Client(client_config)) {
            warn!("network: failed to apply credentials: {e:?}");
            return;
        }
        // Association runs in the background; progress is polled via `is_connected`
        if let Err(e) = self.controller.connect() {
            warn!("network: error connecting: {e:?}");
        }
    }

    fn is_connected(&self) -> bool {
        esp_radio::wifi::sta_state() == WifiStaState::Connected
            && self.stack.is_link_up()
            && self.stack.config_v4().is_some()
    }

    fn address_info(&self) -> AddressInfo {
        let Some(config) = self.stack.config_v4() else {
            return AddressInfo::UNSPECIFIED;
        };
        AddressInfo::from_prefix(
            config.address.address(),
            config.address.prefix_len(),
            config.gateway.unwrap_or(Ipv4Addr::UNSPECIFIED),
            config
                .dns_servers
                .first()
                .copied()
                .unwrap_or(Ipv4Addr::UNSPECIFIED),
        )
    }

    fn set_address_info(&mut self, info: AddressInfo) {
        let dns_servers = Vec::from_slice(&[info.dns]).unwrap_or_default();
        let gateway = (!info.gateway.is_unspecified()).then_some(info.gateway);
        self.stack.set_config_v4(ConfigV4::Static(StaticConfigV4 {
            address: Ipv4Cidr::new(info.ip, info.prefix_len()),
            gateway,
            dns_servers,
        }));
    }
}
