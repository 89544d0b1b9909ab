//! Wi-Fi bring-up
//!
//! Brings the station interface up once at boot and waits until it holds an
//! address, blinking a heartbeat while it waits. The link is not watched
//! after that.

use log::{debug, error, info};

use crate::config::{ConnectPolicy, ConnectTimings, ConnectionIntent};
use crate::error::ConnectError;
use crate::ports::{StatusSignal, WifiInterface};

pub struct WifiConnector<W> {
    wifi: W,
    intent: ConnectionIntent,
    policy: ConnectPolicy,
    timings: ConnectTimings,
}

impl<W: WifiInterface> WifiConnector<W> {
    pub fn new(wifi: W, intent: ConnectionIntent) -> Self {
        Self {
            wifi,
            intent,
            policy: ConnectPolicy::UNBOUNDED,
            timings: ConnectTimings::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ConnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_timings(mut self, timings: ConnectTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Join the configured network and hand back the connected interface.
    ///
    /// With the default policy this only returns once the interface is
    /// connected; wrong credentials keep it blinking forever.
    pub async fn init_client<S: StatusSignal>(mut self, signal: &mut S) -> Result<W, ConnectError> {
        info!("wifi: init client");

        self.wifi.activate(true).await;
        debug!(
            "wifi: waiting {} ms after activation",
            self.timings.settle.as_millis()
        );
        signal.pause(self.timings.settle).await;

        self.wifi.configure(&self.intent.dhcp_hostname);
        self.wifi
            .connect(&self.intent.ssid, &self.intent.passphrase)
            .await;
        debug!("wifi: asked to connect to {}", self.intent.ssid);

        if let Some(address) = self.intent.static_address {
            info!("wifi: manually set ip/dns to {}/{}", address.ip, address.dns);
            let info = self.wifi.address_info().with_static(&address);
            self.wifi.set_address_info(info);
            info!("wifi: address set");
        }

        let mut attempts: u32 = 0;
        while !self.wifi.is_connected() {
            if let Some(max_attempts) = self.policy.max_attempts {
                if attempts >= max_attempts {
                    error!("wifi: still not connected after {attempts} attempts, giving up");
                    signal.blink(self.timings.failed).await;
                    return Err(ConnectError::Timeout { attempts });
                }
            }
            signal.heartbeat(self.timings.heartbeat).await;
            attempts = attempts.saturating_add(1);
            debug!("wifi: not connected yet ({attempts})");
        }

        info!("wifi: client connected, {}", self.wifi.address_info());
        signal.blink(self.timings.connected).await;

        Ok(self.wifi)
    }
}
