//! Interfaces to the hardware and to the execution environment.

use core::future::Future;
use core::time::Duration;

use crate::blinker::{BlinkPlan, MIN_HEARTBEAT_PAUSE};
use crate::error::{SpawnError, TransportError};
use crate::net::AddressInfo;
use crate::request::RequestTicket;

/// Visible feedback for long-running operations.
///
/// Every operation suspends the caller cooperatively; none can fail.
pub trait StatusSignal {
    /// Run a full blink plan
    fn blink(&mut self, plan: BlinkPlan) -> impl Future<Output = ()>;

    /// Suspend without touching the LED
    fn pause(&mut self, duration: Duration) -> impl Future<Output = ()>;

    /// One iteration of a polling loop.
    ///
    /// Blinks `plan`, or pauses for its total (at least
    /// [`MIN_HEARTBEAT_PAUSE`]) when the plan has no whole cycle, so the
    /// caller always yields to other tasks.
    fn heartbeat(&mut self, plan: BlinkPlan) -> impl Future<Output = ()> {
        async move {
            if plan.cycles() == 0 {
                self.pause(plan.total.max(MIN_HEARTBEAT_PAUSE)).await;
            } else {
                self.blink(plan).await;
            }
        }
    }
}

impl<T: StatusSignal> StatusSignal for &mut T {
    fn blink(&mut self, plan: BlinkPlan) -> impl Future<Output = ()> {
        (**self).blink(plan)
    }

    fn pause(&mut self, duration: Duration) -> impl Future<Output = ()> {
        (**self).pause(duration)
    }

    fn heartbeat(&mut self, plan: BlinkPlan) -> impl Future<Output = ()> {
        (**self).heartbeat(plan)
    }
}

/// Wireless station interface.
///
/// Driver-level failures are not reported to the caller: an interface that
/// cannot join the network simply never reports itself as connected.
pub trait WifiInterface {
    /// Power the interface up or down
    fn activate(&mut self, active: bool) -> impl Future<Output = ()>;

    /// Apply the DHCP hostname option
    fn configure(&mut self, dhcp_hostname: &str);

    /// Ask the driver to join a network. Returns without waiting for the result.
    fn connect(&mut self, ssid: &str, passphrase: &str) -> impl Future<Output = ()>;

    /// Associated and holding an address
    fn is_connected(&self) -> bool;

    /// Current address tuple
    fn address_info(&self) -> AddressInfo;

    /// Replace the address tuple
    fn set_address_info(&mut self, info: AddressInfo);
}

/// Minimal HTTP client used by the request worker.
pub trait HttpClient {
    /// Send `body` as a JSON POST to `url` and return the response status code
    fn post_json(
        &mut self,
        url: &str,
        body: &[u8],
    ) -> impl Future<Output = Result<u16, TransportError>>;
}

/// Launches the worker that serves one request ticket.
///
/// The worker must run independently of the caller's scheduler and must
/// eventually complete the ticket.
pub trait RequestWorker {
    fn spawn(&mut self, ticket: RequestTicket) -> Result<(), SpawnError>;
}
