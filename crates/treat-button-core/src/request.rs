//! Hands the treat request to a worker and waits for it without blocking
//!
//! The cooperative side and the worker share one [`RequestSlot`]: an atomic
//! guard that says whether a request is running and a one-shot slot that
//! carries the response back. The worker is the only writer of the slot and
//! releases the guard after writing; the cooperative side reads the slot only
//! after it has seen the guard go idle.

use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{debug, error, info};

use crate::config::{PAYLOAD_CAPACITY, RequestTimings, TreatRequest};
use crate::error::{RequestError, TransportError};
use crate::ports::{HttpClient, RequestWorker, StatusSignal};

const IDLE: u8 = 0;
const STARTING: u8 = 1;
const IN_FLIGHT: u8 = 2;

/// Response of one network call: status code or transport failure
pub type Response = Result<u16, TransportError>;

/// Where the shared request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// No request outstanding
    Idle,
    /// Guard taken, worker not running yet
    Starting,
    /// Worker is performing the call
    InFlight,
}

/// Guard and response slot shared between the caller and the worker.
pub struct RequestSlot {
    guard: AtomicU8,
    response: Signal<CriticalSectionRawMutex, Response>,
}

impl RequestSlot {
    pub const fn new() -> Self {
        Self {
            guard: AtomicU8::new(IDLE),
            response: Signal::new(),
        }
    }

    pub fn phase(&self) -> RequestPhase {
        match self.guard.load(Ordering::Acquire) {
            IDLE => RequestPhase::Idle,
            STARTING => RequestPhase::Starting,
            _ => RequestPhase::InFlight,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase() != RequestPhase::Idle
    }

    /// Take the guard. `None` if a request is already outstanding.
    pub fn try_acquire(&'static self) -> Option<RequestTicket> {
        self.guard
            .compare_exchange(IDLE, STARTING, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.response.reset();
        Some(RequestTicket { slot: self })
    }

    fn take_response(&self) -> Option<Response> {
        self.response.try_take()
    }
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Permission to run the one outstanding request.
///
/// Moved into the worker; completing it publishes the response and releases
/// the guard. Dropping it without completing, including on unwind, releases
/// the guard with no response.
pub struct RequestTicket {
    slot: &'static RequestSlot,
}

impl RequestTicket {
    /// Report that the worker is running
    pub fn start(&self) {
        self.slot.guard.store(IN_FLIGHT, Ordering::Release);
    }

    /// Publish the response and release the guard
    pub fn complete(self, response: Response) {
        self.slot.response.signal(response);
    }
}

impl Drop for RequestTicket {
    fn drop(&mut self) {
        self.slot.guard.store(IDLE, Ordering::Release);
    }
}

/// Worker body: perform the POST and complete the ticket.
pub async fn serve_request<C: HttpClient>(
    client: &mut C,
    request: &TreatRequest,
    ticket: RequestTicket,
) {
    ticket.start();

    let mut body = [0u8; PAYLOAD_CAPACITY];
    let response = match request.encode_body(&mut body) {
        Ok(len) => client.post_json(request.url(), &body[..len]).await,
        Err(_) => Err(TransportError::Encode),
    };
    if let Err(err) = response {
        error!("request: calling {} failed: {}", request.url(), err);
    }

    ticket.complete(response);
}

/// Cooperative side of the request.
pub struct RequestBridge<W> {
    slot: &'static RequestSlot,
    worker: W,
    timings: RequestTimings,
}

impl<W: RequestWorker> RequestBridge<W> {
    pub fn new(slot: &'static RequestSlot, worker: W) -> Self {
        Self {
            slot,
            worker,
            timings: RequestTimings::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: RequestTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn slot(&self) -> &'static RequestSlot {
        self.slot
    }

    /// Run one treat request to completion.
    ///
    /// Returns immediately with [`RequestError::AlreadyInProgress`] if another
    /// request holds the guard. Every other failure is reported with the error
    /// blink; success is confirmed with the long blink.
    pub async fn perform_request<S: StatusSignal>(
        &mut self,
        signal: &mut S,
    ) -> Result<(), RequestError> {
        let Some(ticket) = self.slot.try_acquire() else {
            info!("request: already in progress, rejected");
            return Err(RequestError::AlreadyInProgress);
        };

        match self.await_response(ticket, signal).await {
            Ok(()) => {
                signal.blink(self.timings.success).await;
                Ok(())
            }
            Err(err) => {
                error!("request: {err}");
                signal.blink(self.timings.error).await;
                Err(err)
            }
        }
    }

    async fn await_response<S: StatusSignal>(
        &mut self,
        ticket: RequestTicket,
        signal: &mut S,
    ) -> Result<(), RequestError> {
        // A failed spawn drops the ticket, which releases the guard
        self.worker.spawn(ticket)?;

        while self.slot.phase() == RequestPhase::Starting {
            signal.pause(self.timings.dispatch_poll).await;
        }
        info!("request: started, waiting for worker to finish");

        let mut polls: u32 = 0;
        while self.slot.is_busy() {
            polls = polls.saturating_add(1);
            debug!("request: worker still running ({polls})");
            signal.heartbeat(self.timings.heartbeat).await;
        }

        let status = self
            .slot
            .take_response()
            .ok_or_else(|| {
                error!("request: worker ended without a response");
                RequestError::WorkerUnavailable
            })??;
        if status / 100 != 2 {
            return Err(RequestError::BadStatus(status));
        }
        info!("request: done with status {status}");
        Ok(())
    }
}
