//! Fakes shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::Ipv4Addr;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use treat_button_core::request::Response;
use treat_button_core::{
    AddressInfo, BlinkPlan, Blinker, HttpClient, RequestSlot, RequestTicket, RequestWorker,
    SpawnError, StatusSignal, TransportError, TreatRequest, WifiInterface, serve_request,
};

// -----------------------------------------------------------------------------
// LED and delay
// -----------------------------------------------------------------------------

/// Counts how often the LED was switched on and off
#[derive(Debug, Default)]
pub struct FakeLed {
    pub on: u32,
    pub off: u32,
}

impl ErrorType for FakeLed {
    type Error = Infallible;
}

impl OutputPin for FakeLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.off += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.on += 1;
        Ok(())
    }
}

/// Adds up requested delays and yields once per call instead of sleeping
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub total_ns: u64,
    pub calls: u32,
}

impl FakeDelay {
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_ns)
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
        embassy_futures::yield_now().await;
    }
}

pub type TestBlinker = Blinker<FakeLed, FakeDelay>;

pub fn blinker() -> TestBlinker {
    Blinker::new(FakeLed::default(), FakeDelay::default())
}

// -----------------------------------------------------------------------------
// Recording status signal
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Blink(BlinkPlan),
    Pause(Duration),
}

/// Records every call before handing it to a real blinker
pub struct Recorder {
    pub events: Vec<SignalEvent>,
    pub blinker: TestBlinker,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            blinker: blinker(),
        }
    }

    pub fn blinks(&self) -> Vec<BlinkPlan> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SignalEvent::Blink(plan) => Some(*plan),
                SignalEvent::Pause(_) => None,
            })
            .collect()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SignalEvent::Pause(duration) => Some(*duration),
                SignalEvent::Blink(_) => None,
            })
            .collect()
    }

    /// Give back the LED and delay to inspect what was driven
    pub fn into_parts(self) -> (FakeLed, FakeDelay) {
        self.blinker.release()
    }
}

impl StatusSignal for Recorder {
    async fn blink(&mut self, plan: BlinkPlan) {
        self.events.push(SignalEvent::Blink(plan));
        self.blinker.blink(plan).await;
    }

    async fn pause(&mut self, duration: Duration) {
        self.events.push(SignalEvent::Pause(duration));
        self.blinker.pause(duration).await;
    }
}

// -----------------------------------------------------------------------------
// Wi-Fi
// -----------------------------------------------------------------------------

/// Station interface that connects after a fixed number of polls
#[derive(Debug)]
pub struct FakeWifi {
    pub active: Option<bool>,
    pub hostname: Option<String>,
    pub credentials: Option<(String, String)>,
    pub address: AddressInfo,
    pub applied: Vec<AddressInfo>,
    polls: Cell<u32>,
    connected_on_poll: Option<u32>,
}

impl FakeWifi {
    /// Reports connected from poll number `poll` on (1-based)
    pub fn connecting_on_poll(poll: u32) -> Self {
        Self {
            active: None,
            hostname: None,
            credentials: None,
            address: AddressInfo::UNSPECIFIED,
            applied: Vec::new(),
            polls: Cell::new(0),
            connected_on_poll: Some(poll),
        }
    }

    pub fn never_connecting() -> Self {
        Self {
            connected_on_poll: None,
            ..Self::connecting_on_poll(0)
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: AddressInfo) -> Self {
        self.address = address;
        self
    }

    pub fn polls(&self) -> u32 {
        self.polls.get()
    }
}

impl WifiInterface for FakeWifi {
    async fn activate(&mut self, active: bool) {
        self.active = Some(active);
    }

    fn configure(&mut self, dhcp_hostname: &str) {
        self.hostname = Some(dhcp_hostname.to_owned());
    }

    async fn connect(&mut self, ssid: &str, passphrase: &str) {
        self.credentials = Some((ssid.to_owned(), passphrase.to_owned()));
    }

    fn is_connected(&self) -> bool {
        let poll = self.polls.get() + 1;
        self.polls.set(poll);
        self.connected_on_poll.is_some_and(|target| poll >= target)
    }

    fn address_info(&self) -> AddressInfo {
        self.address
    }

    fn set_address_info(&mut self, info: AddressInfo) {
        self.address = info;
        self.applied.push(info);
    }
}

pub fn ip(a: u8, b: u8, c: u8, d: u8) -> Ipv4Addr {
    Ipv4Addr::new(a, b, c, d)
}

// -----------------------------------------------------------------------------
// HTTP and worker
// -----------------------------------------------------------------------------

/// Bodies and URLs seen by the fake HTTP client, shared with the test
pub type SentLog = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

pub struct FakeHttp {
    response: Response,
    gate: Option<Receiver<()>>,
    sent: SentLog,
}

impl HttpClient for FakeHttp {
    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<u16, TransportError> {
        if let Some(gate) = self.gate.take() {
            let _ = gate.recv();
        }
        self.sent
            .lock()
            .unwrap()
            .push((url.to_owned(), body.to_vec()));
        self.response
    }
}

/// Serves each ticket on a fresh OS thread
pub struct ThreadWorker {
    pub request: TreatRequest,
    pub response: Response,
    pub spawned: Arc<AtomicUsize>,
    pub sent: SentLog,
    gate: Option<Receiver<()>>,
}

impl ThreadWorker {
    pub fn new(response: Response) -> Self {
        Self {
            request: treat_request(),
            response,
            spawned: Arc::new(AtomicUsize::new(0)),
            sent: Arc::default(),
            gate: None,
        }
    }

    /// Hold the next call until the sender side is signalled or dropped
    #[must_use]
    pub fn gated(mut self, gate: Receiver<()>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Second worker sharing this one's counters
    pub fn sibling(&self) -> Self {
        Self {
            request: self.request.clone(),
            response: self.response,
            spawned: Arc::clone(&self.spawned),
            sent: Arc::clone(&self.sent),
            gate: None,
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }
}

impl RequestWorker for ThreadWorker {
    fn spawn(&mut self, ticket: RequestTicket) -> Result<(), SpawnError> {
        self.spawned.fetch_add(1, Ordering::SeqCst);
        let request = self.request.clone();
        let mut client = FakeHttp {
            response: self.response,
            gate: self.gate.take(),
            sent: Arc::clone(&self.sent),
        };
        std::thread::spawn(move || {
            embassy_futures::block_on(serve_request(&mut client, &request, ticket));
        });
        Ok(())
    }
}

/// Worker whose launch always fails
pub struct UnavailableWorker;

impl RequestWorker for UnavailableWorker {
    fn spawn(&mut self, _ticket: RequestTicket) -> Result<(), SpawnError> {
        Err(SpawnError::Busy)
    }
}

/// Starts the request on a thread, then dies without completing it
pub struct PanickingWorker;

impl RequestWorker for PanickingWorker {
    fn spawn(&mut self, ticket: RequestTicket) -> Result<(), SpawnError> {
        std::thread::spawn(move || {
            ticket.start();
            panic!("worker crashed before completing");
        });
        Ok(())
    }
}

/// Parks tickets for a task on the same executor to serve
#[derive(Clone, Default)]
pub struct InlineWorker {
    pub parked: Rc<RefCell<Option<RequestTicket>>>,
}

impl InlineWorker {
    pub fn take(&self) -> Option<RequestTicket> {
        self.parked.borrow_mut().take()
    }
}

impl RequestWorker for InlineWorker {
    fn spawn(&mut self, ticket: RequestTicket) -> Result<(), SpawnError> {
        *self.parked.borrow_mut() = Some(ticket);
        Ok(())
    }
}

pub fn treat_request() -> TreatRequest {
    TreatRequest::new("http://192.168.1.20:2477/treat", 2).unwrap()
}

pub fn leak_slot() -> &'static RequestSlot {
    Box::leak(Box::new(RequestSlot::new()))
}

// -----------------------------------------------------------------------------
// Button
// -----------------------------------------------------------------------------

/// Returns scripted levels, then `rest` forever
#[derive(Clone)]
pub struct ScriptedButton {
    levels: Rc<RefCell<VecDeque<bool>>>,
    reads: Rc<Cell<u32>>,
    rest: bool,
}

impl ScriptedButton {
    pub fn new(levels: &[u8], rest: bool) -> Self {
        Self {
            levels: Rc::new(RefCell::new(levels.iter().map(|&l| l == 1).collect())),
            reads: Rc::new(Cell::new(0)),
            rest,
        }
    }

    pub fn remaining(&self) -> usize {
        self.levels.borrow().len()
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl ErrorType for ScriptedButton {
    type Error = Infallible;
}

impl InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.levels.borrow_mut().pop_front().unwrap_or(self.rest))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|level| !level)
    }
}
