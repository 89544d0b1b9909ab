//! Core logic of the treat button.
//!
//! The device waits for a button press and, for every press, asks a remote
//! dispenser to hand out a treat over HTTP. Progress is reported on a single
//! status LED. This crate holds the hardware-independent part: the blink
//! primitive, the Wi-Fi bring-up loop, the bridge that hands the network call
//! to a worker and waits for it cooperatively, and the button poller.
//!
//! Hardware is reached only through [`embedded_hal`] pins, an
//! [`embedded_hal_async`] delay and the traits in [`ports`].
#![cfg_attr(not(test), no_std)]

pub mod blinker;
pub mod button;
pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod net;
pub mod ports;
pub mod request;

pub use blinker::{BlinkPlan, Blinker};
pub use button::{ButtonPoller, Dispatch};
pub use config::{
    ButtonTimings, ConnectPolicy, ConnectTimings, ConnectionIntent, RequestTimings,
    StaticAddress, TreatRequest,
};
pub use connection::WifiConnector;
pub use error::{ConfigError, ConnectError, RequestError, SpawnError, TransportError};
pub use net::AddressInfo;
pub use ports::{HttpClient, RequestWorker, StatusSignal, WifiInterface};
pub use request::{RequestBridge, RequestPhase, RequestSlot, RequestTicket, serve_request};
