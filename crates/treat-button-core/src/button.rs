//! Button polling
//!
//! The button is active-low. It is sampled at a fixed interval and a press is
//! recognised only on a high-to-low transition between two consecutive
//! samples. While a request runs the button is not sampled, so presses made in
//! that time are lost rather than queued.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::config::ButtonTimings;
use crate::error::RequestError;
use crate::ports::{RequestWorker, StatusSignal};
use crate::request::RequestBridge;

/// What happened to a detected press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The request ran to completion, successfully or not
    Completed(Result<(), RequestError>),
    /// Another request was outstanding; the press was dropped
    Dropped,
}

pub struct ButtonPoller<B, W, S> {
    button: B,
    bridge: RequestBridge<W>,
    signal: S,
    timings: ButtonTimings,
}

impl<B, W, S> ButtonPoller<B, W, S>
where
    B: InputPin,
    W: RequestWorker,
    S: StatusSignal,
{
    pub fn new(button: B, bridge: RequestBridge<W>, signal: S) -> Self {
        Self {
            button,
            bridge,
            signal,
            timings: ButtonTimings::DEFAULT,
        }
    }

    #[must_use]
    pub fn with_timings(mut self, timings: ButtonTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Main loop of the device: wait for a press, run the request, repeat.
    ///
    /// Never returns.
    pub async fn run(&mut self) -> Infallible {
        loop {
            self.wait_until_pressed().await;
            debug!("button: pressed");
            match self.dispatch().await {
                Dispatch::Completed(Ok(())) => info!("button: treat sent"),
                Dispatch::Completed(Err(err)) => info!("button: treat not sent ({err})"),
                Dispatch::Dropped => info!("button: press dropped, request in flight"),
            }
        }
    }

    /// Return on the next high-to-low transition of the button.
    pub async fn wait_until_pressed(&mut self) {
        let mut previous = self.sample(true);

        loop {
            self.signal.pause(self.timings.sample_interval).await;
            let current = self.sample(previous);
            if previous && !current {
                return;
            }
            previous = current;
        }
    }

    /// Run the request for one press.
    pub async fn dispatch(&mut self) -> Dispatch {
        match self.bridge.perform_request(&mut self.signal).await {
            Err(RequestError::AlreadyInProgress) => Dispatch::Dropped,
            outcome => Dispatch::Completed(outcome),
        }
    }

    pub fn bridge(&self) -> &RequestBridge<W> {
        &self.bridge
    }

    /// Read the level; a failed read repeats `fallback` so it cannot fake an edge
    fn sample(&mut self, fallback: bool) -> bool {
        match self.button.is_high() {
            Ok(level) => level,
            Err(_) => {
                warn!("button: failed to read input");
                fallback
            }
        }
    }
}
