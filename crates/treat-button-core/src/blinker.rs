//! Status LED blinking
//!
//! Every long-running operation reports progress by blinking the status LED.
//! A blink is described by a [`BlinkPlan`]: the total time to spend and the
//! half period of one on/off cycle.

use core::time::Duration;

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use log::warn;

use crate::ports::StatusSignal;

/// Half period of the "fast" preset
pub const FAST_HALF_PERIOD: Duration = Duration::from_millis(125);

/// Half period of the "slow" preset
pub const SLOW_HALF_PERIOD: Duration = Duration::from_millis(250);

/// Shortest suspension of a heartbeat whose plan has no whole cycle
pub const MIN_HEARTBEAT_PAUSE: Duration = Duration::from_millis(10);

/// Total duration and half period of a blink sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPlan {
    pub total: Duration,
    pub half_period: Duration,
}

impl BlinkPlan {
    pub const fn new(total: Duration, half_period: Duration) -> Self {
        Self { total, half_period }
    }

    /// Shorthand for plans defined in milliseconds
    pub const fn from_millis(total: u64, half_period: u64) -> Self {
        Self::new(
            Duration::from_millis(total),
            Duration::from_millis(half_period),
        )
    }

    pub const fn fast(total: Duration) -> Self {
        Self::new(total, FAST_HALF_PERIOD)
    }

    pub const fn slow(total: Duration) -> Self {
        Self::new(total, SLOW_HALF_PERIOD)
    }

    /// Number of full on/off cycles.
    ///
    /// The remainder of `total` that does not fill a whole cycle is dropped.
    /// A zero half period yields no cycles.
    #[allow(clippy::cast_possible_truncation)]
    pub fn cycles(&self) -> u32 {
        let period = self.half_period.as_nanos().saturating_mul(2);
        if period == 0 {
            return 0;
        }
        let cycles = self.total.as_nanos() / period;
        cycles.min(u128::from(u32::MAX)) as u32
    }

    /// Time spent suspended while executing the plan
    pub fn suspended(&self) -> Duration {
        self.half_period
            .saturating_mul(2)
            .saturating_mul(self.cycles())
    }
}

/// Drives the status LED through timed on/off cycles.
pub struct Blinker<P, D> {
    led: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Blinker<P, D> {
    pub fn new(led: P, delay: D) -> Self {
        Self { led, delay }
    }

    pub async fn blink_fast(&mut self, total: Duration) {
        self.run(BlinkPlan::fast(total)).await;
    }

    pub async fn blink_slow(&mut self, total: Duration) {
        self.run(BlinkPlan::slow(total)).await;
    }

    /// Consume the blinker and give back the pin and the delay
    pub fn release(self) -> (P, D) {
        (self.led, self.delay)
    }

    async fn run(&mut self, plan: BlinkPlan) {
        for _ in 0..plan.cycles() {
            self.sleep(plan.half_period).await;
            self.set_level(true);
            self.sleep(plan.half_period).await;
            self.set_level(false);
        }
    }

    async fn sleep(&mut self, duration: Duration) {
        let micros = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(micros).await;
    }

    fn set_level(&mut self, on: bool) {
        let result = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if result.is_err() {
            warn!("blinker: failed to drive status led");
        }
    }
}

impl<P: OutputPin, D: DelayNs> StatusSignal for Blinker<P, D> {
    async fn blink(&mut self, plan: BlinkPlan) {
        self.run(plan).await;
    }

    async fn pause(&mut self, duration: Duration) {
        self.sleep(duration).await;
    }
}
