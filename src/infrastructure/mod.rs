//! Infrastructure layer - Port implementations
//!
//! Concrete implementations of the core ports on top of esp-hal, esp-radio and
//! embassy-net, plus the embassy tasks that drive them.

pub mod adapters;
pub mod drivers;
pub mod tasks;
