mod network;
mod request;

pub use network::network_runner_task;
pub use request::treat_request_task;
