mod request_worker;

pub use request_worker::TaskRequestWorker;
