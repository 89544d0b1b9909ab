use embassy_executor::Spawner;
use embassy_net::Stack;
use log::warn;
use treat_button_core::{RequestTicket, RequestWorker, SpawnError, TreatRequest};

use crate::infrastructure::tasks::treat_request_task;

/// Runs every ticket in its own embassy task
pub struct TaskRequestWorker {
    spawner: Spawner,
    stack: Stack<'static>,
    request: &'static TreatRequest,
}

impl TaskRequestWorker {
    pub fn new(spawner: Spawner, stack: Stack<'static>, request: &'static TreatRequest) -> Self {
        Self {
            spawner,
            stack,
            request,
        }
    }
}

impl RequestWorker for TaskRequestWorker {
    fn spawn(&mut self, ticket: RequestTicket) -> Result<(), SpawnError> {
        self.spawner
            .spawn(treat_request_task(self.stack, self.request, ticket))
            .map_err(|e| {
                warn!("request: failed to spawn worker: {e:?}");
                SpawnError::Busy
            })
    }
}
