use embassy_net::Stack;
use log::debug;
use treat_button_core::{RequestTicket, TreatRequest, serve_request};

use crate::infrastructure::drivers::TcpHttpClient;

/// Worker for one treat request.
///
/// The pool holds two slots: a finished worker releases the guard before its
/// task has returned, so the next press may spawn while it winds down.
#[embassy_executor::task(pool_size = 2)]
pub async fn treat_request_task(
    stack: Stack<'static>,
    request: &'static TreatRequest,
    ticket: RequestTicket,
) {
    debug!("request: worker started");
    let mut client = TcpHttpClient::new(stack);
    serve_request(&mut client, request, ticket).await;
}
