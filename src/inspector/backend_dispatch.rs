//! Backend traffic: the inbound queue, the router and outbound commands.

use serde_json::Value;

use super::Inspector;
use crate::backend::{BackendError, BackendMessage, CommandCallback, DomainDispatcher};
use crate::dispatch_queue::{self, DispatchQueue, DispatchTarget};

impl Inspector {
    /// Inbound entry point. Processing happens on a later tick, one message
    /// per tick, in arrival order.
    pub fn dispatch_message_from_backend(&mut self, message: BackendMessage) {
        crate::debug_trace!("DISPATCH", "Queued message ({} pending)", self.queue.len() + 1);
        dispatch_queue::dispatch(self, message);
    }

    pub fn register_domain_dispatcher(&mut self, domain: &str, dispatcher: Box<dyn DomainDispatcher>) {
        self.router.register_domain(domain, dispatcher);
    }

    /// Send `method` to the backend; `callback` receives the response.
    pub fn send_command(
        &mut self,
        method: &str,
        params: Option<Value>,
        callback: Option<CommandCallback>,
    ) {
        match self.router.prepare_command(method, params, callback) {
            Ok(text) => self.send_message_to_backend(&text),
            Err(e) => log::error!("Failed to encode {}: {}", method, e),
        }
    }

    /// Raw outbound text: over the socket when one is open, else via the host.
    pub fn send_message_to_backend(&mut self, text: &str) {
        match self.transport.as_mut() {
            Some(transport) => {
                if let Err(e) = transport.send(text.to_string()) {
                    log::error!("Failed to send backend message: {}", e);
                }
            }
            None => self.host.send_message_to_backend(text),
        }
    }

    /// Move frames that arrived on the socket into the dispatch queue.
    ///
    /// Returns how many were queued. Frames that are not JSON are dropped.
    /// Once the socket reports disconnected, commands awaiting a response fail
    /// with `BackendError::SessionClosed`.
    pub fn pump_transport(&mut self) -> usize {
        let mut frames = Vec::new();
        let mut disconnected = false;
        if let Some(transport) = self.transport.as_mut() {
            while let Some(text) = transport.try_recv() {
                frames.push(text);
            }
            disconnected = !transport.is_connected();
        }

        let mut queued = 0;
        for text in frames {
            match serde_json::from_str::<Value>(&text) {
                Ok(message) => {
                    self.dispatch_message_from_backend(message);
                    queued += 1;
                }
                Err(e) => {
                    crate::debug_error!("BACKEND", "Dropped frame: {}", e);
                    log::warn!("{}", BackendError::Malformed(e.to_string()));
                }
            }
        }

        if disconnected && self.router.pending_commands() > 0 {
            log::warn!(
                "Backend socket closed with {} commands pending",
                self.router.pending_commands()
            );
            self.router.fail_pending();
        }
        queued
    }

    pub fn queued_messages(&self) -> usize {
        self.queue.len()
    }
}

impl DispatchTarget for Inspector {
    type Message = BackendMessage;

    fn queue(&mut self) -> &mut DispatchQueue<BackendMessage> {
        &mut self.queue
    }

    fn process_message(&mut self, message: BackendMessage) {
        self.router.dispatch(&message);
    }
}
