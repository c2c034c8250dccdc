//! Backend message routing.
//!
//! Inbound payloads are JSON objects. Responses (`{id, result|error}`)
//! complete the callback registered when the command was sent; notifications
//! (`{method, params}`) go to the dispatcher registered for the method's
//! domain prefix (`"DOM.setChildNodes"` -> `"DOM"`).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Opaque inbound payload.
pub type BackendMessage = Value;

/// Completion callback of an outbound command.
pub type CommandCallback = Box<dyn FnOnce(Result<Value, BackendError>)>;

/// Backend protocol errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Method error: {code} - {message}")]
    Method { code: i64, message: String },

    #[error("Malformed backend message: {0}")]
    Malformed(String),

    #[error("Failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Backend session closed")]
    SessionClosed,
}

/// Outbound command
#[derive(Debug, Clone, Serialize)]
pub struct BackendRequest<'a> {
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Either a response or a notification; `id` tells them apart.
#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<ResponseError>,
    method: Option<String>,
    #[serde(default)]
    params: Value,
}

/// Receives notifications of one backend domain.
pub trait DomainDispatcher {
    /// `event` is the method name without the domain prefix.
    fn dispatch_event(&mut self, event: &str, params: &Value);
}

/// Routes decoded backend messages to callbacks and domain dispatchers.
#[derive(Default)]
pub struct BackendRouter {
    domains: BTreeMap<String, Box<dyn DomainDispatcher>>,
    pending: HashMap<u64, CommandCallback>,
    next_id: u64,
}

impl fmt::Debug for BackendRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRouter")
            .field("domains", &self.domain_names())
            .field("pending", &self.pending.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl BackendRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dispatcher for `domain`, replacing any previous one.
    pub fn register_domain(&mut self, domain: &str, dispatcher: Box<dyn DomainDispatcher>) {
        if self
            .domains
            .insert(domain.to_string(), dispatcher)
            .is_some()
        {
            log::warn!("Replaced dispatcher for backend domain '{}'", domain);
        }
    }

    /// Registered domains in name order.
    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Encode a command and remember its callback. Returns the wire text.
    pub fn prepare_command(
        &mut self,
        method: &str,
        params: Option<Value>,
        callback: Option<CommandCallback>,
    ) -> Result<String, BackendError> {
        self.next_id += 1;
        let id = self.next_id;
        let text = serde_json::to_string(&BackendRequest { id, method, params })?;
        if let Some(callback) = callback {
            self.pending.insert(id, callback);
        }
        crate::debug_trace!("BACKEND", "-> {}", text);
        Ok(text)
    }

    /// Route one inbound message. Malformed input is logged and dropped.
    pub fn dispatch(&mut self, message: &BackendMessage) {
        crate::debug_trace!("BACKEND", "<- {}", message);

        let envelope = match Envelope::deserialize(message) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("Failed to parse backend message: {}", e);
                return;
            }
        };

        if let Some(id) = envelope.id {
            let Some(callback) = self.pending.remove(&id) else {
                log::debug!("Response {} has no pending command", id);
                return;
            };
            let result = match envelope.error {
                Some(error) => Err(BackendError::Method {
                    code: error.code,
                    message: error.message,
                }),
                None => Ok(envelope.result.unwrap_or(Value::Null)),
            };
            callback(result);
            return;
        }

        let Some(method) = envelope.method else {
            log::warn!("Backend message has neither id nor method");
            return;
        };
        let Some((domain, event)) = method.split_once('.') else {
            log::warn!("Backend notification '{}' has no domain", method);
            return;
        };
        match self.domains.get_mut(domain) {
            Some(dispatcher) => dispatcher.dispatch_event(event, &envelope.params),
            None => log::debug!("No dispatcher for backend domain '{}'", domain),
        }
    }

    /// Fail every pending command, oldest first; used when the session goes away.
    pub fn fail_pending(&mut self) {
        let mut pending: Vec<_> = self.pending.drain().collect();
        pending.sort_by_key(|(id, _)| *id);
        for (_, callback) in pending {
            callback(Err(BackendError::SessionClosed));
        }
    }
}
