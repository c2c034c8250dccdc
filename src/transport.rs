//! WebSocket-relayed backend transport.
//!
//! When the front-end is opened with `?ws=<host/path>` or `?page=<id>` query
//! parameters it talks to the backend over a socket instead of the host's
//! default channel. The socket runs on tokio reader/writer tasks; the
//! coordinator side is synchronous and polls through [`BackendTransport`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid socket URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Timeout connecting to backend")]
    Timeout,

    #[error("Connection closed")]
    ConnectionClosed,
}

/// Duplex text channel to the backend.
pub trait BackendTransport {
    fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Next inbound frame, if one has arrived.
    fn try_recv(&mut self) -> Option<String>;

    fn is_connected(&self) -> bool;
}

/// Decode the page's query string (`?a=1&b=2`, leading `?` optional).
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

/// Socket URL requested by the query parameters, if any.
///
/// `ws` wins over `page`; `page` uses `host` when given, else `default_host`.
pub fn socket_url(
    params: &HashMap<String, String>,
    default_host: &str,
) -> Result<Option<Url>, TransportError> {
    let raw = if let Some(ws) = params.get("ws") {
        format!("ws://{}", ws)
    } else if let Some(page) = params.get("page") {
        let host = params
            .get("host")
            .map(String::as_str)
            .unwrap_or(default_host);
        format!("ws://{}/devtools/page/{}", host, page)
    } else {
        return Ok(None);
    };

    Url::parse(&raw)
        .map(Some)
        .map_err(|e| TransportError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
}

/// Backend transport over a tokio-tungstenite WebSocket.
pub struct WebSocketTransport {
    outbound: mpsc::UnboundedSender<Message>,
    inbound: mpsc::UnboundedReceiver<String>,
    connected: Arc<AtomicBool>,
}

impl WebSocketTransport {
    /// Connect to `url`. Must be called from within a tokio runtime.
    pub async fn connect(url: &Url, connect_timeout: Duration) -> Result<Self, TransportError> {
        log::info!("Connecting to backend socket {}", url);

        let ws_stream = timeout(connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?
            .0;

        let (mut ws_write, mut ws_read) = ws_stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();
        let connected = Arc::new(AtomicBool::new(true));

        // Writer task
        let writer_connected = connected.clone();
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                if let Err(e) = ws_write.send(msg).await {
                    log::error!("WebSocket write error: {}", e);
                    break;
                }
            }
            writer_connected.store(false, Ordering::SeqCst);
        });

        // Reader task
        let reader_connected = connected.clone();
        tokio::spawn(async move {
            while let Some(msg_result) = ws_read.next().await {
                match msg_result {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text).is_err() {
                            log::debug!("Backend transport receiver dropped");
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("Backend socket closed");
                        break;
                    }
                    // Binary, ping and pong frames carry nothing for us
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("WebSocket read error: {}", e);
                        break;
                    }
                }
            }
            reader_connected.store(false, Ordering::SeqCst);
        });

        log::info!("Connected to backend socket");
        Ok(Self {
            outbound: outbound_tx,
            inbound: inbound_rx,
            connected,
        })
    }
}

impl BackendTransport for WebSocketTransport {
    fn send(&mut self, text: String) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::ConnectionClosed);
        }
        self.outbound
            .send(Message::Text(text))
            .map_err(|_| TransportError::ConnectionClosed)
    }

    fn try_recv(&mut self) -> Option<String> {
        self.inbound.try_recv().ok()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_decoded() {
        let params = parse_query("?page=3&host=127.0.0.1%3A9222");
        assert_eq!(params.get("page").map(String::as_str), Some("3"));
        assert_eq!(params.get("host").map(String::as_str), Some("127.0.0.1:9222"));
    }

    #[test]
    fn page_socket_uses_default_host() {
        let params = parse_query("page=12");
        let url = socket_url(&params, "localhost:9222").unwrap().unwrap();
        assert_eq!(url.as_str(), "ws://localhost:9222/devtools/page/12");
    }

    #[test]
    fn page_socket_prefers_explicit_host() {
        let params = parse_query("page=12&host=10.0.0.2:9000");
        let url = socket_url(&params, "localhost").unwrap().unwrap();
        assert_eq!(url.as_str(), "ws://10.0.0.2:9000/devtools/page/12");
    }

    #[test]
    fn ws_parameter_wins() {
        let params = parse_query("ws=example.org:1234/inspector&page=1");
        let url = socket_url(&params, "localhost").unwrap().unwrap();
        assert_eq!(url.as_str(), "ws://example.org:1234/inspector");
    }

    #[test]
    fn no_socket_without_parameters() {
        assert!(socket_url(&parse_query(""), "localhost").unwrap().is_none());
        assert!(
            socket_url(&parse_query("docked=true"), "localhost")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn bad_host_is_reported() {
        let params = parse_query("page=1&host=bad host");
        assert!(matches!(
            socket_url(&params, "localhost"),
            Err(TransportError::InvalidUrl { .. })
        ));
    }
}
