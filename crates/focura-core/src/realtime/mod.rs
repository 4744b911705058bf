//! Real-time alert delivery.
//!
//! Widgets depend on [`EventSource`], never on a concrete transport. A
//! subscription is keyed by `(channel, event)` and yields decoded
//! [`RelayMessage`]s; dropping it unsubscribes.
//!
//! [`LocalRelay`] is the in-process implementation used by the CLI demo and
//! tests. A hosted pub/sub service, a WebSocket or an SSE stream would plug
//! in behind the same trait.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub message: String,
}

impl RelayMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Accepts a bare string or an object carrying a string `message`.
    ///
    /// # Errors
    /// Returns [`RelayError::UnexpectedPayload`] for any other shape.
    pub fn decode(payload: &Value) -> Result<Self, RelayError> {
        match payload {
            Value::String(s) => Ok(Self::new(s.clone())),
            Value::Object(obj) => match obj.get("message") {
                Some(Value::String(s)) if !s.is_empty() => Ok(Self::new(s.clone())),
                _ => Err(RelayError::UnexpectedPayload(payload.to_string())),
            },
            other => Err(RelayError::UnexpectedPayload(other.to_string())),
        }
    }

    pub fn alert(&self) -> Alert {
        Alert::classify(&self.message)
    }
}

/// What a relay message asks the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Hydration,
    Posture,
    Unhandled(String),
}

impl Alert {
    pub fn classify(message: &str) -> Self {
        match message {
            "drink water" => Alert::Hydration,
            "bad posture" => Alert::Posture,
            other => Alert::Unhandled(other.to_string()),
        }
    }
}

/// Source of real-time messages.
pub trait EventSource: Send + Sync {
    fn subscribe(&self, channel: &str, event: &str) -> Subscription;
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    channel: String,
    event: String,
    rx: broadcast::Receiver<Value>,
}

impl Subscription {
    pub fn new(channel: &str, event: &str, rx: broadcast::Receiver<Value>) -> Self {
        Self {
            channel: channel.to_string(),
            event: event.to_string(),
            rx,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Next well-formed message, or `None` once the source is gone.
    /// Malformed payloads are logged and skipped.
    pub async fn next(&mut self) -> Option<RelayMessage> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => match RelayMessage::decode(&payload) {
                    Ok(msg) => return Some(msg),
                    Err(e) => {
                        error!(channel = %self.channel, event = %self.event, error = %e, "dropping relay payload");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(channel = %self.channel, skipped, "relay subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Run `handler` for every message on `subscription` until the source
/// closes or the returned task is aborted.
pub fn spawn_handler<F>(mut subscription: Subscription, mut handler: F) -> JoinHandle<()>
where
    F: FnMut(RelayMessage) + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = subscription.next().await {
            handler(msg);
        }
        debug!(channel = %subscription.channel, "relay subscription closed");
    })
}

/// In-process pub/sub relay.
#[derive(Debug, Default)]
pub struct LocalRelay {
    topics: Mutex<HashMap<(String, String), broadcast::Sender<Value>>>,
}

impl LocalRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a raw payload. Returns how many subscribers received it.
    pub fn publish(&self, channel: &str, event: &str, payload: Value) -> usize {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        let key = (channel.to_string(), event.to_string());
        let Some(tx) = topics.get(&key) else {
            debug!(channel, event, "no subscribers");
            return 0;
        };
        match tx.send(payload) {
            Ok(n) => n,
            Err(_) => {
                topics.remove(&key);
                0
            }
        }
    }

    /// Publish `{"message": ...}`.
    pub fn publish_message(&self, channel: &str, event: &str, message: &str) -> usize {
        self.publish(channel, event, serde_json::json!({ "message": message }))
    }

    /// Drop every topic; open subscriptions see the end of their stream.
    pub fn disconnect(&self) {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        info!(topics = topics.len(), "relay disconnected");
        topics.clear();
    }
}

impl EventSource for LocalRelay {
    fn subscribe(&self, channel: &str, event: &str) -> Subscription {
        let mut topics = self.topics.lock().unwrap_or_else(|e| e.into_inner());
        let tx = topics
            .entry((channel.to_string(), event.to_string()))
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        info!(channel, event, "relay subscription opened");
        Subscription::new(channel, event, tx.subscribe())
    }
}
