use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON text frame exchanged over the hub websocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubFrame {
    /// Client calls a hub method
    Invocation {
        target: String,
        #[serde(default)]
        arguments: Vec<Value>,
    },
    /// Server answers an invocation; `null` after a failure
    Completion { target: String, result: Value },
    /// Server pushes an out-of-band event
    Event { target: String, arguments: Vec<Value> },
    /// Keep-alive, echoed back
    Ping,
}

impl HubFrame {
    pub fn event(target: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self::Event {
            target: target.into(),
            arguments,
        }
    }
}
