//! Hub delivery: invocations over a websocket with out-of-band error events

mod argument;
mod connection;
mod filter;
mod protocol;
mod route;

use std::{collections::HashMap, fmt, future::Future, sync::Arc};

use crafter_core::Fault;
use futures_util::{FutureExt, future::BoxFuture};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};

pub use argument::{HubArgument, HubArguments};
pub use connection::{ConnectionInfo, run_connection};
pub use protocol::HubFrame;
pub use route::{HubState, hub_handler};

type HubMethod = Arc<dyn Fn(HubCallContext, HubArguments) -> BoxFuture<'static, Result<Value, Fault>> + Send + Sync>;

/// A named set of methods callable over one websocket endpoint
#[derive(Clone)]
pub struct Hub {
    name: String,
    methods: HashMap<String, HubMethod>,
}

impl Hub {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    /// Register a method under `name`
    ///
    /// The method's return value is serialized into the completion frame.
    /// Any raised fault is classified and pushed to the caller instead.
    #[must_use]
    pub fn method<F, Fut, R>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HubCallContext, HubArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Fault>> + Send + 'static,
        R: Serialize,
    {
        let handler = Arc::new(handler);
        let method: HubMethod = Arc::new(move |context, arguments| {
            let call = handler(context, arguments);
            async move {
                let value = serde_json::to_value(call.await?).map_err(ResultEncodingError)?;
                Ok::<_, Fault>(value)
            }
            .boxed()
        });

        self.methods.insert(name.into(), method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn method_for(&self, name: &str) -> Option<&HubMethod> {
        self.methods.get(name)
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        methods.sort();

        f.debug_struct("Hub")
            .field("name", &self.name)
            .field("methods", &methods)
            .finish()
    }
}

/// What a hub method knows about the call it is serving
#[derive(Debug, Clone)]
pub struct HubCallContext {
    pub connection_id: String,
    pub user_id: Option<String>,
    pub invocation_id: String,
    pub clients: Clients,
}

/// A hub method returned a value that cannot be written as JSON
///
/// Kept apart from [`serde_json::Error`] so that it is answered as a server
/// fault rather than a malformed import.
#[derive(Debug, thiserror::Error)]
#[error("failed to serialize the hub method result")]
struct ResultEncodingError(#[source] serde_json::Error);

/// Outgoing channels of a connection
#[derive(Debug, Clone)]
pub struct Clients {
    caller: mpsc::Sender<HubFrame>,
    all: Option<broadcast::Sender<HubFrame>>,
}

impl Clients {
    pub const fn new(caller: mpsc::Sender<HubFrame>, all: Option<broadcast::Sender<HubFrame>>) -> Self {
        Self { caller, all }
    }

    /// Push an event to the calling connection only
    ///
    /// Returns `false` when the connection is gone or has stopped reading.
    pub fn caller(&self, target: impl Into<String>, arguments: Vec<Value>) -> bool {
        self.send(HubFrame::event(target, arguments))
    }

    /// Push an event to every connection of the hub
    ///
    /// Returns the number of connections reached.
    pub fn all(&self, target: impl Into<String>, arguments: Vec<Value>) -> usize {
        let Some(ref all) = self.all else {
            return usize::from(self.caller(target, arguments));
        };

        all.send(HubFrame::event(target, arguments)).unwrap_or(0)
    }

    fn send(&self, frame: HubFrame) -> bool {
        match self.caller.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("hub connection is not reading, dropping it");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}
