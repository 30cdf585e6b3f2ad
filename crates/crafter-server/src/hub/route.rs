use std::{collections::HashMap, future::ready, sync::Arc};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use crafter_dispatch::Dispatcher;
use futures_util::{Sink, SinkExt, StreamExt};
use http::HeaderMap;
use tokio::sync::{broadcast, mpsc};

use super::{Clients, ConnectionInfo, Hub, HubFrame, run_connection};

/// Frames queued for one connection before it counts as stalled
const CALLER_QUEUE: usize = 64;
/// Broadcast frames a connection may fall behind before it skips ahead
const BROADCAST_BUFFER: usize = 256;

/// Shared state of a hub endpoint
#[derive(Debug, Clone)]
pub struct HubState {
    hub: Arc<Hub>,
    dispatcher: Dispatcher,
    all: broadcast::Sender<HubFrame>,
    user_id_header: Option<String>,
}

impl HubState {
    pub fn new(hub: Hub, dispatcher: Dispatcher, user_id_header: Option<String>) -> Self {
        let (all, _) = broadcast::channel(BROADCAST_BUFFER);

        Self {
            hub: Arc::new(hub),
            dispatcher,
            all,
            user_id_header,
        }
    }
}

/// Upgrade a request to a hub connection
pub async fn hub_handler(
    State(state): State<HubState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let connection = ConnectionInfo::from_upgrade(&headers, &query, state.user_id_header.as_deref());

    ws.on_upgrade(move |socket| serve_socket(state, connection, socket))
}

async fn serve_socket(state: HubState, connection: ConnectionInfo, socket: WebSocket) {
    let (sink, stream) = socket.split();
    let (tx, rx) = mpsc::channel::<HubFrame>(CALLER_QUEUE);

    let writer = tokio::spawn(write_frames(sink, rx, state.all.subscribe()));

    let incoming = stream
        .take_while(|message| ready(matches!(message, Ok(message) if !matches!(message, Message::Close(_)))))
        .filter_map(|message| {
            ready(match message {
                Ok(Message::Text(text)) => Some(text.as_str().to_owned()),
                _ => None,
            })
        });

    let clients = Clients::new(tx, Some(state.all.clone()));
    run_connection(state.hub, state.dispatcher, connection, incoming, clients).await;

    if let Err(e) = writer.await {
        tracing::debug!(error = %e, "hub writer task ended abnormally");
    }
}

enum Outgoing {
    Frame(HubFrame),
    Skip,
    Done,
}

/// Write caller frames and hub broadcasts to the socket until the caller side closes
///
/// Broadcasts are read straight from the hub channel, so a connection that
/// stops draining loses the oldest broadcasts instead of buffering them.
pub(super) async fn write_frames<Si>(
    mut sink: Si,
    mut caller: mpsc::Receiver<HubFrame>,
    mut broadcasts: broadcast::Receiver<HubFrame>,
) where
    Si: Sink<Message> + Unpin,
{
    let mut broadcasting = true;

    loop {
        let next = tokio::select! {
            biased;
            received = broadcasts.recv(), if broadcasting => match received {
                Ok(frame) => Outgoing::Frame(frame),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "hub connection lagged behind broadcasts, events dropped");
                    Outgoing::Skip
                }
                Err(broadcast::error::RecvError::Closed) => {
                    broadcasting = false;
                    Outgoing::Skip
                }
            },
            frame = caller.recv() => frame.map_or(Outgoing::Done, Outgoing::Frame),
        };

        let frame = match next {
            Outgoing::Frame(frame) => frame,
            Outgoing::Skip => continue,
            Outgoing::Done => break,
        };

        match serde_json::to_string(&frame) {
            Ok(text) => {
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to serialize hub frame"),
        }
    }
}
