use std::{collections::HashMap, pin::pin, sync::Arc};

use crafter_dispatch::Dispatcher;
use futures_util::{Stream, StreamExt};
use http::HeaderMap;
use tracing::Instrument;

use super::{Clients, Hub, HubArguments, HubFrame, filter};

/// Identity of one hub connection, captured from its upgrade request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub connection_id: String,
    pub user_id: Option<String>,
    /// `x-invocation-id` header or `invocation_id` query parameter
    pub fallback_invocation_id: Option<String>,
}

const INVOCATION_ID_HEADER: &str = "x-invocation-id";
const INVOCATION_ID_QUERY: &str = "invocation_id";

impl ConnectionInfo {
    /// Identify a new connection from its upgrade request
    ///
    /// The `x-invocation-id` header takes precedence over the
    /// `invocation_id` query parameter.
    pub fn from_upgrade(headers: &HeaderMap, query: &HashMap<String, String>, user_id_header: Option<&str>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
        };

        Self {
            connection_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id_header.and_then(header),
            fallback_invocation_id: header(INVOCATION_ID_HEADER).or_else(|| query.get(INVOCATION_ID_QUERY).cloned()),
        }
    }
}

/// Serve invocations arriving on `incoming` until it ends or the caller leaves
///
/// Invocations run one at a time, in arrival order.
pub async fn run_connection<S>(
    hub: Arc<Hub>,
    dispatcher: Dispatcher,
    connection: ConnectionInfo,
    incoming: S,
    clients: Clients,
) where
    S: Stream<Item = String>,
{
    let mut incoming = pin!(incoming);

    tracing::debug!(hub = %hub.name(), connection_id = %connection.connection_id, "hub connection opened");

    while let Some(text) = incoming.next().await {
        let frame = match serde_json::from_str::<HubFrame>(&text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(connection_id = %connection.connection_id, error = %e, "ignoring malformed hub frame");
                continue;
            }
        };

        let reply = match frame {
            HubFrame::Invocation { target, arguments } => {
                let span = tracing::info_span!(
                    "hub_invocation",
                    hub = %hub.name(),
                    method = %target,
                    connection_id = %connection.connection_id,
                );

                let result = filter::invoke(
                    &hub,
                    &dispatcher,
                    &connection,
                    &clients,
                    &target,
                    HubArguments::new(arguments),
                )
                .instrument(span)
                .await;

                HubFrame::Completion { target, result }
            }
            HubFrame::Ping => HubFrame::Ping,
            other => {
                tracing::debug!(?other, "ignoring server-bound frame of unexpected type");
                continue;
            }
        };

        if !clients.send(reply) {
            break;
        }
    }

    tracing::debug!(hub = %hub.name(), connection_id = %connection.connection_id, "hub connection closed");
}
