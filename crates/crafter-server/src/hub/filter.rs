use std::panic::AssertUnwindSafe;

use crafter_core::{ApiError, Fault, HubInvocation};
use crafter_dispatch::{Dispatcher, messages::RECEIVE_ERROR_EVENT};
use futures_util::FutureExt;
use serde_json::Value;

use super::{Clients, ConnectionInfo, Hub, HubArguments, HubCallContext};

pub(super) const MISSING_INVOCATION_ID: &str = "Invocation ID cannot be null, empty, or whitespace.";

/// Run one invocation through the error filter
///
/// On failure the fault is classified, a single error event is pushed to
/// the caller, and the invocation completes with `null`.
pub(super) async fn invoke(
    hub: &Hub,
    dispatcher: &Dispatcher,
    connection: &ConnectionInfo,
    clients: &Clients,
    target: &str,
    arguments: HubArguments,
) -> Value {
    let invocation_id = resolve_invocation_id(&arguments, connection);
    let reported_id = invocation_id.as_deref().unwrap_or_default().to_owned();

    let outcome = match invocation_id {
        Ok(invocation_id) => {
            let context = HubCallContext {
                connection_id: connection.connection_id.clone(),
                user_id: connection.user_id.clone(),
                invocation_id,
                clients: clients.clone(),
            };
            call(hub, target, context, arguments).await
        }
        Err(error) => Err(Fault::from(error)),
    };

    match outcome {
        Ok(result) => result,
        Err(fault) => {
            report(hub, dispatcher, connection, clients, target, reported_id, &fault);
            Value::Null
        }
    }
}

fn resolve_invocation_id(arguments: &HubArguments, connection: &ConnectionInfo) -> Result<String, ApiError> {
    arguments
        .invocation_id()
        .or_else(|| {
            connection
                .fallback_invocation_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
        })
        .map(ToOwned::to_owned)
        .ok_or_else(|| ApiError::bad_request(MISSING_INVOCATION_ID))
}

async fn call(hub: &Hub, target: &str, context: HubCallContext, arguments: HubArguments) -> Result<Value, Fault> {
    let method = hub
        .method_for(target)
        .ok_or_else(|| ApiError::not_found_for(Some(format!("hub_method_{target}").as_str())))?;

    AssertUnwindSafe(method(context, arguments))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(Fault::from_panic(payload)))
}

fn report(
    hub: &Hub,
    dispatcher: &Dispatcher,
    connection: &ConnectionInfo,
    clients: &Clients,
    target: &str,
    invocation_id: String,
    fault: &Fault,
) {
    let invocation = HubInvocation {
        hub: hub.name().to_owned(),
        method: target.to_owned(),
        connection_id: connection.connection_id.clone(),
        user_id: connection.user_id.clone(),
        trace_id: crafter_telemetry::current_trace_id().unwrap_or_default(),
        invocation_id,
    };

    let payload = dispatcher.handle_hub(fault, &invocation);

    match serde_json::to_value(&payload) {
        Ok(value) => {
            if !clients.caller(RECEIVE_ERROR_EVENT, vec![value]) {
                tracing::debug!(connection_id = %connection.connection_id, "caller disconnected before the error event");
            }
        }
        Err(e) => tracing::error!(error = %e, "failed to serialize hub error payload, dropping push"),
    }
}
