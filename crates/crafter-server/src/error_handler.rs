//! HTTP delivery of classified errors

use std::any::Any;

use axum::{
    Router,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crafter_core::{Fault, RaisedFault, RequestContext};
use crafter_dispatch::{Dispatcher, ErrorResponse, messages};
use http::{HeaderValue, StatusCode, header};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Install the error handler on a router
///
/// Layers, outermost first: request id assignment, request id
/// propagation, request tracing, the error handler, and panic capture.
pub trait ResponseCrafterExt {
    #[must_use]
    fn with_response_crafter(self, dispatcher: Dispatcher) -> Self;
}

impl<S> ResponseCrafterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_response_crafter(self, dispatcher: Dispatcher) -> Self {
        self.layer(CatchPanicLayer::custom(panic_response))
            .layer(axum::middleware::from_fn_with_state(dispatcher, respond_with_errors))
            // The error handler logs failing requests itself
            .layer(TraceLayer::new_for_http().on_failure(()))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }
}

/// Middleware replacing responses raised by a [`Fault`] with the classified payload
///
/// Correlation data is captured before the handler consumes the request.
/// Responses that carry no fault pass through untouched.
pub async fn respond_with_errors(State(dispatcher): State<Dispatcher>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let mut context = RequestContext::from_parts(&parts);
    if context.trace_id.is_empty() {
        context.trace_id = crafter_telemetry::current_trace_id().unwrap_or_default();
    }

    let response = next.run(Request::from_parts(parts, body)).await;

    match response.extensions().get::<RaisedFault>().cloned() {
        Some(RaisedFault(fault)) => write_error(&dispatcher, &fault, &context),
        None => response,
    }
}

/// Classify a fault and render it as a JSON response
pub fn write_error(dispatcher: &Dispatcher, fault: &Fault, context: &RequestContext) -> Response {
    let payload = dispatcher.handle_http(fault, context);
    render(&payload)
}

fn render(payload: &ErrorResponse) -> Response {
    let status = StatusCode::from_u16(payload.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match serde_json::to_vec(payload) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize error response, writing minimal body");
            last_resort()
        }
    }
}

/// Minimal body written when the payload itself cannot be serialized
fn last_resort() -> Response {
    let body = format!(
        r#"{{"statusCode":500,"type":"{}","message":"{}"}}"#,
        messages::FALLBACK_TYPE,
        messages::DEFAULT_MESSAGE
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    Fault::from_panic(payload).into_response()
}
