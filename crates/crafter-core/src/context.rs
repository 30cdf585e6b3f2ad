use http::HeaderMap;
use http::request::Parts;

/// Header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the W3C trace context
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Correlation data for a failing HTTP request
///
/// Built by the HTTP delivery adapter before the request reaches the
/// handler, so it survives the request being consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Request correlation id
    pub request_id: String,
    /// Distributed trace id, empty when no trace is active
    pub trace_id: String,
    /// `{METHOD} - {host}{path}{query}`
    pub instance: String,
}

impl RequestContext {
    /// Capture correlation data from request parts
    ///
    /// The trace id comes from the `traceparent` header; callers with an
    /// active tracing context may override it afterwards.
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            request_id: header_str(&parts.headers, REQUEST_ID_HEADER).unwrap_or_default().to_owned(),
            trace_id: trace_id_from_headers(&parts.headers).unwrap_or_default(),
            instance: instance(parts),
        }
    }
}

/// Format the request instance descriptor
pub fn instance(parts: &Parts) -> String {
    let host = header_str(&parts.headers, http::header::HOST.as_str())
        .map(ToOwned::to_owned)
        .or_else(|| parts.uri.authority().map(ToString::to_string))
        .unwrap_or_default();

    let query = parts.uri.query().map(|q| format!("?{q}")).unwrap_or_default();

    format!("{} - {host}{}{query}", parts.method, parts.uri.path())
}

/// Extract the trace id from a W3C `traceparent` header
///
/// Format: `{version}-{trace-id}-{parent-id}-{flags}` with a 32 hex digit
/// trace id that must not be all zeros.
pub fn trace_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = header_str(headers, TRACEPARENT_HEADER)?;
    let mut parts = value.trim().split('-');
    let _version = parts.next()?;
    let trace_id = parts.next()?;

    let valid = trace_id.len() == 32
        && trace_id.bytes().all(|b| b.is_ascii_hexdigit())
        && trace_id.bytes().any(|b| b != b'0');

    valid.then(|| trace_id.to_ascii_lowercase())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Correlation data for a failing hub invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubInvocation {
    /// Hub name (e.g. `ChatHub`)
    pub hub: String,
    /// Invoked hub method, reported as the instance
    pub method: String,
    /// Connection the invocation arrived on
    pub connection_id: String,
    /// Caller identity, when the connection was authenticated
    pub user_id: Option<String>,
    /// Distributed trace id, empty when no trace is active
    pub trace_id: String,
    /// Caller-supplied invocation correlation id, empty until extracted
    pub invocation_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = http::Request::builder().method(http::Method::POST).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn instance_includes_host_path_and_query() {
        let parts = parts("/orders/7?expand=lines", &[("host", "api.example.com")]);
        assert_eq!(instance(&parts), "POST - api.example.com/orders/7?expand=lines");
    }

    #[test]
    fn instance_without_query_has_no_question_mark() {
        let parts = parts("http://localhost:8080/health", &[]);
        assert_eq!(instance(&parts), "POST - localhost:8080/health");
    }

    #[test]
    fn reads_request_and_trace_ids() {
        let parts = parts(
            "/",
            &[
                ("x-request-id", "req-1"),
                ("traceparent", "00-4BF92F3577B34DA6A3CE929D0E0E4736-00f067aa0ba902b7-01"),
            ],
        );
        let ctx = RequestContext::from_parts(&parts);
        assert_eq!(ctx.request_id, "req-1");
        assert_eq!(ctx.trace_id, "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[test]
    fn rejects_invalid_traceparent() {
        for value in [
            "garbage",
            "00-00000000000000000000000000000000-00f067aa0ba902b7-01",
            "00-xyz-00f067aa0ba902b7-01",
        ] {
            let parts = parts("/", &[("traceparent", value)]);
            assert!(trace_id_from_headers(&parts.headers).is_none(), "{value}");
        }
    }
}
