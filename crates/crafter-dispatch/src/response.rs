use crafter_core::FieldErrors;
use serde::{Deserialize, Serialize};

/// Error payload written to HTTP clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub request_id: String,
    pub trace_id: String,
    /// `{METHOD} - {host}{path}{query}`
    pub instance: String,
    /// Mirrors the status line of the HTTP response
    pub status_code: u16,
    #[serde(rename = "type")]
    pub error_type: String,
    pub errors: Option<FieldErrors>,
    pub message: String,
}

/// Error payload pushed to a hub caller through the error event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubErrorResponse {
    pub trace_id: String,
    /// Correlation id supplied by the caller
    pub invocation_id: String,
    /// Name of the hub method that failed
    pub instance: String,
    pub status_code: u16,
    pub message: String,
    pub errors: Option<FieldErrors>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn error_response_uses_camel_case_and_null_errors() {
        let response = ErrorResponse {
            request_id: "r-1".to_owned(),
            trace_id: String::new(),
            instance: "GET - localhost/orders".to_owned(),
            status_code: 404,
            error_type: "NotFoundException".to_owned(),
            errors: None,
            message: "order_was_not_found.".to_owned(),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "requestId": "r-1",
                "traceId": "",
                "instance": "GET - localhost/orders",
                "statusCode": 404,
                "type": "NotFoundException",
                "errors": null,
                "message": "order_was_not_found.",
            })
        );
    }

    #[test]
    fn hub_error_response_shape() {
        let response = HubErrorResponse {
            trace_id: "t".to_owned(),
            invocation_id: "inv-7".to_owned(),
            instance: "SendMessage".to_owned(),
            status_code: 400,
            message: "text_is_required".to_owned(),
            errors: Some(FieldErrors::from([("text".to_owned(), "required".to_owned())])),
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "traceId": "t",
                "invocationId": "inv-7",
                "instance": "SendMessage",
                "statusCode": 400,
                "message": "text_is_required",
                "errors": { "text": "required" },
            })
        );
    }
}
