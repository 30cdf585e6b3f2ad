use http::StatusCode;
use indexmap::IndexMap;
use thiserror::Error;

use crate::case::NamingConvention;

/// Field name to field error message
pub type FieldErrors = IndexMap<String, String>;

/// Trait for errors that carry their own HTTP semantics
///
/// Implemented by [`ApiError`] and usable by feature crates that want to
/// expose the same surface. The delivery adapters only read through this
/// trait, keeping domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `BadRequestException`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}

/// Closed set of structured error variants
///
/// Each variant is bound to exactly one status code and one default message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter)]
pub enum ErrorKind {
    #[strum(to_string = "BadRequestException")]
    BadRequest,
    #[strum(to_string = "UnauthorizedException")]
    Unauthorized,
    #[strum(to_string = "PaymentRequiredException")]
    PaymentRequired,
    #[strum(to_string = "ForbiddenException")]
    Forbidden,
    #[strum(to_string = "NotFoundException")]
    NotFound,
    #[strum(to_string = "ConflictException")]
    Conflict,
    #[strum(to_string = "TooManyRequestsException")]
    TooManyRequests,
    /// Custom 469 status asking the client to rotate its password
    #[strum(to_string = "ForceToChangePasswordException")]
    ForceToChangePassword,
    #[strum(to_string = "InternalServerErrorException")]
    InternalServerError,
    #[strum(to_string = "ServiceUnavailableException")]
    ServiceUnavailable,
}

impl ErrorKind {
    /// Numeric status code, including the non-standard 469
    pub const fn status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::PaymentRequired => 402,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::TooManyRequests => 429,
            Self::ForceToChangePassword => 469,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Status code as an `http` type
    pub fn status_code(self) -> StatusCode {
        StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Type tag written to the `type` field of HTTP responses
    pub fn tag(self) -> &'static str {
        self.into()
    }

    /// Message used when the caller does not supply one
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "the_request_was_invalid_or_cannot_be_otherwise_served.",
            Self::Unauthorized => "your_token_is_invalid_or_expired.",
            Self::PaymentRequired => "payment_is_required_to_perform_this_action.",
            Self::Forbidden => "you_are_not_authorized_to_perform_this_action.",
            Self::NotFound => "the_requested_resource_was_not_found.",
            Self::Conflict => {
                "the_request_could_not_be_completed_due_to_a_conflict_with_the_current_state_of_the_target_resource."
            }
            Self::TooManyRequests => "you_have_sent_too_many_requests_in_a_given_amount_of_time._please_try_again_later.",
            Self::ForceToChangePassword => "password_change_required_to_proceed.",
            Self::InternalServerError => "an_internal_server_error_occurred.",
            Self::ServiceUnavailable => "the_server_is_currently_unavailable._please_try_again_later.",
        }
    }

    /// Whether the status code is in the 4xx range
    pub const fn is_client_error(self) -> bool {
        self.status() < 500
    }
}

/// A structured error raised by handlers and business rules
///
/// The kind (and therefore the status code) is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    errors: Option<FieldErrors>,
}

impl ApiError {
    /// Create an error of the given kind with a custom message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Bad request carrying per-field errors
    pub fn bad_request_with_errors(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::bad_request(message)
        }
    }

    /// Bad request with the default message and per-field errors
    pub fn bad_request_fields(errors: FieldErrors) -> Self {
        Self::bad_request_with_errors(ErrorKind::BadRequest.default_message(), errors)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn payment_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PaymentRequired, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Not found with a message derived from the missing parameter name
    ///
    /// Produces `{name}_was_not_found.`, falling back to
    /// `the_requested_resource` when no name is given.
    pub fn not_found_for(name: Option<&str>) -> Self {
        Self::not_found(format!("{}_was_not_found.", name.unwrap_or("the_requested_resource")))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    pub fn force_to_change_password(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ForceToChangePassword, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// Internal error carrying per-field errors
    pub fn internal_with_errors(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::internal(message)
        }
    }

    /// Internal error with the default message suffixed by a parameter name
    pub fn internal_for(name: Option<&str>) -> Self {
        Self::internal(format!(
            "{}{}",
            ErrorKind::InternalServerError.default_message(),
            name.unwrap_or_default()
        ))
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Per-field errors, if any were attached
    pub const fn errors(&self) -> Option<&FieldErrors> {
        self.errors.as_ref()
    }

    /// Copy of this error with message and field errors case-converted
    #[must_use]
    pub fn converted(&self, convention: NamingConvention) -> Self {
        Self {
            kind: self.kind,
            message: convention.convert(&self.message),
            errors: convention.convert_errors(self.errors.as_ref()),
        }
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

impl HttpError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    fn error_type(&self) -> &str {
        self.kind.tag()
    }

    fn client_message(&self) -> String {
        self.message.clone()
    }
}

/// Optimistic concurrency failure reported by a persistence layer
///
/// Always answered with a 409 and a fixed message, whatever the
/// visibility setting.
#[derive(Debug, Error)]
#[error("concurrency conflict while saving {entity}")]
pub struct ConcurrencyConflict {
    entity: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConcurrencyConflict {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            source: None,
        }
    }

    /// Attach the storage error that signalled the conflict
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}
