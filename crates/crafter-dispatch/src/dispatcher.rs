use std::sync::Arc;

use crafter_core::{ApiError, FieldErrors, Fault, HttpError, HubInvocation, NamingConvention, RequestContext, Visibility, verbose};

use crate::{
    messages::{DEFAULT_MESSAGE, FALLBACK_TYPE},
    response::{ErrorResponse, HubErrorResponse},
    rules::{Classifier, Rule},
};

/// Outcome of classifying a fault
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A rule recognized the fault; message and errors are already converted
    Structured(ApiError),
    /// No rule matched
    Unhandled {
        /// Type tag sent to the client
        error_type: String,
        /// Client message, already converted
        message: String,
        /// Full diagnostic, always logged
        verbose: String,
    },
}

impl Classification {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Structured(error) => error.status_code().as_u16(),
            Self::Unhandled { .. } => 500,
        }
    }

    pub fn error_type(&self) -> &str {
        match self {
            Self::Structured(error) => error.error_type(),
            Self::Unhandled { error_type, .. } => error_type,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Structured(error) => error.message(),
            Self::Unhandled { message, .. } => message,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Structured(error) => error.errors(),
            Self::Unhandled { .. } => None,
        }
    }
}

/// Turns raised faults into client payloads and log records
///
/// Holds only configuration resolved at startup, so clones are cheap and
/// share the same rules.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    visibility: Visibility,
    convention: NamingConvention,
    classifier: Arc<Classifier>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Visibility::Public, NamingConvention::Default)
    }
}

impl Dispatcher {
    pub fn new(visibility: Visibility, convention: NamingConvention) -> Self {
        Self {
            visibility,
            convention,
            classifier: Arc::new(Classifier::default()),
        }
    }

    /// Add an application rule, evaluated before structured errors
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        let classifier = Arc::unwrap_or_clone(self.classifier);
        self.classifier = Arc::new(classifier.with_rule(rule));
        self
    }

    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub const fn convention(&self) -> NamingConvention {
        self.convention
    }

    /// Classify a fault without side effects
    pub fn classify(&self, fault: &Fault) -> Classification {
        if let Some(error) = self.classifier.classify(fault, self.convention) {
            return Classification::Structured(error);
        }

        let verbose = verbose::render(fault);

        if self.visibility.is_private() {
            Classification::Unhandled {
                error_type: fault.type_name().to_owned(),
                message: self.convention.convert(&verbose),
                verbose,
            }
        } else {
            Classification::Unhandled {
                error_type: FALLBACK_TYPE.to_owned(),
                message: self.convention.convert(DEFAULT_MESSAGE),
                verbose,
            }
        }
    }

    /// Shape the response for a failing HTTP request and log it once
    pub fn handle_http(&self, fault: &Fault, context: &RequestContext) -> ErrorResponse {
        let classification = self.classify(fault);

        match &classification {
            Classification::Structured(error) => match error.errors().filter(|e| !e.is_empty()) {
                Some(errors) => tracing::warn!(
                    request_id = %context.request_id,
                    instance = %context.instance,
                    status_code = classification.status_code(),
                    ?errors,
                    "api error encountered: {}",
                    error.message()
                ),
                None => tracing::warn!(
                    request_id = %context.request_id,
                    instance = %context.instance,
                    status_code = classification.status_code(),
                    "api error encountered: {}",
                    error.message()
                ),
            },
            Classification::Unhandled { verbose, .. } => tracing::error!(
                request_id = %context.request_id,
                instance = %context.instance,
                "unhandled error encountered: {verbose}"
            ),
        }

        ErrorResponse {
            request_id: context.request_id.clone(),
            trace_id: context.trace_id.clone(),
            instance: context.instance.clone(),
            status_code: classification.status_code(),
            error_type: classification.error_type().to_owned(),
            errors: classification.errors().cloned(),
            message: classification.message().to_owned(),
        }
    }

    /// Shape the payload for a failing hub invocation and log it once
    pub fn handle_hub(&self, fault: &Fault, invocation: &HubInvocation) -> HubErrorResponse {
        let classification = self.classify(fault);

        let span = tracing::warn_span!(
            "hub_error",
            trace_id = %invocation.trace_id,
            hub = %invocation.hub,
            method = %invocation.method,
            connection_id = %invocation.connection_id,
            user_id = invocation.user_id.as_deref().unwrap_or_default(),
            invocation_id = %invocation.invocation_id,
            status_code = classification.status_code(),
        );
        let _entered = span.enter();

        match &classification {
            Classification::Structured(error) => match error.errors().filter(|e| !e.is_empty()) {
                Some(errors) => tracing::warn!(?errors, "hub error: {}", error.message()),
                None => tracing::warn!("hub error: {}", error.message()),
            },
            Classification::Unhandled { verbose, .. } => tracing::error!("unhandled hub error: {verbose}"),
        }

        HubErrorResponse {
            trace_id: invocation.trace_id.clone(),
            invocation_id: invocation.invocation_id.clone(),
            instance: invocation.method.clone(),
            status_code: classification.status_code(),
            message: classification.message().to_owned(),
            errors: classification.errors().cloned(),
        }
    }
}
