//! Ordered classification rules
//!
//! Rules are evaluated top to bottom and the first match wins. Overlapping
//! types make the order significant: a concurrency conflict is checked before
//! the subsystem families, which are checked before structured errors.

use std::{fmt, num::IntErrorKind, num::ParseIntError, sync::Arc};

use axum::extract::rejection::QueryRejection;
use crafter_core::{ApiError, ConcurrencyConflict, Fault, NamingConvention};
use serde_json::error::Category;

use crate::messages::CONCURRENCY_MESSAGE;

type CustomMatcher = Arc<dyn Fn(&Fault) -> Option<ApiError> + Send + Sync>;

/// A single classification rule
#[derive(Clone)]
pub struct Rule {
    name: &'static str,
    matcher: RuleMatcher,
}

#[derive(Clone)]
enum RuleMatcher {
    ConcurrencyConflict,
    Filters,
    Import,
    NumberBase,
    Structured,
    Custom(CustomMatcher),
}

impl Rule {
    /// Remap optimistic concurrency failures to a 409
    pub const fn concurrency_conflict() -> Self {
        Self {
            name: "concurrency_conflict",
            matcher: RuleMatcher::ConcurrencyConflict,
        }
    }

    /// Remap query string deserialization failures to a 400
    pub const fn filters() -> Self {
        Self {
            name: "filters",
            matcher: RuleMatcher::Filters,
        }
    }

    /// Remap JSON import failures to a 400
    pub const fn import() -> Self {
        Self {
            name: "import",
            matcher: RuleMatcher::Import,
        }
    }

    /// Remap integer parsing failures to a 400
    pub const fn number_base() -> Self {
        Self {
            name: "number_base",
            matcher: RuleMatcher::NumberBase,
        }
    }

    /// Pass structured errors through with their messages converted
    pub const fn structured() -> Self {
        Self {
            name: "structured",
            matcher: RuleMatcher::Structured,
        }
    }

    /// Application-defined rule
    ///
    /// The returned error's message and field errors are case-converted the
    /// same way a raised [`ApiError`] would be.
    pub fn custom<F>(name: &'static str, matcher: F) -> Self
    where
        F: Fn(&Fault) -> Option<ApiError> + Send + Sync + 'static,
    {
        Self {
            name,
            matcher: RuleMatcher::Custom(Arc::new(matcher)),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Apply this rule, returning the client-ready error on a match
    pub fn apply(&self, fault: &Fault, convention: NamingConvention) -> Option<ApiError> {
        match &self.matcher {
            RuleMatcher::ConcurrencyConflict => concurrency_conflict(fault, convention),
            RuleMatcher::Filters => filters(fault, convention),
            RuleMatcher::Import => import(fault, convention),
            RuleMatcher::NumberBase => number_base(fault, convention),
            RuleMatcher::Structured => fault.downcast_ref::<ApiError>().map(|e| e.converted(convention)),
            RuleMatcher::Custom(matcher) => matcher(fault).map(|e| e.converted(convention)),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Ordered list of rules
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule::concurrency_conflict(),
                Rule::filters(),
                Rule::import(),
                Rule::number_base(),
                Rule::structured(),
            ],
        }
    }
}

impl Classifier {
    /// Register a rule after the subsystem families, ahead of structured errors
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        let at = self
            .rules
            .iter()
            .position(|r| matches!(r.matcher, RuleMatcher::Structured))
            .unwrap_or(self.rules.len());
        self.rules.insert(at, rule);
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// First matching rule's error, `None` when the fault is unclassified
    pub fn classify(&self, fault: &Fault, convention: NamingConvention) -> Option<ApiError> {
        self.rules.iter().find_map(|rule| rule.apply(fault, convention))
    }
}

fn subsystem_error(kind: &str, subsystem: &str, original: &str, convention: NamingConvention) -> ApiError {
    ApiError::bad_request(format!("{kind} in {subsystem}: {}", convention.convert(original)))
}

fn concurrency_conflict(fault: &Fault, convention: NamingConvention) -> Option<ApiError> {
    let wrapped = fault.causes().any(|cause| cause.is::<ConcurrencyConflict>());

    (fault.is::<ConcurrencyConflict>() || wrapped).then(|| ApiError::conflict(convention.convert(CONCURRENCY_MESSAGE)))
}

fn filters(fault: &Fault, convention: NamingConvention) -> Option<ApiError> {
    match fault.downcast_ref::<QueryRejection>()? {
        rejection @ QueryRejection::FailedToDeserializeQueryString(_) => Some(subsystem_error(
            "FailedToDeserializeQueryString",
            "Filters",
            &rejection.body_text(),
            convention,
        )),
        _ => None,
    }
}

fn import(fault: &Fault, convention: NamingConvention) -> Option<ApiError> {
    let error = fault.downcast_ref::<serde_json::Error>()?;

    let kind = match error.classify() {
        Category::Syntax => "InvalidSyntax",
        Category::Data => "InvalidData",
        Category::Eof => "UnexpectedEof",
        Category::Io => return None,
    };

    Some(subsystem_error(kind, "Import", &error.to_string(), convention))
}

fn number_base(fault: &Fault, convention: NamingConvention) -> Option<ApiError> {
    let error = fault.downcast_ref::<ParseIntError>()?;

    let kind = match error.kind() {
        IntErrorKind::Empty => "EmptyInput",
        IntErrorKind::InvalidDigit => "InvalidDigit",
        IntErrorKind::PosOverflow => "PositiveOverflow",
        IntErrorKind::NegOverflow => "NegativeOverflow",
        _ => return None,
    };

    Some(subsystem_error(kind, "NumberBase", &error.to_string(), convention))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use axum::extract::Query;
    use crafter_core::ErrorKind;
    use http::Uri;

    use super::*;

    #[derive(Debug, serde::Deserialize)]
    #[allow(dead_code)]
    struct Paging {
        page: u32,
    }

    fn query_rejection() -> QueryRejection {
        let uri: Uri = "/orders?page=first".parse().unwrap();
        Query::<Paging>::try_from_uri(&uri).unwrap_err()
    }

    #[test]
    fn default_order() {
        let names: Vec<_> = Classifier::default().rules().map(Rule::name).collect();
        assert_eq!(names, ["concurrency_conflict", "filters", "import", "number_base", "structured"]);
    }

    #[test]
    fn concurrency_conflict_maps_to_409() {
        let fault = Fault::from(ConcurrencyConflict::new("order"));
        let error = Classifier::default().classify(&fault, NamingConvention::Default).unwrap();

        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), CONCURRENCY_MESSAGE);
    }

    #[test]
    fn wrapped_concurrency_conflict_is_recognized() {
        #[derive(Debug, thiserror::Error)]
        #[error("save failed")]
        struct SaveFailed(#[source] ConcurrencyConflict);

        let fault = Fault::from(SaveFailed(ConcurrencyConflict::new("order")));
        let error = Classifier::default().classify(&fault, NamingConvention::Default).unwrap();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn concurrency_message_is_converted() {
        let fault = Fault::from(ConcurrencyConflict::new("order"));
        let error = Classifier::default().classify(&fault, NamingConvention::PascalCase).unwrap();
        assert!(!error.message().contains('_'));
    }

    #[test]
    fn query_rejection_maps_to_filters() {
        let fault = Fault::from(query_rejection());
        let error = Classifier::default().classify(&fault, NamingConvention::Default).unwrap();

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(
            error.message().starts_with("FailedToDeserializeQueryString in Filters: "),
            "{}",
            error.message()
        );
    }

    #[test]
    fn json_failures_map_to_import() {
        let syntax = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let fault = Fault::from(syntax);
        let error = Classifier::default().classify(&fault, NamingConvention::Default).unwrap();
        assert!(error.message().starts_with("UnexpectedEof in Import: "), "{}", error.message());

        let data = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let error = Classifier::default()
            .classify(&Fault::from(data), NamingConvention::Default)
            .unwrap();
        assert!(error.message().starts_with("InvalidData in Import: "), "{}", error.message());
    }

    #[test]
    fn json_io_failures_fall_through() {
        struct Closed;

        impl std::io::Read for Closed {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("socket closed"))
            }
        }

        let io = serde_json::from_reader::<_, serde_json::Value>(Closed).unwrap_err();
        assert!(io.is_io());
        assert!(
            Classifier::default()
                .classify(&Fault::from(io), NamingConvention::Default)
                .is_none()
        );
    }

    #[test]
    fn integer_parsing_maps_to_number_base() {
        let fault = Fault::from("12a".parse::<u32>().unwrap_err());
        let error = Classifier::default().classify(&fault, NamingConvention::SnakeCase).unwrap();

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), "InvalidDigit in NumberBase: invalid_digit_found_in_string");
    }

    #[test]
    fn unknown_integer_error_kinds_fall_through() {
        let zero = "0".parse::<NonZeroU32>().unwrap_err();
        assert_eq!(zero.kind(), &IntErrorKind::Zero);
        assert!(
            Classifier::default()
                .classify(&Fault::from(zero), NamingConvention::Default)
                .is_none()
        );
    }

    #[test]
    fn structured_errors_pass_through_converted() {
        let fault = Fault::from(ApiError::bad_request("Invalid Payload"));
        let error = Classifier::default().classify(&fault, NamingConvention::SnakeCase).unwrap();
        assert_eq!(error.message(), "invalid_payload");
    }

    #[test]
    fn custom_rules_run_before_structured_errors() {
        let classifier = Classifier::default().with_rule(Rule::custom("timeouts", |fault| {
            fault
                .downcast_ref::<std::io::Error>()
                .filter(|e| e.kind() == std::io::ErrorKind::TimedOut)
                .map(|_| ApiError::service_unavailable("upstream timed out"))
        }));

        let names: Vec<_> = classifier.rules().map(Rule::name).collect();
        assert_eq!(names[4], "timeouts");
        assert_eq!(names[5], "structured");

        let fault = Fault::from(std::io::Error::from(std::io::ErrorKind::TimedOut));
        let error = classifier.classify(&fault, NamingConvention::KebabCase).unwrap();
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(error.message(), "upstream-timed-out");
    }

    #[test]
    fn unrelated_errors_are_unclassified() {
        let fault = Fault::from(std::io::Error::other("disk on fire"));
        assert!(
            Classifier::default()
                .classify(&fault, NamingConvention::Default)
                .is_none()
        );
    }
}
