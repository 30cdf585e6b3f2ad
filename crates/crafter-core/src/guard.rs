//! Precondition guards that raise a structured error
//!
//! Every guard takes the constructor of the error to raise, so the same
//! helpers serve all variants:
//!
//! ```
//! use crafter_core::{ApiError, guard};
//!
//! fn rename(name: Option<&str>) -> Result<String, ApiError> {
//!     let name = guard::if_null_or_whitespace(name, || ApiError::bad_request("name_is_required"))?;
//!     Ok(name.to_uppercase())
//! }
//!
//! assert!(rename(Some("  ")).is_err());
//! ```
//!
//! The constructor only runs when the guard trips.

use crate::ApiError;

/// Raise when `value` is `None`, otherwise hand it back
///
/// # Errors
///
/// Returns the error built by `raise` when `value` is `None`
pub fn if_null<T>(value: Option<T>, raise: impl FnOnce() -> ApiError) -> Result<T, ApiError> {
    value.ok_or_else(raise)
}

/// Raise when `value` is missing, empty or only whitespace
///
/// # Errors
///
/// Returns the error built by `raise` when the string is blank
pub fn if_null_or_whitespace(value: Option<&str>, raise: impl FnOnce() -> ApiError) -> Result<&str, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(raise()),
    }
}

/// Raise when the collection is missing, empty, or has any blank entry
///
/// # Errors
///
/// Returns the error built by `raise` when the check fails
pub fn if_null_or_whitespace_all<S>(values: Option<&[S]>, raise: impl FnOnce() -> ApiError) -> Result<&[S], ApiError>
where
    S: AsRef<str>,
{
    match values {
        Some(values) if !values.is_empty() && values.iter().all(|v| !v.as_ref().trim().is_empty()) => Ok(values),
        _ => Err(raise()),
    }
}

/// Raise when the collection is missing, empty, or has any missing or blank entry
///
/// # Errors
///
/// Returns the error built by `raise` when the check fails
pub fn if_null_or_whitespace_entries<S>(
    values: Option<&[Option<S>]>,
    raise: impl FnOnce() -> ApiError,
) -> Result<&[Option<S>], ApiError>
where
    S: AsRef<str>,
{
    let blank = |value: &Option<S>| value.as_ref().is_none_or(|v| v.as_ref().trim().is_empty());

    match values {
        Some(values) if !values.is_empty() && !values.iter().any(blank) => Ok(values),
        _ => Err(raise()),
    }
}

/// Raise when the collection is missing or empty
///
/// # Errors
///
/// Returns the error built by `raise` when the check fails
pub fn if_null_or_empty<T>(values: Option<&[T]>, raise: impl FnOnce() -> ApiError) -> Result<&[T], ApiError> {
    match values {
        Some(values) if !values.is_empty() => Ok(values),
        _ => Err(raise()),
    }
}

/// Raise when the number is missing or below zero
///
/// # Errors
///
/// Returns the error built by `raise` when the check fails
pub fn if_null_or_negative<N>(value: Option<N>, raise: impl FnOnce() -> ApiError) -> Result<N, ApiError>
where
    N: PartialOrd + Default,
{
    match value {
        Some(value) if value >= N::default() => Ok(value),
        _ => Err(raise()),
    }
}

/// Raise when `condition` holds
///
/// # Errors
///
/// Returns the error built by `raise` when `condition` is true
pub fn if_true(condition: bool, raise: impl FnOnce() -> ApiError) -> Result<(), ApiError> {
    if condition { Err(raise()) } else { Ok(()) }
}
