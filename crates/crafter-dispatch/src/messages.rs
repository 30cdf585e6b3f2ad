//! Fixed client-facing messages, written in snake_case before conversion

/// Answer to any error that no rule recognizes
pub const DEFAULT_MESSAGE: &str = "something_went_wrong_please_try_again_later_and_or_contact_it_support";

/// Answer to an optimistic concurrency failure
pub const CONCURRENCY_MESSAGE: &str =
    "a_concurrency_conflict_occurred._please_reload_the_resource_and_try_you_update_again";

/// Type tag of the generic fallback response
pub const FALLBACK_TYPE: &str = "InternalServerError";

/// Hub event that carries a classified error back to the caller
pub const RECEIVE_ERROR_EVENT: &str = "ReceiveError";
