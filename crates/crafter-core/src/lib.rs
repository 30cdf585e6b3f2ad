//! Shared building blocks for response crafting
//!
//! Holds the structured error taxonomy, the type-erased [`Fault`] that
//! handlers raise, naming conventions, and the context types the delivery
//! adapters hand to the dispatcher. Nothing in here knows about a transport.

#![allow(clippy::must_use_candidate)]

pub mod case;
pub mod context;
mod error;
mod fault;
pub mod guard;
pub mod verbose;
mod visibility;

pub use case::NamingConvention;
pub use context::{HubInvocation, RequestContext};
pub use error::{ApiError, ConcurrencyConflict, ErrorKind, FieldErrors, HttpError};
#[cfg(feature = "axum")]
pub use fault::RaisedFault;
pub use fault::Fault;
pub use visibility::Visibility;
