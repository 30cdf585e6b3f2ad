//! Classification of raised faults into client error payloads
//!
//! The [`Dispatcher`] runs an ordered list of [`Rule`]s over a [`Fault`](crafter_core::Fault),
//! falls back to a generic 500 when nothing matches, and emits exactly one
//! log record per fault. Transports call [`Dispatcher::handle_http`] or
//! [`Dispatcher::handle_hub`] and write the returned payload themselves.

#![allow(clippy::must_use_candidate)]

mod dispatcher;
pub mod messages;
mod response;
pub mod rules;

pub use dispatcher::{Classification, Dispatcher};
pub use response::{ErrorResponse, HubErrorResponse};
pub use rules::{Classifier, Rule};
