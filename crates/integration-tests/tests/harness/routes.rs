//! Fixture routes raising one error of each family

use axum::{
    Json, Router,
    extract::{Path, Query, rejection::QueryRejection},
    routing::{get, post},
};
use crafter_core::{ApiError, ConcurrencyConflict, FieldErrors, Fault, guard};
use crafter_dispatch::Rule;
use crafter_server::Hub;
use serde::Deserialize;
use serde_json::{Value, json};

pub fn fixtures() -> Router {
    Router::new()
        .route("/ok", get(|| async { Json(json!({ "ok": true })) }))
        .route("/bad-request", get(bad_request))
        .route("/fields", get(fields))
        .route("/users/{id}", get(user))
        .route("/orders", get(orders))
        .route("/save", post(save))
        .route("/import", post(import))
        .route("/password", get(password))
        .route("/unhandled", get(unhandled))
        .route("/timeout", get(timeout))
        .route("/panic", get(explode))
}

pub fn chat_hub() -> Hub {
    Hub::new("ChatHub").method("Ping", |_, _| async { Ok::<_, Fault>("pong") })
}

/// Maps timed-out io errors to a 503
pub fn timeout_rule() -> Rule {
    Rule::custom("timeouts", |fault| {
        fault
            .downcast_ref::<std::io::Error>()
            .filter(|e| e.kind() == std::io::ErrorKind::TimedOut)
            .map(|_| ApiError::service_unavailable("Upstream Timed Out"))
    })
}

async fn bad_request() -> Result<(), ApiError> {
    Err(ApiError::bad_request("Invalid Payload"))
}

async fn fields() -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    errors.insert("Email Address".to_owned(), "Email Is Required".to_owned());
    errors.insert("Age".to_owned(), "Age Must Be Positive".to_owned());
    Err(ApiError::bad_request_with_errors("Invalid Payload", errors))
}

async fn user(Path(id): Path<String>) -> Result<Json<Value>, Fault> {
    let id: u32 = id.parse()?;
    let name = guard::if_null((id == 1).then_some("ada"), || ApiError::not_found_for(Some("user")))?;
    Ok(Json(json!({ "id": id, "name": name })))
}

#[derive(Debug, Deserialize)]
struct Paging {
    page: u32,
}

async fn orders(query: Result<Query<Paging>, QueryRejection>) -> Result<Json<Value>, Fault> {
    let Query(paging) = query?;
    Ok(Json(json!({ "page": paging.page })))
}

async fn save() -> Result<(), Fault> {
    Err(ConcurrencyConflict::new("order").into())
}

async fn import(body: String) -> Result<Json<Value>, Fault> {
    let rows: Vec<Value> = serde_json::from_str(&body)?;
    Ok(Json(json!({ "imported": rows.len() })))
}

async fn password() -> Result<(), ApiError> {
    Err(ApiError::force_to_change_password("Password Change Required"))
}

async fn unhandled() -> Result<(), Fault> {
    Err(Fault::from_anyhow(anyhow::anyhow!("database connection refused")))
}

async fn timeout() -> Result<(), Fault> {
    Err(std::io::Error::from(std::io::ErrorKind::TimedOut).into())
}

async fn explode() -> &'static str {
    panic!("fixture handler panicked")
}
