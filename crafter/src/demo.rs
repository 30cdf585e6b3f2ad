//! Demo routes and chat hub exercising every classification path

use axum::{
    Json, Router,
    extract::{Path, Query, rejection::QueryRejection},
    routing::{get, post, put},
};
use crafter_core::{ApiError, ConcurrencyConflict, FieldErrors, Fault, guard};
use crafter_server::{Hub, HubArgument};
use serde::Deserialize;
use serde_json::{Value, json};

pub fn routes() -> Router {
    Router::new()
        .route("/demo/bad-request", get(bad_request))
        .route("/demo/bad-request/fields", post(bad_request_fields))
        .route("/demo/users/{id}", get(user))
        .route("/demo/orders", get(orders))
        .route("/demo/orders/{id}", put(update_order))
        .route("/demo/import", post(import))
        .route("/demo/password", get(password))
        .route("/demo/unhandled", get(unhandled))
        .route("/demo/panic", get(explode))
}

async fn bad_request() -> Result<(), ApiError> {
    Err(ApiError::bad_request("Invalid Payload"))
}

#[derive(Debug, Deserialize)]
struct SignUp {
    email: Option<String>,
    age: Option<i64>,
}

async fn bad_request_fields(Json(sign_up): Json<SignUp>) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();

    if sign_up.email.as_deref().is_none_or(|email| email.trim().is_empty()) {
        errors.insert("email".to_owned(), "email_address_is_required".to_owned());
    }
    if sign_up.age.is_none_or(|age| age < 0) {
        errors.insert("age".to_owned(), "age_must_not_be_negative".to_owned());
    }

    if !errors.is_empty() {
        return Err(ApiError::bad_request_with_errors("invalid_payload", errors));
    }

    Ok(Json(json!({ "email": sign_up.email })))
}

async fn user(Path(id): Path<String>) -> Result<Json<Value>, Fault> {
    let id: u32 = id.parse()?;
    let name = (id <= 100).then(|| format!("user-{id}"));
    let name = guard::if_null(name, || ApiError::not_found_for(Some("user")))?;

    Ok(Json(json!({ "id": id, "name": name })))
}

#[derive(Debug, Deserialize)]
struct Paging {
    page: u32,
    #[serde(default = "default_size")]
    size: u32,
}

const fn default_size() -> u32 {
    20
}

async fn orders(query: Result<Query<Paging>, QueryRejection>) -> Result<Json<Value>, Fault> {
    let Query(paging) = query?;
    guard::if_true(paging.size > 100, || {
        ApiError::bad_request_fields(FieldErrors::from([(
            "size".to_owned(),
            "page_size_must_not_exceed_100".to_owned(),
        )]))
    })?;

    Ok(Json(json!({ "page": paging.page, "size": paging.size, "items": [] })))
}

async fn update_order(Path(id): Path<u32>) -> Result<Json<Value>, Fault> {
    if id % 2 == 0 {
        return Err(ConcurrencyConflict::new(format!("order {id}")).into());
    }
    Ok(Json(json!({ "id": id, "updated": true })))
}

#[derive(Debug, Deserialize)]
struct ImportRow {
    sku: String,
    quantity: u32,
}

async fn import(body: String) -> Result<Json<Value>, Fault> {
    let rows: Vec<ImportRow> = serde_json::from_str(&body)?;
    guard::if_null_or_empty(Some(rows.as_slice()), || ApiError::bad_request("import_file_is_empty"))?;

    let skus: Vec<&str> = rows.iter().map(|row| row.sku.as_str()).collect();
    let quantity: u64 = rows.iter().map(|row| u64::from(row.quantity)).sum();

    Ok(Json(json!({ "imported": skus, "quantity": quantity })))
}

async fn password() -> Result<(), ApiError> {
    Err(ApiError::force_to_change_password("password_change_required_to_proceed."))
}

async fn unhandled() -> Result<(), Fault> {
    let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    Err(Fault::from_anyhow(
        anyhow::Error::new(cause).context("failed to load the order projection"),
    ))
}

async fn explode() -> &'static str {
    panic!("demo handler panicked")
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    text: String,
}

pub fn chat_hub() -> Hub {
    Hub::new("ChatHub")
        .method("SendMessage", |context, arguments| async move {
            let message: HubArgument<ChatMessage> = arguments.get(0)?;
            let text = guard::if_null_or_whitespace(Some(message.argument.text.as_str()), || {
                ApiError::bad_request("message_text_is_required")
            })?;

            let delivered = context.clients.all(
                "ReceiveMessage",
                vec![json!({ "user": context.user_id, "text": text })],
            );

            Ok::<_, Fault>(json!({ "invocationId": context.invocation_id, "delivered": delivered }))
        })
        .method("Boom", |_, _| async {
            Err::<(), Fault>(Fault::from_anyhow(anyhow::anyhow!("chat storage is unavailable")))
        })
}
