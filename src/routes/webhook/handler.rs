use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method},
    response::Response,
};

use super::model::WebhookRelay;
use crate::AppState;
use crate::error::ProxyError;

#[axum::debug_handler]
pub async fn get_webhook(
    State(state): State<AppState>,
    Path((webhook_id, webhook_token)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    WebhookRelay::relay(
        &state,
        Method::GET,
        &webhook_id,
        &webhook_token,
        None,
        &headers,
        body,
    )
    .await
}

#[axum::debug_handler]
pub async fn execute_webhook(
    State(state): State<AppState>,
    Path((webhook_id, webhook_token)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    WebhookRelay::relay(
        &state,
        Method::POST,
        &webhook_id,
        &webhook_token,
        None,
        &headers,
        body,
    )
    .await
}

#[axum::debug_handler]
pub async fn edit_message(
    State(state): State<AppState>,
    Path((webhook_id, webhook_token, message_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    WebhookRelay::relay(
        &state,
        Method::PATCH,
        &webhook_id,
        &webhook_token,
        Some(&message_id),
        &headers,
        body,
    )
    .await
}

#[axum::debug_handler]
pub async fn delete_message(
    State(state): State<AppState>,
    Path((webhook_id, webhook_token, message_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    WebhookRelay::relay(
        &state,
        Method::DELETE,
        &webhook_id,
        &webhook_token,
        Some(&message_id),
        &headers,
        body,
    )
    .await
}
