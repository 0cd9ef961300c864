//! Chat and message routes.
//!
//! Every handler validates its input before borrowing a connection, so a
//! rejected request never touches the pool. The borrowed connection is
//! dropped (and returned to the pool) when the handler returns, on success
//! and error alike.

use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Deserialize;
use tracing::{info, warn};

use super::error::ApiError;
use crate::services::chat::{self, ChatError, ChatWithMessages, MessageRow};
use crate::state::AppState;
use crate::validation::{ChatCreate, MessageCreate};

/// Chat routes, mounted under `/api`. Collection paths answer with and
/// without the trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chats", post(create_chat))
        .route("/chats/", post(create_chat))
        .route("/chats/{chat_id}", get(get_chat).delete(delete_chat))
        .route("/chats/{chat_id}/messages", post(create_message))
        .route("/chats/{chat_id}/messages/", post(create_message))
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub limit: Option<i64>,
}

fn warn_not_found(err: &ChatError) {
    if let ChatError::NotFound(chat_id) = err {
        warn!(%chat_id, "chat not found");
    }
}

/// `POST /api/chats/`: create a chat.
pub async fn create_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatWithMessages>), ApiError> {
    let Json(body) = body?;
    let title = body.validate()?;
    info!(title = title.as_str(), "creating chat");

    let mut conn = state.pool.acquire().await?;
    let row = chat::create_chat(&mut conn, &title).await?;

    Ok((StatusCode::CREATED, Json(ChatWithMessages::empty(row))))
}

/// `POST /api/chats/:id/messages/`: post a message into a chat.
pub async fn create_message(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<MessageCreate>, JsonRejection>,
) -> Result<Json<MessageRow>, ApiError> {
    let Path(chat_id) = path?;
    let Json(body) = body?;
    let text = body.validate()?;
    info!(%chat_id, "creating message");

    let mut conn = state.pool.acquire().await?;
    let message = chat::create_message(&mut conn, chat_id, &text)
        .await
        .inspect_err(warn_not_found)?;

    Ok(Json(message))
}

/// `GET /api/chats/:id?limit=N`: chat with its most recent messages.
pub async fn get_chat(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Result<Json<ChatWithMessages>, ApiError> {
    let Path(chat_id) = path?;
    let Query(query) = query?;
    let limit = state.limits.resolve(query.limit)?;
    info!(%chat_id, %limit, "getting chat");

    let mut conn = state.pool.acquire().await?;
    let view = chat::get_chat_with_messages(&mut conn, chat_id, limit)
        .await
        .inspect_err(warn_not_found)?;

    Ok(Json(view))
}

/// `DELETE /api/chats/:id`: delete a chat and all of its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(chat_id) = path?;
    info!(%chat_id, "deleting chat");

    let mut conn = state.pool.acquire().await?;
    if !chat::delete_chat(&mut conn, chat_id).await? {
        warn!(%chat_id, "chat not found for deletion");
        return Err(ApiError::ChatNotFound(chat_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "chats_test.rs"]
mod tests;
