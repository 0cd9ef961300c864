//! Chat service: chats, messages, and the chat-with-recent-messages view.
//!
//! DESIGN
//! ======
//! Every function takes the caller's connection rather than the pool, so a
//! request uses exactly one pooled connection for all of its queries and
//! hands it back when the handler returns. Each write is a single
//! auto-committed statement; nothing spans a transaction.
//!
//! Messages are read newest first. `created_at` can tie under a coarse
//! clock, so `id` is the secondary sort key.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use tracing::debug;

use crate::validation::{ChatTitle, MessageText};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat not found: {0}")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row returned from chat queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRow {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Row returned from message queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRow {
    pub id: i64,
    pub chat_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A chat with an explicitly loaded page of its messages, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatWithMessages {
    #[serde(flatten)]
    pub chat: ChatRow,
    pub messages: Vec<MessageRow>,
}

impl ChatWithMessages {
    /// A freshly created chat has no messages yet.
    #[must_use]
    pub fn empty(chat: ChatRow) -> Self {
        Self { chat, messages: Vec::new() }
    }
}

type ChatTuple = (i64, String, DateTime<Utc>);
type MessageTuple = (i64, i64, String, DateTime<Utc>);

fn chat_from_tuple((id, title, created_at): ChatTuple) -> ChatRow {
    ChatRow { id, title, created_at }
}

fn message_from_tuple((id, chat_id, text, created_at): MessageTuple) -> MessageRow {
    MessageRow { id, chat_id, text, created_at }
}

// =============================================================================
// CHATS
// =============================================================================

/// Create a new chat.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_chat(conn: &mut PgConnection, title: &ChatTitle) -> Result<ChatRow, ChatError> {
    let row = sqlx::query_as::<_, ChatTuple>(
        "INSERT INTO chats (title) VALUES ($1) RETURNING id, title, created_at",
    )
    .bind(title.as_str())
    .fetch_one(&mut *conn)
    .await?;

    Ok(chat_from_tuple(row))
}

/// Fetch a chat by ID.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_chat(conn: &mut PgConnection, chat_id: i64) -> Result<Option<ChatRow>, ChatError> {
    let row = sqlx::query_as::<_, ChatTuple>("SELECT id, title, created_at FROM chats WHERE id = $1")
        .bind(chat_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(chat_from_tuple))
}

/// List chats in creation order with offset pagination. Not routed over HTTP.
///
/// # Errors
///
/// Returns a database error if the query fails.
#[allow(dead_code)]
pub async fn list_chats(conn: &mut PgConnection, skip: i64, limit: i64) -> Result<Vec<ChatRow>, ChatError> {
    let rows = sqlx::query_as::<_, ChatTuple>(
        "SELECT id, title, created_at
         FROM chats
         ORDER BY id ASC
         LIMIT $1 OFFSET $2",
    )
    .bind(limit.max(0))
    .bind(skip.max(0))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(chat_from_tuple).collect())
}

/// Delete a chat by ID. Its messages go with it via `ON DELETE CASCADE`.
/// Returns whether a row was deleted.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete_chat(conn: &mut PgConnection, chat_id: i64) -> Result<bool, ChatError> {
    let result = sqlx::query("DELETE FROM chats WHERE id = $1")
        .bind(chat_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Post a message into an existing chat.
///
/// # Errors
///
/// Returns `NotFound` if the chat does not exist, including when it is
/// deleted between the existence check and the insert.
pub async fn create_message(
    conn: &mut PgConnection,
    chat_id: i64,
    text: &MessageText,
) -> Result<MessageRow, ChatError> {
    if get_chat(conn, chat_id).await?.is_none() {
        return Err(ChatError::NotFound(chat_id));
    }
    insert_message(conn, chat_id, text).await
}

/// Insert a message without checking the chat first.
///
/// A foreign-key violation means the chat does not exist (or was deleted
/// concurrently) and is reported as `NotFound`.
///
/// # Errors
///
/// Returns `NotFound` if no chat has `chat_id`, or any database error.
pub async fn insert_message(
    conn: &mut PgConnection,
    chat_id: i64,
    text: &MessageText,
) -> Result<MessageRow, ChatError> {
    let row = sqlx::query_as::<_, MessageTuple>(
        "INSERT INTO messages (chat_id, text) VALUES ($1, $2)
         RETURNING id, chat_id, text, created_at",
    )
    .bind(chat_id)
    .bind(text.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_foreign_key_violation()) {
            debug!(%chat_id, "chat removed before message insert");
            ChatError::NotFound(chat_id)
        } else {
            ChatError::Database(e)
        }
    })?;

    Ok(message_from_tuple(row))
}

/// Load up to `limit` messages of a chat, newest first, skipping `offset`.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_messages(
    conn: &mut PgConnection,
    chat_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<MessageRow>, ChatError> {
    let rows = sqlx::query_as::<_, MessageTuple>(
        "SELECT id, chat_id, text, created_at
         FROM messages
         WHERE chat_id = $1
         ORDER BY created_at DESC, id DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(chat_id)
    .bind(limit.max(0))
    .bind(offset.max(0))
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(message_from_tuple).collect())
}

/// Fetch a chat together with its `limit` most recent messages.
///
/// # Errors
///
/// Returns `NotFound` if the chat does not exist.
pub async fn get_chat_with_messages(
    conn: &mut PgConnection,
    chat_id: i64,
    limit: i64,
) -> Result<ChatWithMessages, ChatError> {
    let chat = get_chat(conn, chat_id).await?.ok_or(ChatError::NotFound(chat_id))?;
    let messages = list_messages(conn, chat_id, limit, 0).await?;

    Ok(ChatWithMessages { chat, messages })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
