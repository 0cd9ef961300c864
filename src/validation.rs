//! Request shapes and field validation.
//!
//! DESIGN
//! ======
//! Raw request bodies deserialize into `ChatCreate` / `MessageCreate`. They
//! are turned into `ChatTitle` / `MessageText` before anything touches the
//! database, so the data-access layer never sees unvalidated input.
//!
//! Values are trimmed first and the length bound is checked on the trimmed
//! value, counted in characters. A whitespace-only title is rejected as
//! too short. NUL characters are rejected outright.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub const TITLE_MAX_CHARS: usize = 200;
pub const TEXT_MAX_CHARS: usize = 5000;

// =============================================================================
// ERRORS
// =============================================================================

/// A single field-level validation failure.
///
/// Serializes as `{"loc": [location, field], "msg": ..., "type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}.{field}: {message}")]
pub struct ValidationError {
    /// Where the field came from: `body`, `query` or `path`.
    pub location: &'static str,
    pub field: String,
    /// Machine-readable error code, e.g. `string_too_short`.
    pub kind: &'static str,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn body(field: impl Into<String>, kind: &'static str, message: String) -> Self {
        Self { location: "body", field: field.into(), kind, message }
    }

    #[must_use]
    pub fn query(field: impl Into<String>, kind: &'static str, message: String) -> Self {
        Self { location: "query", field: field.into(), kind, message }
    }

    #[must_use]
    pub fn path(field: impl Into<String>, kind: &'static str, message: String) -> Self {
        Self { location: "path", field: field.into(), kind, message }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Detail<'a> {
            loc: [&'a str; 2],
            msg: &'a str,
            #[serde(rename = "type")]
            kind: &'a str,
        }

        Detail { loc: [self.location, self.field.as_str()], msg: &self.message, kind: self.kind }.serialize(serializer)
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

/// Body of `POST /chats/`.
///
/// Fields are kept as raw JSON so a missing or mistyped field is reported
/// against its own name rather than as an unreadable body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCreate {
    #[serde(default)]
    pub title: Option<Value>,
}

impl ChatCreate {
    /// # Errors
    ///
    /// Returns an error if the title is missing, not a string, or its
    /// trimmed value is empty, too long or contains a NUL character.
    pub fn validate(&self) -> Result<ChatTitle, ValidationError> {
        ChatTitle::parse(required_str("title", self.title.as_ref())?)
    }
}

/// Body of `POST /chats/{id}/messages/`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageCreate {
    #[serde(default)]
    pub text: Option<Value>,
}

impl MessageCreate {
    /// # Errors
    ///
    /// Returns an error if the text is missing, not a string, or its
    /// trimmed value is empty, too long or contains a NUL character.
    pub fn validate(&self) -> Result<MessageText, ValidationError> {
        MessageText::parse(required_str("text", self.text.as_ref())?)
    }
}

fn required_str<'a>(field: &'static str, value: Option<&'a Value>) -> Result<&'a str, ValidationError> {
    match value {
        None => Err(ValidationError::body(field, "missing", "Field required".to_string())),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::body(
            field,
            "string_type",
            "Input should be a valid string".to_string(),
        )),
    }
}

// =============================================================================
// VALIDATED VALUES
// =============================================================================

/// A trimmed chat title of 1..=200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTitle(String);

impl ChatTitle {
    /// # Errors
    ///
    /// Returns an error if the trimmed value is empty, exceeds the limit or
    /// contains a NUL character.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        trimmed_within("title", raw, TITLE_MAX_CHARS).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trimmed message text of 1..=5000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    /// # Errors
    ///
    /// Returns an error if the trimmed value is empty, exceeds the limit or
    /// contains a NUL character.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        trimmed_within("text", raw, TEXT_MAX_CHARS).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn trimmed_within(field: &'static str, raw: &str, max_chars: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(ValidationError::body(
            field,
            "string_too_short",
            "String should have at least 1 character".to_string(),
        ));
    }
    if len > max_chars {
        return Err(ValidationError::body(
            field,
            "string_too_long",
            format!("String should have at most {max_chars} characters"),
        ));
    }
    // Postgres text columns cannot store NUL.
    if trimmed.contains('\0') {
        return Err(ValidationError::body(
            field,
            "string_pattern_mismatch",
            "String should not contain NUL characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
