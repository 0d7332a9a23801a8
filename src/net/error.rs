//! The gateway's single error contract and error-body normalization.
//!
//! DESIGN
//! ======
//! Backend error bodies come in a few shapes: FastAPI `HTTPException`
//! (`{"detail": "..."}`), pydantic validation failures (`{"detail": [...]}`),
//! hand-written `{"message": "..."}` bodies, and anything else. [`ErrorBody`]
//! matches them in that priority order so UIs only ever see one string.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";
/// Replaces pydantic's `Field required`.
pub const REQUIRED_FIELD_NOTICE: &str = "缺少必填字段";
/// Replaces pydantic's `String should have at least N characters`.
pub const TOO_SHORT_NOTICE: &str = "内容长度不足";

static VALUE_ERROR_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Value error,\s*").expect("valid regex"));
static FIELD_REQUIRED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^Field required$").expect("valid regex"));
static STRING_TOO_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^String should have at least [0-9]+ characters?$").expect("valid regex")
});

// =============================================================================
// API ERROR
// =============================================================================

/// Every failure a gateway caller can observe. `Display` is the message a UI
/// shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401. The session has already been cleared.
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-success status, with the normalized message.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// A success response whose body is not the expected JSON.
    #[error("{0}")]
    Parse(String),
}

impl ApiError {
    /// Human-readable message for toasts and CLI output.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status behind the error, when there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Request { status, .. } => Some(*status),
            Self::Transport(_) | Self::Parse(_) => None,
        }
    }
}

// =============================================================================
// ERROR BODY
// =============================================================================

/// A non-success response body, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// `detail` is a string.
    Detail(String),
    /// `detail` is a list of validation issues; holds each issue's raw text.
    Validation(Vec<String>),
    /// No usable `detail`, but a top-level `message` string.
    Message(String),
    /// Unparseable or unrecognized body.
    Empty,
}

#[derive(Deserialize)]
struct RawErrorBody {
    #[serde(default)]
    detail: Option<RawDetail>,
    #[serde(default)]
    message: Option<RawText>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDetail {
    Text(String),
    Issues(Vec<RawIssue>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIssue {
    Entry {
        #[serde(default)]
        msg: Option<RawText>,
        #[serde(default)]
        message: Option<RawText>,
    },
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Other(IgnoredAny),
}

impl RawText {
    fn non_empty(self) -> Option<String> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl RawIssue {
    fn text(self) -> String {
        match self {
            Self::Entry { msg, message } => msg
                .and_then(RawText::non_empty)
                .or_else(|| message.and_then(RawText::non_empty))
                .unwrap_or_default(),
            Self::Other(_) => String::new(),
        }
    }
}

impl ErrorBody {
    /// Classify a raw response body. Invalid JSON counts as an empty object.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str::<Value>(body).map_or(Self::Empty, Self::from_value)
    }

    /// Classify an already-parsed JSON value. Only objects carry fields.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::Empty;
        }
        let Ok(raw) = serde_json::from_value::<RawErrorBody>(value) else {
            return Self::Empty;
        };

        match raw.detail {
            Some(RawDetail::Text(text)) => return Self::Detail(text),
            Some(RawDetail::Issues(issues)) => {
                return Self::Validation(issues.into_iter().map(RawIssue::text).collect());
            }
            Some(RawDetail::Other(_)) | None => {}
        }

        match raw.message.and_then(RawText::non_empty) {
            Some(message) => Self::Message(message),
            None => Self::Empty,
        }
    }

    /// The normalized message, or `fallback` when the body says nothing usable.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        let message = match self {
            Self::Detail(text) | Self::Message(text) => text.clone(),
            Self::Validation(issues) => issues
                .iter()
                .map(|issue| normalize_issue(issue))
                .filter(|issue| !issue.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
            Self::Empty => String::new(),
        };
        if message.is_empty() { fallback.to_owned() } else { message }
    }

    /// The normalized message with the generic `Request failed` fallback.
    #[must_use]
    pub fn message(&self) -> String {
        self.message_or(REQUEST_FAILED_MESSAGE)
    }
}

/// Strip pydantic's technical prefix and localize the common phrases.
#[must_use]
pub fn normalize_issue(raw: &str) -> String {
    let stripped = VALUE_ERROR_PREFIX.replace(raw, "");
    if FIELD_REQUIRED.is_match(&stripped) {
        return REQUIRED_FIELD_NOTICE.to_owned();
    }
    if STRING_TOO_SHORT.is_match(&stripped) {
        return TOO_SHORT_NOTICE.to_owned();
    }
    stripped.into_owned()
}
