//! Classified backend errors.
//!
//! Every non-2xx response and every transport failure is turned into an
//! [`ApiError`] by exactly one function, [`classify_response`] (or
//! [`ApiError::no_response`] when nothing came back), so all stores share the
//! same taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const MSG_UNAUTHORIZED: &str = "Authentication required. Please login again.";
pub const MSG_CONFLICT: &str = "Resource already exists.";
pub const MSG_BAD_REQUEST: &str = "Invalid request format.";
pub const MSG_SERVER: &str = "Server error. Please try again later.";
pub const MSG_NO_RESPONSE: &str = "Unable to connect to server. Please check your connection.";

/// Error categories derived from the HTTP response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// HTTP 404
    NotFound,
    /// HTTP 401
    Unauthorized,
    /// HTTP 409
    Conflict,
    /// HTTP 400
    BadRequest,
    /// HTTP >= 500
    Server,
    /// The request was sent but no response arrived (connect failure, timeout).
    NoResponse,
    /// A 2xx body did not have the expected shape.
    Decode,
    /// Any other non-2xx status.
    Other,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            409 => Self::Conflict,
            s if s >= 500 => Self::Server,
            _ => Self::Other,
        }
    }

    /// Generic user-facing text for this kind, if there is one.
    pub fn generic_message(self) -> Option<&'static str> {
        match self {
            Self::Unauthorized => Some(MSG_UNAUTHORIZED),
            Self::Conflict => Some(MSG_CONFLICT),
            Self::BadRequest => Some(MSG_BAD_REQUEST),
            Self::Server => Some(MSG_SERVER),
            Self::NoResponse => Some(MSG_NO_RESPONSE),
            Self::NotFound | Self::Decode | Self::Other => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Conflict => "conflict",
            Self::BadRequest => "bad_request",
            Self::Server => "server",
            Self::NoResponse => "no_response",
            Self::Decode => "decode",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified backend failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{}", self.describe())]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, absent for transport failures.
    pub status: Option<u16>,
    /// Backend-supplied `error`/`message` text, or a local detail for
    /// transport and decode failures.
    pub message: Option<String>,
    /// The backend's structured error body, when it sent JSON.
    pub payload: Option<Value>,
}

impl ApiError {
    /// A request that never produced a response.
    pub fn no_response(detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::NoResponse,
            status: None,
            message: Some(detail.into()),
            payload: None,
        }
    }

    /// A 2xx response whose body could not be decoded.
    pub fn decode(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status,
            message: Some(detail.into()),
            payload: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }

    pub fn is_no_response(&self) -> bool {
        self.kind == ApiErrorKind::NoResponse
    }

    /// The backend's own explanation, if it sent one.
    ///
    /// Transport and decode details are local diagnostics, not backend text.
    pub fn backend_message(&self) -> Option<&str> {
        match self.kind {
            ApiErrorKind::NoResponse | ApiErrorKind::Decode => None,
            _ => self.message.as_deref(),
        }
    }

    /// Text to show the user.
    ///
    /// Precedence: the operation's own not-found text on a 404, then the
    /// backend message, then the generic text for the kind, then `fallback`.
    pub fn display_message(&self, fallback: &str, not_found: Option<&str>) -> String {
        if self.is_not_found()
            && let Some(text) = not_found
        {
            return text.to_string();
        }
        if let Some(text) = self.backend_message() {
            return text.to_string();
        }
        self.kind
            .generic_message()
            .unwrap_or(fallback)
            .to_string()
    }

    fn describe(&self) -> String {
        let status = self
            .status
            .map(|s| format!(" (HTTP {s})"))
            .unwrap_or_default();
        match &self.message {
            Some(message) => format!("API {} error{}: {}", self.kind, status, message),
            None => format!("API {} error{}", self.kind, status),
        }
    }
}

/// Classifies a non-2xx response.
///
/// `body` is the response parsed as JSON when that was possible. A string
/// `error` field wins over a string `message` field; blank strings are ignored.
pub fn classify_response(status: u16, body: Option<&Value>) -> ApiError {
    let message = body.and_then(|b| {
        ["error", "message"].iter().find_map(|field| {
            b.get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    });

    ApiError {
        kind: ApiErrorKind::from_status(status),
        status: Some(status),
        message,
        payload: body.cloned(),
    }
}
