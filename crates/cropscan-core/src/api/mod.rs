//! The HTTP client seam shared by every store.

pub mod endpoints;
mod error;

pub use error::{
    ApiError, ApiErrorKind, MSG_BAD_REQUEST, MSG_CONFLICT, MSG_NO_RESPONSE, MSG_SERVER,
    MSG_UNAUTHORIZED, classify_response,
};

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single point of outbound communication with the backend.
///
/// Implementations talk JSON to one fixed origin and carry one cross-cutting
/// `Authorization: Bearer <token>` header. The header is process-wide state:
/// once set it is attached to every later request from every store, until it
/// is cleared. Only the auth store writes it.
///
/// A request resolves or fails exactly once. There is no retry and no queue.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Sends one request and returns the parsed response body.
    ///
    /// An empty 2xx body is `Value::Null`.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;

    /// Replaces (`Some`) or removes (`None`) the bearer token.
    fn set_bearer_token(&self, token: Option<String>);

    /// The token currently attached to outgoing requests.
    fn bearer_token(&self) -> Option<String>;

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(HttpMethod::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(HttpMethod::Post, path, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        self.request(HttpMethod::Put, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(HttpMethod::Delete, path, None).await
    }
}

/// Decodes a 2xx body into a typed value.
pub fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::decode(None, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
    }

    #[test]
    fn test_decode_body_ok() {
        let items: Vec<Item> = decode_body(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn test_decode_body_shape_mismatch_is_decode_error() {
        let err = decode_body::<Vec<Item>>(json!({"items": []})).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
        assert!(err.message.is_some());
    }
}
