//! Authentication domain models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identity of the signed-in administrator as returned by the backend.
///
/// The backend is loose about this shape: `id` may be numeric or a string,
/// and sign-up responses call the display name `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, alias = "name")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    /// Fallback identity built from what the user typed.
    pub fn synthesized(username: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email,
            role: None,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Where the auth store is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// The current authentication context.
///
/// `is_authenticated`, `user` and `token` are only ever changed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    /// True while a login/signup request is in flight.
    pub is_loading: bool,
    /// Display text of the last failed auth operation.
    pub error: Option<String>,
}

impl Session {
    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Authenticating
        } else if self.is_authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }
}

/// Sign-in form input. The backend calls the username `email`.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn to_request(&self) -> SignInRequest {
        SignInRequest {
            email: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Sign-up form input.
#[derive(Debug, Clone)]
pub struct SignupCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupCredentials {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn to_request(&self) -> SignUpRequest {
        SignUpRequest {
            name: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Success payload of both auth endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Shortened token for log lines.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{prefix}…({} chars)", token.chars().count())
}
