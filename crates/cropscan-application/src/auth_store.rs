//! Authentication state and the login/signup/logout flows.

use std::sync::Arc;

use cropscan_core::api::{ApiClient, ApiError, decode_body, endpoints};
use cropscan_core::auth::{
    AuthResponse, LoginCredentials, Session, SignupCredentials, User, redact_token,
};
use cropscan_core::error::{CropScanError, Result};
use cropscan_core::snapshot::{AuthSnapshot, SnapshotRepository};
use serde_json::Value;
use tokio::sync::RwLock;

const LOGIN_FAILED: &str = "Login failed";
const SIGNUP_FAILED: &str = "Signup failed";

/// Owns the [`Session`] and is the only writer of the adapter's bearer token.
///
/// Only the token is persisted. `initialize_auth` restores it without asking
/// the backend whether it is still valid; a stale token surfaces as a 401 on
/// the next request.
pub struct AuthStore {
    api: Arc<dyn ApiClient>,
    repository: Arc<dyn SnapshotRepository<AuthSnapshot>>,
    session: RwLock<Session>,
}

impl AuthStore {
    pub fn new(
        api: Arc<dyn ApiClient>,
        repository: Arc<dyn SnapshotRepository<AuthSnapshot>>,
    ) -> Self {
        Self {
            api,
            repository,
            session: RwLock::new(Session::default()),
        }
    }

    /// Restores a persisted token, if any. Never touches the network.
    pub async fn initialize_auth(&self) {
        let token = match self.repository.load().await {
            Ok(snapshot) => snapshot.and_then(|s| s.token),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted auth token");
                None
            }
        };

        let Some(token) = token else {
            tracing::debug!("No persisted token, staying anonymous");
            return;
        };

        let mut session = self.session.write().await;
        self.api.set_bearer_token(Some(token.clone()));
        tracing::info!(token = %redact_token(&token), "Restored persisted session");
        session.is_authenticated = true;
        session.token = Some(token);
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<()> {
        let body = serde_json::to_value(credentials.to_request())?;
        let fallback_user = User::synthesized(credentials.username.trim(), None);

        tracing::debug!(email = %credentials.username.trim(), "Attempting login");
        self.authenticate(endpoints::SIGN_IN, body, fallback_user, LOGIN_FAILED)
            .await
    }

    pub async fn signup(&self, credentials: SignupCredentials) -> Result<()> {
        let body = serde_json::to_value(credentials.to_request())?;
        let fallback_user = User::synthesized(
            credentials.username.trim(),
            Some(credentials.email.trim().to_string()),
        );

        tracing::debug!(name = %credentials.username.trim(), "Attempting signup");
        self.authenticate(endpoints::SIGN_UP, body, fallback_user, SIGNUP_FAILED)
            .await
    }

    /// Clears token, user and flag together, then drops the persisted token.
    pub async fn logout(&self) {
        {
            let mut session = self.session.write().await;
            self.api.set_bearer_token(None);
            *session = Session::default();
        }

        if let Err(e) = self.repository.clear().await {
            tracing::warn!(error = %e, "Failed to remove persisted auth token");
        }
        tracing::info!("Logged out");
    }

    pub async fn clear_error(&self) {
        self.session.write().await.error = None;
    }

    pub async fn state(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    async fn authenticate(
        &self,
        path: &str,
        body: Value,
        fallback_user: User,
        fallback_message: &str,
    ) -> Result<()> {
        {
            let mut session = self.session.write().await;
            session.is_loading = true;
            session.error = None;
        }

        let response = match self
            .api
            .post(path, Some(body))
            .await
            .and_then(decode_body::<AuthResponse>)
        {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err, fallback_message).await),
        };

        let user = response.user.unwrap_or(fallback_user);
        let Some(token) = response.token.filter(|t| !t.trim().is_empty()) else {
            return Err(self.reject_tokenless(&user.username, fallback_message).await);
        };

        if let Err(e) = self
            .repository
            .save(AuthSnapshot {
                token: Some(token.clone()),
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to persist auth token");
        }

        let mut session = self.session.write().await;
        self.api.set_bearer_token(Some(token.clone()));
        tracing::info!(
            user = %user.username,
            token = %redact_token(&token),
            "Authenticated"
        );
        session.is_authenticated = true;
        session.user = Some(user);
        session.token = Some(token);
        session.is_loading = false;
        Ok(())
    }

    /// A 2xx without a usable token ends any previous session.
    ///
    /// Session, header and persisted token are all cleared so none of them
    /// keeps a credential the backend did not just confirm.
    async fn reject_tokenless(&self, username: &str, fallback_message: &str) -> CropScanError {
        let err = ApiError::decode(None, "authentication response carried no token");
        tracing::warn!(user = %username, "{}: {}", fallback_message, err);

        {
            let mut session = self.session.write().await;
            self.api.set_bearer_token(None);
            *session = Session {
                error: Some(err.display_message(fallback_message, None)),
                ..Session::default()
            };
        }
        if let Err(e) = self.repository.clear().await {
            tracing::warn!(error = %e, "Failed to remove persisted auth token");
        }
        CropScanError::Api(err)
    }

    async fn fail(&self, err: ApiError, fallback_message: &str) -> CropScanError {
        let message = err.display_message(fallback_message, None);
        tracing::warn!(status = ?err.status, kind = %err.kind, "{}: {}", fallback_message, err);

        let mut session = self.session.write().await;
        session.is_loading = false;
        session.error = Some(message);
        CropScanError::Api(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApiClient;
    use cropscan_core::api::{
        ApiErrorKind, HttpMethod, MSG_CONFLICT, MSG_NO_RESPONSE, MSG_UNAUTHORIZED,
    };
    use cropscan_core::auth::AuthStatus;
    use cropscan_infrastructure::InMemorySnapshotRepository;
    use serde_json::json;

    struct Fixture {
        api: Arc<FakeApiClient>,
        repo: Arc<InMemorySnapshotRepository<AuthSnapshot>>,
        store: Arc<AuthStore>,
    }

    fn fixture_with(repo: InMemorySnapshotRepository<AuthSnapshot>) -> Fixture {
        let api = Arc::new(FakeApiClient::new());
        let repo = Arc::new(repo);
        let store = Arc::new(AuthStore::new(api.clone(), repo.clone()));
        Fixture { api, repo, store }
    }

    fn fixture() -> Fixture {
        fixture_with(InMemorySnapshotRepository::new())
    }

    #[tokio::test]
    async fn test_initialize_restores_token_without_network() {
        let f = fixture_with(InMemorySnapshotRepository::with_snapshot(AuthSnapshot {
            token: Some("persisted-token".into()),
        }));

        f.store.initialize_auth().await;

        let state = f.store.state().await;
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some("persisted-token"));
        assert_eq!(state.user, None);
        assert_eq!(f.api.bearer_token().as_deref(), Some("persisted-token"));
        assert_eq!(f.api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_noop() {
        let f = fixture();
        f.store.initialize_auth().await;

        assert_eq!(f.store.state().await, Session::default());
        assert_eq!(f.api.bearer_token(), None);
    }

    #[tokio::test]
    async fn test_initialize_ignores_blank_persisted_token() {
        let f = fixture_with(InMemorySnapshotRepository::with_snapshot(AuthSnapshot {
            token: Some("  ".into()),
        }));
        f.store.initialize_auth().await;

        assert!(!f.store.is_authenticated().await);
        assert_eq!(f.api.bearer_token(), None);
    }

    #[tokio::test]
    async fn test_login_success_sets_session_header_and_snapshot() {
        let f = fixture();
        f.api.ok(
            HttpMethod::Post,
            endpoints::SIGN_IN,
            json!({
                "token": "jwt-abc",
                "user": { "id": 7, "username": "admin", "email": "admin@farm.io", "role": "admin" }
            }),
        );

        f.store
            .login(LoginCredentials::new(" admin@farm.io ", "hunter2"))
            .await
            .unwrap();

        let requests = f.api.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body,
            Some(json!({ "email": "admin@farm.io", "password": "hunter2" }))
        );

        let state = f.store.state().await;
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(state.token.as_deref(), Some("jwt-abc"));
        let user = state.user.unwrap();
        assert_eq!(user.id.as_deref(), Some("7"));
        assert_eq!(user.role.as_deref(), Some("admin"));

        assert_eq!(f.api.bearer_token().as_deref(), Some("jwt-abc"));
        assert_eq!(
            f.repo.stored().await.and_then(|s| s.token).as_deref(),
            Some("jwt-abc")
        );
    }

    #[tokio::test]
    async fn test_login_without_user_synthesizes_one() {
        let f = fixture();
        f.api
            .ok(HttpMethod::Post, endpoints::SIGN_IN, json!({ "token": "t" }));

        f.store
            .login(LoginCredentials::new("grower", "pw"))
            .await
            .unwrap();

        assert_eq!(
            f.store.current_user().await,
            Some(User::synthesized("grower", None))
        );
    }

    #[tokio::test]
    async fn test_login_without_token_is_rejected() {
        let f = fixture();
        f.api.ok(
            HttpMethod::Post,
            endpoints::SIGN_IN,
            json!({ "user": { "username": "grower" }, "token": " " }),
        );

        let err = f
            .store
            .login(LoginCredentials::new("grower", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(&err, CropScanError::Api(e) if e.kind == ApiErrorKind::Decode));

        let state = f.store.state().await;
        assert_eq!(state.status(), AuthStatus::Anonymous);
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
        assert_eq!(state.error.as_deref(), Some(LOGIN_FAILED));
        assert_eq!(f.api.bearer_token(), None);
        assert!(f.repo.stored().await.is_none());
    }

    #[tokio::test]
    async fn test_tokenless_relogin_drops_previous_session() {
        let f = fixture();
        f.api
            .ok(HttpMethod::Post, endpoints::SIGN_IN, json!({ "token": "old" }))
            .ok(
                HttpMethod::Post,
                endpoints::SIGN_IN,
                json!({ "user": { "username": "other" } }),
            );

        f.store
            .login(LoginCredentials::new("grower", "pw"))
            .await
            .unwrap();
        assert!(
            f.store
                .login(LoginCredentials::new("other", "pw"))
                .await
                .is_err()
        );

        let state = f.store.state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.token, None);
        assert_eq!(f.api.bearer_token(), None);
        assert!(f.repo.stored().await.is_none());
    }

    #[tokio::test]
    async fn test_login_unauthorized_records_error_and_reraises() {
        let f = fixture();
        f.api
            .status(HttpMethod::Post, endpoints::SIGN_IN, 401, json!({}));

        let err = f
            .store
            .login(LoginCredentials::new("grower", "wrong"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());

        let state = f.store.state().await;
        assert_eq!(state.status(), AuthStatus::Anonymous);
        assert_eq!(state.error.as_deref(), Some(MSG_UNAUTHORIZED));
        assert_eq!(state.token, None);
        assert!(f.repo.stored().await.is_none());
    }

    #[tokio::test]
    async fn test_login_backend_message_wins() {
        let f = fixture();
        f.api.status(
            HttpMethod::Post,
            endpoints::SIGN_IN,
            401,
            json!({ "message": "Invalid email or password" }),
        );

        assert!(
            f.store
                .login(LoginCredentials::new("grower", "wrong"))
                .await
                .is_err()
        );
        assert_eq!(
            f.store.state().await.error.as_deref(),
            Some("Invalid email or password")
        );
    }

    #[tokio::test]
    async fn test_signup_conflict_uses_generic_text() {
        let f = fixture();
        f.api
            .status(HttpMethod::Post, endpoints::SIGN_UP, 409, json!({}));

        let result = f
            .store
            .signup(SignupCredentials::new("Ana", "ana@farm.io", "pw"))
            .await;
        assert!(result.is_err());
        assert_eq!(f.store.state().await.error.as_deref(), Some(MSG_CONFLICT));
    }

    #[tokio::test]
    async fn test_signup_success_falls_back_to_submitted_identity() {
        let f = fixture();
        f.api
            .ok(HttpMethod::Post, endpoints::SIGN_UP, json!({ "token": "new" }));

        f.store
            .signup(SignupCredentials::new(" Ana ", " ana@farm.io ", "pw"))
            .await
            .unwrap();

        assert_eq!(
            f.api.requests()[0].body,
            Some(json!({ "name": "Ana", "email": "ana@farm.io", "password": "pw" }))
        );
        assert_eq!(
            f.store.current_user().await,
            Some(User::synthesized("Ana", Some("ana@farm.io".into())))
        );
        assert_eq!(f.api.bearer_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_message() {
        let f = fixture();
        f.api.unreachable(HttpMethod::Post, endpoints::SIGN_IN);

        let err = f
            .store
            .login(LoginCredentials::new("grower", "pw"))
            .await
            .unwrap_err();
        assert!(err.is_no_response());
        assert_eq!(f.store.state().await.error.as_deref(), Some(MSG_NO_RESPONSE));

        f.store.clear_error().await;
        assert_eq!(f.store.state().await.error, None);
    }

    #[tokio::test]
    async fn test_login_then_logout_clears_everything() {
        let f = fixture();
        f.api.ok(
            HttpMethod::Post,
            endpoints::SIGN_IN,
            json!({ "token": "tok", "user": { "username": "admin" } }),
        );
        f.store
            .login(LoginCredentials::new("admin", "pw"))
            .await
            .unwrap();

        f.store.logout().await;

        let state = f.store.state().await;
        assert!(!state.is_authenticated);
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
        assert_eq!(f.api.bearer_token(), None);
        assert!(f.repo.stored().await.is_none());
    }

    #[tokio::test]
    async fn test_is_loading_while_request_in_flight() {
        let f = fixture();
        let release = f.api.hold(HttpMethod::Post, endpoints::SIGN_IN);
        f.api
            .ok(HttpMethod::Post, endpoints::SIGN_IN, json!({ "token": "t" }));

        let store = f.store.clone();
        let login =
            tokio::spawn(async move { store.login(LoginCredentials::new("a", "b")).await });

        while f.api.request_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(f.store.state().await.status(), AuthStatus::Authenticating);

        release.send(()).unwrap();
        login.await.unwrap().unwrap();
        assert_eq!(f.store.state().await.status(), AuthStatus::Authenticated);
    }
}
