//! Scripted `ApiClient` for store tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cropscan_core::api::{ApiClient, ApiError, HttpMethod, classify_response};
use cropscan_core::error::Result as StoreResult;
use cropscan_core::snapshot::{Snapshot, SnapshotRepository};
use cropscan_infrastructure::InMemorySnapshotRepository;
use serde_json::Value;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    /// Bearer token attached when the request was sent.
    pub token: Option<String>,
}

type Key = (HttpMethod, String);

/// Replays queued responses per `(method, path)` and logs every request.
///
/// A request with nothing queued fails as if the backend were unreachable.
#[derive(Default)]
pub struct FakeApiClient {
    responses: Mutex<HashMap<Key, VecDeque<Result<Value, ApiError>>>>,
    gates: Mutex<HashMap<Key, oneshot::Receiver<()>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    token: Mutex<Option<String>>,
}

impl FakeApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&self, method: HttpMethod, path: &str, body: Value) -> &Self {
        self.push(method, path, Ok(body))
    }

    /// Queues a non-2xx response, classified the way the HTTP adapter does.
    pub fn status(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        let body = (!body.is_null()).then_some(body);
        self.push(method, path, Err(classify_response(status, body.as_ref())))
    }

    pub fn unreachable(&self, method: HttpMethod, path: &str) -> &Self {
        self.push(method, path, Err(ApiError::no_response("connection refused")))
    }

    /// Holds the next request to `path` until the returned sender fires.
    pub fn hold(&self, method: HttpMethod, path: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert((method, path.to_string()), rx);
        tx
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, method: HttpMethod, path: &str, response: Result<Value, ApiError>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }
}

#[async_trait]
impl ApiClient for FakeApiClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let key = (method, path.to_string());
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
            token: self.bearer_token(),
        });

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(ApiError::no_response(format!(
                    "nothing scripted for {method} {path}"
                )))
            })
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

/// Snapshot repository whose first save is delayed.
///
/// Lets a test overlap two writes so that the earlier one lands last unless
/// the store orders them.
pub struct SlowFirstSave<S: Snapshot> {
    inner: InMemorySnapshotRepository<S>,
    delay: Duration,
    saves: AtomicUsize,
}

impl<S: Snapshot> SlowFirstSave<S> {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemorySnapshotRepository::new(),
            delay,
            saves: AtomicUsize::new(0),
        }
    }

    pub async fn stored(&self) -> Option<S> {
        self.inner.stored().await
    }
}

#[async_trait]
impl<S: Snapshot> SnapshotRepository<S> for SlowFirstSave<S> {
    async fn load(&self) -> StoreResult<Option<S>> {
        self.inner.load().await
    }

    async fn save(&self, snapshot: S) -> StoreResult<()> {
        if self.saves.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.save(snapshot).await
    }

    async fn clear(&self) -> StoreResult<()> {
        self.inner.clear().await
    }
}
