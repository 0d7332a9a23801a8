//! Shared fixtures for unit tests: a scripted transport and session builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::net::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::net::types::User;
use crate::state::session::SessionStore;
use crate::storage::{MemoryStorage, Storage, TOKEN_KEY};

pub const API_BASE: &str = "http://backend.test/api";

// =========================================================================
// MockTransport
// =========================================================================

/// Replays scripted responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_owned())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn admin_user() -> User {
    User { id: Some(1), username: "admin".to_owned(), role: "admin".to_owned(), ..User::default() }
}

pub fn plain_user() -> User {
    User { id: Some(2), username: "reader".to_owned(), role: "user".to_owned(), ..User::default() }
}

/// Session over fresh memory storage, optionally pre-seeded with a token.
pub fn session_store(transport: Arc<MockTransport>, token: Option<&str>) -> (Arc<SessionStore>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage.set_item(TOKEN_KEY, token).unwrap();
    }
    let session = Arc::new(SessionStore::new(storage.clone(), transport, API_BASE));
    (session, storage)
}

/// Signed-in session holding `token` and `user`.
pub fn signed_in(transport: Arc<MockTransport>, token: &str, user: User) -> (Arc<SessionStore>, Arc<MemoryStorage>) {
    let (session, storage) = session_store(transport, None);
    session.set_token(token);
    session.set_user(Some(user));
    (session, storage)
}
