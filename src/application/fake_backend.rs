// In-memory backend double for service and handler tests
use super::backend::{Endpoint, PredictionBackend, RelayBody, RelayError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBackend {
    replies: Mutex<HashMap<Endpoint, Result<Value, u16>>>,
    calls: Mutex<Vec<(Endpoint, RelayBody)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, endpoint: Endpoint, reply: Value) -> Self {
        self.replies.lock().unwrap().insert(endpoint, Ok(reply));
        self
    }

    pub fn with_status(self, endpoint: Endpoint, status: u16) -> Self {
        self.replies.lock().unwrap().insert(endpoint, Err(status));
        self
    }

    pub fn calls(&self) -> Vec<(Endpoint, RelayBody)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .count()
    }
}

#[async_trait]
impl PredictionBackend for FakeBackend {
    async fn forward(&self, endpoint: Endpoint, body: RelayBody) -> Result<Value, RelayError> {
        self.calls.lock().unwrap().push((endpoint, body));
        match self.replies.lock().unwrap().get(&endpoint) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(status)) => Err(RelayError::Status(*status)),
            None => Err(RelayError::Status(503)),
        }
    }
}
