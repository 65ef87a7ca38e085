// In-memory Fetcher for tests: canned replies per endpoint, records calls.

use std::{collections::HashMap, sync::Mutex};

use reqwest::StatusCode;
use serde_json::Value;

use super::{Fetcher, TmdbError};

enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    /// Value of a sent (non-empty) query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct StubFetcher {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, endpoint: &str, body: Value) -> Self {
        self.replies.insert(endpoint.to_string(), Reply::Json(body));
        self
    }

    pub fn with_status(mut self, endpoint: &str, status: u16) -> Self {
        self.replies.insert(endpoint.to_string(), Reply::Status(status));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, TmdbError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        match self.replies.get(endpoint) {
            Some(Reply::Json(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(TmdbError::from_status(
                StatusCode::from_u16(*status).unwrap(),
            )),
            None => Err(TmdbError::NotFound { status: 404 }),
        }
    }
}
