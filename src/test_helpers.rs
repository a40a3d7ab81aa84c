//! Scripted [`Transport`] for session and interceptor tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(u16, Value),
    Fail(String),
}

/// Replays queued responses per path and records every call.
///
/// Unscripted paths answer 404. A path's last scripted entry is sticky so a
/// test can script "always 200" with a single push.
#[derive(Default)]
pub struct ScriptedTransport {
    queues: Mutex<HashMap<String, VecDeque<Scripted>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, status: u16, body: Value) -> &Self {
        self.push(path, Scripted::Respond(status, body))
    }

    pub fn fail(&self, path: &str, message: &str) -> &Self {
        self.push(path, Scripted::Fail(message.to_owned()))
    }

    pub fn delay(&self, path: &str, delay: Duration) -> &Self {
        self.delays.lock().unwrap().insert(path.to_owned(), delay);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|r| r.path == path).count()
    }

    fn push(&self, path: &str, entry: Scripted) -> &Self {
        self.queues.lock().unwrap().entry(path.to_owned()).or_default().push_back(entry);
        self
    }

    fn next_for(&self, path: &str) -> Option<Scripted> {
        let mut queues = self.queues.lock().unwrap();
        let queue = queues.get_mut(path)?;
        if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let path = request.path.clone();
        self.calls.lock().unwrap().push(request.clone());

        let delay = self.delays.lock().unwrap().get(&path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_for(&path) {
            Some(Scripted::Respond(status, body)) => Ok(ApiResponse::new(status, body.to_string())),
            Some(Scripted::Fail(message)) => Err(ApiError::Transport(message)),
            None => Ok(ApiResponse::new(404, r#"{"message":"not found"}"#)),
        }
    }
}
