//! Test doubles shared by the adapter tests

use crate::http::{HttpClient, HttpRequest, ResponseStream};
use aigen_core::Error;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Mutex;

/// Records requests and replays canned responses
#[derive(Default)]
pub(crate) struct StubClient {
    pub requests: Mutex<Vec<HttpRequest>>,
    pub response: Option<Value>,
    pub frames: Vec<&'static str>,
    pub fail_with: Option<fn() -> Error>,
}

impl StubClient {
    pub fn replying(response: Value) -> Self {
        Self {
            response: Some(response),
            ..Default::default()
        }
    }

    pub fn streaming(frames: Vec<&'static str>) -> Self {
        Self {
            frames,
            ..Default::default()
        }
    }

    pub fn failing(fail: fn() -> Error) -> Self {
        Self {
            fail_with: Some(fail),
            ..Default::default()
        }
    }

    pub fn last(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request recorded")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for StubClient {
    async fn post(&self, request: HttpRequest) -> Result<Value, Error> {
        self.requests.lock().unwrap().push(request);
        match self.fail_with {
            Some(fail) => Err(fail()),
            None => Ok(self.response.clone().unwrap_or(Value::Null)),
        }
    }

    async fn post_stream(&self, request: HttpRequest) -> Result<ResponseStream, Error> {
        self.requests.lock().unwrap().push(request);
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }
        let frames: Vec<Result<Bytes, Error>> = self
            .frames
            .iter()
            .map(|f| Ok(Bytes::from_static(f.as_bytes())))
            .collect();
        Ok(Box::pin(futures::stream::iter(frames)))
    }
}
