//! Recording connection for unit tests

use super::connection::{Connection, QueryParams, Request, Response};
use super::error::{Result, TrackerError};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use url::Url;

/// Replays queued results in order and records every executed request
#[derive(Default)]
pub struct FakeConnection {
    replies: Mutex<VecDeque<Result<Response>>>,
    sent: Mutex<Vec<Request>>,
    reject_requests: bool,
}

impl FakeConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A connection whose `create_request` always fails
    pub fn rejecting_requests() -> Arc<Self> {
        Arc::new(Self {
            reject_requests: true,
            ..Self::default()
        })
    }

    pub fn respond(&self, response: Response) {
        self.replies.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, error: TrackerError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> Request {
        let sent = self.requests();
        assert_eq!(sent.len(), 1, "expected exactly one request, got {}", sent.len());
        sent.into_iter().next().unwrap()
    }
}

#[async_trait]
impl Connection for FakeConnection {
    fn create_request(&self, method: Method, path: &str, params: &QueryParams) -> Result<Request> {
        if self.reject_requests {
            return Err(TrackerError::Request {
                path: path.to_string(),
                reason: "rejected by fake".to_string(),
            });
        }

        let mut url = Url::parse(&format!("http://tracker.test{}", path)).map_err(|e| {
            TrackerError::Request {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(Request::new(method, url))
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        self.sent.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no reply queued for request"))
    }
}
