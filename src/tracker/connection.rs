//! Connection contract
//!
//! A [`Connection`] owns transport, authentication and status handling.
//! Project operations compose paths and payloads, hand them over here and
//! decode the returned body only when they expect a result. Any
//! implementation (the HTTP one, or a recording fake in tests) can be injected.

use super::error::Result;
use super::resources::Pagination;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Ordered query parameters for a request
pub type QueryParams = Vec<(String, String)>;

/// A fully addressed request, not yet sent
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Mark the request as JSON and replace its body
    pub fn set_json_body(&mut self, body: Vec<u8>) {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(body);
    }

    /// Body parsed back as JSON, if any
    #[cfg(test)]
    pub(crate) fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
    }
}

/// A completed round trip: raw body plus pagination metadata
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Response text as received; empty when the response carried no body
    pub body: String,
    /// Zero-valued when the endpoint does not paginate
    pub pagination: Pagination,
}

impl Response {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            pagination: Pagination::default(),
        }
    }

    /// A response carrying `value` serialized as its body
    pub fn json(value: &Value) -> Self {
        Self::new(value.to_string())
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Transport collaborator shared by every client scoped to the same account
#[async_trait]
pub trait Connection: Send + Sync {
    /// Build an authenticated request for `path` with `params` as its query
    fn create_request(&self, method: Method, path: &str, params: &QueryParams) -> Result<Request>;

    /// Send the request; non-success statuses are errors, the body is left unparsed
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_json_body_sets_content_type() {
        let url = Url::parse("http://tracker.test/projects/1/stories/2").unwrap();
        let mut request = Request::new(Method::PUT, url);
        request.set_json_body(br#"{"current_state":"delivered"}"#.to_vec());

        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(
            request.json_body(),
            Some(serde_json::json!({"current_state": "delivered"}))
        );
    }

    #[test]
    fn test_set_json_body_replaces_previous_body() {
        let url = Url::parse("http://tracker.test/projects/1/stories").unwrap();
        let mut request = Request::new(Method::POST, url);
        request.set_json_body(b"{}".to_vec());
        request.set_json_body(br#"{"name":"X"}"#.to_vec());

        assert_eq!(request.body.as_deref(), Some(&br#"{"name":"X"}"#[..]));
        assert_eq!(request.headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }
}
