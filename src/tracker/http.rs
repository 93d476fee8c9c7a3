//! HTTP connection for the Tracker REST API

use super::connection::{Connection, QueryParams, Request, Response};
use super::error::{Result, TrackerError};
use super::resources::Pagination;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Deserialize;
use url::Url;

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://www.pivotaltracker.com/services/v5";

const TOKEN_HEADER: &str = "x-trackertoken";
const PAGINATION_TOTAL: &str = "x-tracker-pagination-total";
const PAGINATION_LIMIT: &str = "x-tracker-pagination-limit";
const PAGINATION_OFFSET: &str = "x-tracker-pagination-offset";
const PAGINATION_RETURNED: &str = "x-tracker-pagination-returned";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Error document returned with non-success statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    error: Option<String>,
    general_problem: Option<String>,
}

/// Connection to the Tracker API authenticated with an API token
#[derive(Clone)]
pub struct HttpConnection {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpConnection {
    /// Create a connection against the public API
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a connection against another API root (proxies, test servers)
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        Url::parse(base_url).map_err(|e| TrackerError::Request {
            path: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .user_agent(concat!("ptracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Connection for HttpConnection {
    fn create_request(&self, method: Method, path: &str, params: &QueryParams) -> Result<Request> {
        let request_error = |reason: String| TrackerError::Request {
            path: path.to_string(),
            reason,
        };

        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| request_error(e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }

        let mut request = Request::new(method, url);
        let token = HeaderValue::from_str(&self.token)
            .map_err(|_| request_error("API token is not a valid header value".to_string()))?;
        request.headers.insert(TOKEN_HEADER, token);

        Ok(request)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        tracing::debug!("{} {}", request.method, request.url.path());

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        let pagination = parse_pagination(response.headers());
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let detail = serde_json::from_str::<ApiErrorBody>(&body).ok();
            return Err(TrackerError::Api {
                status,
                code: detail.as_ref().and_then(|d| d.code.clone()),
                message: detail.and_then(|d| d.general_problem.or(d.error)),
            });
        }

        Ok(Response::new(body).with_pagination(pagination))
    }
}

/// Read pagination headers; missing or malformed values stay zero
pub fn parse_pagination(headers: &HeaderMap) -> Pagination {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };

    Pagination {
        total: read(PAGINATION_TOTAL),
        limit: read(PAGINATION_LIMIT),
        offset: read(PAGINATION_OFFSET),
        returned: read(PAGINATION_RETURNED),
    }
}

/// Format a Tracker API error for display
/// Security: Sanitizes error messages to avoid leaking API details
pub fn format_tracker_error(error: &TrackerError) -> String {
    if let Some(status) = error.status() {
        match status.as_u16() {
            401 => return "Authentication failed. Check your API token (TRACKER_API_TOKEN).".to_string(),
            403 => return "Permission denied. You may not be a member of this project.".to_string(),
            404 => return "Resource not found.".to_string(),
            429 => return "Rate limit exceeded. Please try again later.".to_string(),
            400 | 422 => {
                if let TrackerError::Api { message: Some(message), .. } = error {
                    return format!("Invalid request: {}", truncate(message));
                }
                return "Invalid request. Check your parameters.".to_string();
            }
            500..=599 => return "Tracker service temporarily unavailable. Please try again.".to_string(),
            _ => {}
        }
    }

    match error {
        TrackerError::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        TrackerError::Decode(_) => "Unexpected response from Tracker.".to_string(),
        other => truncate(&other.to_string()),
    }
}

/// Truncate long messages and drop control characters
fn truncate(message: &str) -> String {
    let sanitized = message
        .chars()
        .filter(|c| !c.is_control())
        .take(80)
        .collect::<String>();

    if sanitized.chars().count() < message.chars().count() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
