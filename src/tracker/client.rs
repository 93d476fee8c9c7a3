//! Tracker Client
//!
//! Entry point holding the shared connection. Project clients handed out by
//! [`TrackerClient::in_project`] all reuse the same connection.

use super::connection::Connection;
use super::error::Result;
use super::http::HttpConnection;
use super::project::ProjectClient;
use std::sync::Arc;

/// Main Tracker client
#[derive(Clone)]
pub struct TrackerClient {
    conn: Arc<dyn Connection>,
}

impl TrackerClient {
    /// Create a client for the public API
    pub fn new(token: &str) -> Result<Self> {
        Ok(Self::with_connection(Arc::new(HttpConnection::new(token)?)))
    }

    /// Create a client for another API root
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        Ok(Self::with_connection(Arc::new(HttpConnection::with_base_url(
            token, base_url,
        )?)))
    }

    pub fn with_connection(conn: Arc<dyn Connection>) -> Self {
        Self { conn }
    }

    /// Scope further calls to one project
    pub fn in_project(&self, project_id: u64) -> ProjectClient {
        ProjectClient::new(project_id, Arc::clone(&self.conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::connection::Response;
    use crate::tracker::fake::FakeConnection;

    #[tokio::test]
    async fn test_project_clients_share_connection() {
        let conn = FakeConnection::new();
        conn.respond(Response::default());
        conn.respond(Response::default());

        let client = TrackerClient::with_connection(conn.clone());
        client.in_project(1).delete_label(10).await.unwrap();
        client.in_project(2).delete_label(20).await.unwrap();

        let paths: Vec<String> = conn
            .requests()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/projects/1/labels/10", "/projects/2/labels/20"]);
    }

    #[test]
    fn test_in_project_keeps_id() {
        let client = TrackerClient::with_connection(FakeConnection::new());
        assert_eq!(client.in_project(1234).id(), 1234);
    }
}
