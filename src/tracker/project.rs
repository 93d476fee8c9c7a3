//! Project-scoped operations
//!
//! [`ProjectClient`] issues every request under `/projects/{id}`. Each
//! operation builds one request, optionally attaches a JSON body, lets the
//! connection execute it and decodes the result. Nothing is cached, retried
//! or logged here; errors come back exactly as the connection reported them.

use super::body::RequestBody;
use super::connection::{Connection, QueryParams, Request, Response};
use super::error::{Result, TrackerError};
use super::query::{ActivityQuery, StoriesQuery};
use super::resources::{
    Activity, Label, Pagination, ProjectMembership, Story, StoryState, StoryType,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Field set requested for label listings
const LABEL_FIELDS: &str = "id,project_id,name,counts";

/// Result of delivering a story and then commenting on it
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// Delivered and commented; the story as returned by the delivery
    Commented(Story),
    /// Delivered, but the comment was rejected. The delivery stands.
    CommentFailed { story: Story, error: TrackerError },
}

/// Client for the resources of a single project
#[derive(Clone)]
pub struct ProjectClient {
    id: u64,
    conn: Arc<dyn Connection>,
}

impl std::fmt::Debug for ProjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectClient").field("id", &self.id).finish()
    }
}

impl ProjectClient {
    pub fn new(id: u64, conn: Arc<dyn Connection>) -> Self {
        Self { id, conn }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// List stories matching `query`, with the page metadata
    pub async fn stories(&self, query: &StoriesQuery) -> Result<(Vec<Story>, Pagination)> {
        let request = self.create_request(Method::GET, "/stories", &query.to_params())?;
        let response = self.conn.execute(request).await?;
        let pagination = response.pagination;
        let stories = decode(response)?;
        Ok((stories, pagination))
    }

    /// List the project's labels with their usage counts
    pub async fn labels(&self) -> Result<Vec<Label>> {
        let params = vec![("fields".to_string(), LABEL_FIELDS.to_string())];
        let request = self.create_request(Method::GET, "/labels", &params)?;
        self.fetch(request).await
    }

    /// Activity feed of one story
    pub async fn story_activity(&self, story_id: u64, query: &ActivityQuery) -> Result<Vec<Activity>> {
        let path = format!("/stories/{}/activity", story_id);
        let request = self.create_request(Method::GET, &path, &query.to_params())?;
        self.fetch(request).await
    }

    pub async fn deliver_story(&self, story_id: u64) -> Result<Story> {
        self.update_story(story_id, RequestBody::StateTransition(StoryState::Delivered))
            .await
    }

    /// Deliver a story and comment on it.
    ///
    /// A failed comment is reported as an error even though the story has
    /// already been delivered; use
    /// [`deliver_story_with_comment_outcome`](Self::deliver_story_with_comment_outcome)
    /// to tell the two failures apart.
    pub async fn deliver_story_with_comment(&self, story_id: u64, comment: &str) -> Result<Story> {
        match self.deliver_story_with_comment_outcome(story_id, comment).await? {
            DeliveryOutcome::Commented(story) => Ok(story),
            DeliveryOutcome::CommentFailed { error, .. } => Err(error),
        }
    }

    /// Deliver a story and comment on it, keeping the delivered story when
    /// only the comment fails. `Err` means the delivery itself failed and no
    /// comment was attempted.
    pub async fn deliver_story_with_comment_outcome(
        &self,
        story_id: u64,
        comment: &str,
    ) -> Result<DeliveryOutcome> {
        let story = self.deliver_story(story_id).await?;

        match self.add_comment(story_id, comment).await {
            Ok(()) => Ok(DeliveryOutcome::Commented(story)),
            Err(error) => Ok(DeliveryOutcome::CommentFailed { story, error }),
        }
    }

    pub async fn create_story(&self, story: &Story) -> Result<Story> {
        let mut request = self.create_request(Method::POST, "/stories", &QueryParams::new())?;
        add_json_body(&mut request, &RequestBody::record(story)?)?;
        self.fetch(request).await
    }

    pub async fn delete_story(&self, story_id: u64) -> Result<()> {
        self.delete(&format!("/stories/{}", story_id)).await
    }

    pub async fn delete_label(&self, label_id: u64) -> Result<()> {
        self.delete(&format!("/labels/{}", label_id)).await
    }

    /// Attach a label by name, creating it in the project if needed
    pub async fn add_story_label(&self, story_id: u64, label: &str) -> Result<Label> {
        let path = format!("/stories/{}/labels", story_id);
        let mut request = self.create_request(Method::POST, &path, &QueryParams::new())?;
        add_json_body(&mut request, &RequestBody::label_name(label))?;
        self.fetch(request).await
    }

    pub async fn remove_story_label(&self, story_id: u64, label_id: u64) -> Result<()> {
        self.delete(&format!("/stories/{}/labels/{}", story_id, label_id))
            .await
    }

    pub async fn set_story_type(&self, story_id: u64, story_type: StoryType) -> Result<Story> {
        self.update_story(story_id, RequestBody::story_type(story_type))
            .await
    }

    /// Rename a story. Only the name is sent; other fields are left as they are.
    pub async fn set_story_name(&self, story_id: u64, name: &str) -> Result<Story> {
        self.update_story(story_id, RequestBody::record(&Story::named(name))?)
            .await
    }

    pub async fn unschedule_story(&self, story_id: u64) -> Result<Story> {
        self.update_story(story_id, RequestBody::StateTransition(StoryState::Unscheduled))
            .await
    }

    pub async fn project_memberships(&self) -> Result<Vec<ProjectMembership>> {
        let request = self.create_request(Method::GET, "/memberships", &QueryParams::new())?;
        self.fetch(request).await
    }

    async fn add_comment(&self, story_id: u64, text: &str) -> Result<()> {
        let path = format!("/stories/{}/comments", story_id);
        let mut request = self.create_request(Method::POST, &path, &QueryParams::new())?;
        add_json_body(&mut request, &RequestBody::comment(text))?;
        self.conn.execute(request).await?;
        Ok(())
    }

    async fn update_story(&self, story_id: u64, body: RequestBody) -> Result<Story> {
        let path = format!("/stories/{}", story_id);
        let mut request = self.create_request(Method::PUT, &path, &QueryParams::new())?;
        add_json_body(&mut request, &body)?;
        self.fetch(request).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let request = self.create_request(Method::DELETE, path, &QueryParams::new())?;
        self.conn.execute(request).await?;
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let response = self.conn.execute(request).await?;
        decode(response)
    }

    fn create_request(&self, method: Method, path: &str, params: &QueryParams) -> Result<Request> {
        self.conn
            .create_request(method, &project_path(self.id, path), params)
    }
}

/// `/projects/{id}` followed by the resource path
pub fn project_path(project_id: u64, path: &str) -> String {
    format!("/projects/{}{}", project_id, path)
}

fn add_json_body(request: &mut Request, body: &RequestBody) -> Result<()> {
    request.set_json_body(body.to_bytes()?);
    Ok(())
}

/// Decode the body into the caller's type; an empty body reads as `null`
fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.body.trim();
    let body = if body.is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(TrackerError::Decode)
}
