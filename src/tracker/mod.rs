//! Tracker API interaction module
//!
//! Typed access to the project resources of the Tracker REST API.
//!
//! # Module Structure
//!
//! - [`auth`] - API token and default project discovery
//! - [`client`] - Top-level client owning the shared connection
//! - [`connection`] - The transport contract project operations run on
//! - [`http`] - reqwest-backed connection
//! - [`project`] - Operations scoped to one project
//! - [`body`], [`query`], [`resources`] - Payloads, filters and resource types
//!
//! # Example
//!
//! ```no_run
//! use ptracker::tracker::{StoriesQuery, StoryState, TrackerClient};
//!
//! async fn example() -> Result<(), ptracker::tracker::TrackerError> {
//!     let client = TrackerClient::new("api-token")?;
//!     let project = client.in_project(99);
//!     let query = StoriesQuery::new().with_state(StoryState::Finished);
//!     let (stories, _pagination) = project.stories(&query).await?;
//!     for story in stories {
//!         if let Some(id) = story.id {
//!             project.deliver_story(id).await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod body;
pub mod client;
pub mod connection;
pub mod error;
pub mod http;
pub mod project;
pub mod query;
pub mod resources;

#[cfg(test)]
mod fake;

pub use body::RequestBody;
pub use client::TrackerClient;
pub use connection::{Connection, QueryParams, Request, Response};
pub use error::TrackerError;
pub use http::{format_tracker_error, HttpConnection, DEFAULT_BASE_URL};
pub use project::{DeliveryOutcome, ProjectClient};
pub use query::{ActivityQuery, StoriesQuery};
pub use resources::{
    Activity, Comment, CountsByState, Label, LabelCounts, Pagination, Person, ProjectMembership,
    Story, StoryState, StoryType,
};
