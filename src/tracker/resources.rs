//! Tracker resources
//!
//! Data transfer types for the project endpoints. Every optional field is
//! omitted on serialization, so a record with only `name` set encodes as
//! `{"name": ...}` and leaves the remote copy of every other field untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of work a story represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Feature,
    Bug,
    Chore,
    Release,
}

impl StoryType {
    pub const ALL: [StoryType; 4] = [
        StoryType::Feature,
        StoryType::Bug,
        StoryType::Chore,
        StoryType::Release,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Feature => "feature",
            StoryType::Bug => "bug",
            StoryType::Chore => "chore",
            StoryType::Release => "release",
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown story type: {s}"))
    }
}

/// Workflow state of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryState {
    Accepted,
    Delivered,
    Finished,
    Started,
    Rejected,
    Planned,
    Unstarted,
    Unscheduled,
}

impl StoryState {
    pub const ALL: [StoryState; 8] = [
        StoryState::Accepted,
        StoryState::Delivered,
        StoryState::Finished,
        StoryState::Started,
        StoryState::Rejected,
        StoryState::Planned,
        StoryState::Unstarted,
        StoryState::Unscheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryState::Accepted => "accepted",
            StoryState::Delivered => "delivered",
            StoryState::Finished => "finished",
            StoryState::Started => "started",
            StoryState::Rejected => "rejected",
            StoryState::Planned => "planned",
            StoryState::Unstarted => "unstarted",
            StoryState::Unscheduled => "unscheduled",
        }
    }
}

impl fmt::Display for StoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown story state: {s}"))
    }
}

/// A work item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_type: Option<StoryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<StoryState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_by_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_ids: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl Story {
    /// A story carrying only a name, ready to be created or used as a rename payload
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, story_type: StoryType) -> Self {
        self.story_type = Some(story_type);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A tag applicable to stories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<LabelCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Usage counts of a label, broken down by story state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelCounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<u64>,
    #[serde(default)]
    pub number_of_stories_by_state: CountsByState,
    #[serde(default)]
    pub sum_of_story_estimates_by_state: CountsByState,
    #[serde(default)]
    pub number_of_zero_point_stories_by_state: CountsByState,
}

/// Per-state tallies; estimates may be fractional so every tally is a float
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountsByState {
    pub accepted: f64,
    pub started: f64,
    pub finished: f64,
    pub unstarted: f64,
    pub planned: f64,
    pub delivered: f64,
    pub unscheduled: f64,
    pub rejected: f64,
}

impl CountsByState {
    pub fn total(&self) -> f64 {
        self.accepted
            + self.started
            + self.finished
            + self.unstarted
            + self.planned
            + self.delivered
            + self.unscheduled
            + self.rejected
    }
}

/// Free text attached to a story
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

/// An audit record for a story
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub project_version: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub highlight: String,
    #[serde(default)]
    pub changes: Vec<Value>,
    #[serde(default)]
    pub primary_resources: Vec<Value>,
    #[serde(default)]
    pub project: Value,
    #[serde(default)]
    pub performed_by: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// A person as referenced from a membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub initials: String,
    #[serde(default)]
    pub username: String,
}

/// A person's membership in the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMembership {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub person: Person,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<DateTime<Utc>>,
}

/// How much of a logical result set a single response holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub returned: u64,
}

impl Pagination {
    /// Whether more results exist past this page
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.returned) < self.total
    }
}
