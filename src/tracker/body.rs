//! Request payloads
//!
//! The closed set of bodies project operations send. Every variant is built
//! with serde, never by string formatting.

use super::error::{Result, TrackerError};
use super::resources::{StoryState, StoryType};
use serde::Serialize;
use serde_json::{Map, Value};

/// A JSON request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Move a story to another workflow state: `{"current_state": ...}`
    StateTransition(StoryState),
    /// A single named field: `{"<field>": "<value>"}`
    SingleField { field: &'static str, value: String },
    /// A whole serialized record
    Record(Value),
}

impl RequestBody {
    pub fn story_type(story_type: StoryType) -> Self {
        RequestBody::SingleField {
            field: "story_type",
            value: story_type.as_str().to_string(),
        }
    }

    pub fn label_name(name: impl Into<String>) -> Self {
        RequestBody::SingleField {
            field: "name",
            value: name.into(),
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        RequestBody::SingleField {
            field: "text",
            value: text.into(),
        }
    }

    /// Encode any serializable record, e.g. a [`Story`](super::resources::Story)
    pub fn record<T: Serialize>(record: &T) -> Result<Self> {
        serde_json::to_value(record)
            .map(RequestBody::Record)
            .map_err(TrackerError::Encode)
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestBody::StateTransition(state) => {
                single("current_state", Value::String(state.as_str().to_string()))
            }
            RequestBody::SingleField { field, value } => single(field, Value::String(value.clone())),
            RequestBody::Record(value) => value.clone(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.to_value()).map_err(TrackerError::Encode)
    }
}

fn single(field: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(field.to_string(), value);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::resources::Story;

    fn text(body: &RequestBody) -> String {
        String::from_utf8(body.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_state_transitions_are_exact() {
        assert_eq!(
            text(&RequestBody::StateTransition(StoryState::Delivered)),
            r#"{"current_state":"delivered"}"#
        );
        assert_eq!(
            text(&RequestBody::StateTransition(StoryState::Unscheduled)),
            r#"{"current_state":"unscheduled"}"#
        );
    }

    #[test]
    fn test_single_fields_are_exact() {
        assert_eq!(text(&RequestBody::story_type(StoryType::Feature)), r#"{"story_type":"feature"}"#);
        assert_eq!(text(&RequestBody::label_name("blocked")), r#"{"name":"blocked"}"#);
        assert_eq!(text(&RequestBody::comment("done")), r#"{"text":"done"}"#);
    }

    #[test]
    fn test_single_field_escapes_value() {
        let body = RequestBody::comment("say \"hi\"\nnow");
        let parsed: Value = serde_json::from_slice(&body.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed["text"], "say \"hi\"\nnow");
    }

    #[test]
    fn test_record_round_trips_story() {
        let story = Story::named("X").with_type(StoryType::Chore);
        let body = RequestBody::record(&story).unwrap();
        let decoded: Story = serde_json::from_slice(&body.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, story);
    }
}
