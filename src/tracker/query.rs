//! Listing filters
//!
//! Builders for the query strings of the story and activity listings.

use super::connection::QueryParams;
use super::resources::StoryState;

/// Filters for the story listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoriesQuery {
    pub state: Option<StoryState>,
    pub label: Option<String>,
    /// Search terms, joined with spaces into a single `filter` parameter
    pub filter: Vec<String>,
    pub limit: u32,
    pub offset: u32,
}

impl StoriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: StoryState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_filter(mut self, term: impl Into<String>) -> Self {
        self.filter.push(term.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(state) = self.state {
            params.push(("with_state".to_string(), state.as_str().to_string()));
        }
        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            params.push(("with_label".to_string(), label.to_string()));
        }
        if !self.filter.is_empty() {
            params.push(("filter".to_string(), self.filter.join(" ")));
        }
        push_nonzero(&mut params, "limit", u64::from(self.limit));
        push_nonzero(&mut params, "offset", u64::from(self.offset));
        params
    }
}

/// Filters for a story's activity feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityQuery {
    pub limit: u32,
    pub offset: u32,
    /// Unix milliseconds
    pub occurred_before: u64,
    /// Unix milliseconds
    pub occurred_after: u64,
    pub since_version: u64,
}

impl ActivityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn occurred_before(mut self, millis: u64) -> Self {
        self.occurred_before = millis;
        self
    }

    pub fn occurred_after(mut self, millis: u64) -> Self {
        self.occurred_after = millis;
        self
    }

    pub fn since_version(mut self, version: u64) -> Self {
        self.since_version = version;
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        push_nonzero(&mut params, "limit", u64::from(self.limit));
        push_nonzero(&mut params, "offset", u64::from(self.offset));
        push_nonzero(&mut params, "occurred_before", self.occurred_before);
        push_nonzero(&mut params, "occurred_after", self.occurred_after);
        push_nonzero(&mut params, "since_version", self.since_version);
        params
    }
}

fn push_nonzero(params: &mut QueryParams, key: &str, value: u64) {
    if value != 0 {
        params.push((key.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &QueryParams) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_empty_stories_query_has_no_params() {
        assert!(StoriesQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_stories_query_params() {
        let query = StoriesQuery::new()
            .with_state(StoryState::Started)
            .with_label("blocked")
            .with_filter("owner:JD")
            .with_filter("type:bug")
            .with_limit(20)
            .with_offset(40);

        assert_eq!(
            pairs(&query.to_params()),
            vec![
                ("with_state", "started"),
                ("with_label", "blocked"),
                ("filter", "owner:JD type:bug"),
                ("limit", "20"),
                ("offset", "40"),
            ]
        );
    }

    #[test]
    fn test_activity_query_params() {
        let query = ActivityQuery::new()
            .with_limit(5)
            .occurred_after(1_700_000_000_000)
            .since_version(12);

        assert_eq!(
            pairs(&query.to_params()),
            vec![
                ("limit", "5"),
                ("occurred_after", "1700000000000"),
                ("since_version", "12"),
            ]
        );
    }
}
