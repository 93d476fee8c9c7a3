//! Tracker credentials
//!
//! Discovers the API token, default project and API root from the
//! environment. Values persisted in the config file are consulted by
//! [`crate::config::Config`] before falling back to these.

use std::path::PathBuf;

pub const TOKEN_ENV: &str = "TRACKER_API_TOKEN";
pub const PROJECT_ENV: &str = "TRACKER_PROJECT_ID";
pub const BASE_URL_ENV: &str = "TRACKER_BASE_URL";

const MAX_TOKEN_LENGTH: usize = 128;

/// Get the ptracker configuration directory
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ptracker"))
}

/// Validate an API token
/// Tokens are sent as a header value, so only printable ASCII is accepted
pub fn validate_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LENGTH
        && token.chars().all(|c| c.is_ascii_graphic())
}

/// Parse a project ID; Tracker project IDs are positive integers
pub fn parse_project_id(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

/// Read the API token from the environment
/// Security: Validates token format before returning
pub fn get_default_token() -> Option<String> {
    let token = std::env::var(TOKEN_ENV).ok()?;
    let token = token.trim().to_string();
    if validate_token(&token) {
        return Some(token);
    }
    tracing::warn!("Invalid API token format in {}", TOKEN_ENV);
    None
}

/// Read the default project from the environment
pub fn get_default_project() -> Option<u64> {
    let value = std::env::var(PROJECT_ENV).ok()?;
    let project = parse_project_id(&value);
    if project.is_none() {
        tracing::warn!("Invalid project ID in {}", PROJECT_ENV);
    }
    project
}

/// Read an alternate API root from the environment
pub fn get_default_base_url() -> Option<String> {
    std::env::var(BASE_URL_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token() {
        assert!(validate_token("0123456789abcdef0123456789abcdef"));
        assert!(!validate_token(""));
        assert!(!validate_token("has space"));
        assert!(!validate_token("line\nbreak"));
        assert!(!validate_token(&"a".repeat(MAX_TOKEN_LENGTH + 1)));
    }

    #[test]
    fn test_parse_project_id() {
        assert_eq!(parse_project_id(" 1027488 "), Some(1027488));
        assert_eq!(parse_project_id("0"), None);
        assert_eq!(parse_project_id("-5"), None);
        assert_eq!(parse_project_id("death-star"), None);
    }
}
