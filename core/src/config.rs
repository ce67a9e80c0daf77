//! Static settings for the client and the functional suites.
//!
//! Values come from the environment once, at construction, and fall back to
//! defaults when a variable is absent or empty. Nothing here can fail.

use std::time::Duration;

use serde_json::{json, Value};

pub const BASE_URL_VAR: &str = "API_BASE_URL";
pub const API_TOKEN_VAR: &str = "API_TOKEN";

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers sent with every request unless the caller overrides them.
pub fn default_headers() -> Vec<(String, String)> {
    vec![
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ]
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    /// Read from `API_TOKEN`. Not attached to any request.
    pub api_token: Option<String>,
    pub default_headers: Vec<(String, String)>,
    pub default_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            base_url: non_empty(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_token: non_empty(API_TOKEN_VAR),
            default_headers: default_headers(),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Payload for user-creation scenarios. Each call returns a fresh value.
pub fn test_user_data() -> Value {
    json!({
        "name": "John Doe",
        "username": "johndoe",
        "email": "john.doe@example.com"
    })
}

/// Payload for post-creation scenarios.
pub fn test_post_data() -> Value {
    json!({
        "title": "Test Post",
        "body": "This is a test post body",
        "userId": 1
    })
}

/// Payload for comment-creation scenarios.
pub fn test_comment_data() -> Value {
    json!({
        "postId": 1,
        "name": "Test Comment",
        "email": "commenter@example.com",
        "body": "This is a test comment body"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.api_token.is_none());
        assert_eq!(settings.default_timeout, Duration::from_secs(30));
        assert_eq!(settings.default_headers, default_headers());
    }

    #[test]
    fn environment_overrides_base_url_and_token() {
        let settings = Settings::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:3000"),
            (API_TOKEN_VAR, "secret"),
        ]));
        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn empty_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[(BASE_URL_VAR, ""), (API_TOKEN_VAR, "  ")]));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.api_token.is_none());
    }

    #[test]
    fn default_headers_are_json() {
        let headers = default_headers();
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(headers.contains(&("Accept".to_string(), "application/json".to_string())));
    }

    #[test]
    fn sample_payloads_are_fresh_copies() {
        let mut first = test_post_data();
        first["title"] = json!("mutated");
        assert_eq!(test_post_data()["title"], "Test Post");
        assert_eq!(test_user_data()["username"], "johndoe");
        assert_eq!(test_comment_data()["postId"], 1);
    }
}
