//! Request DTOs for the node's HTTP API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string for the front-end lookup (GET /api/get)
///
/// # Fields
/// - `group`: Name of the group to read from
/// - `key`: The cache key
#[derive(Debug, Clone, Deserialize)]
pub struct ApiGetQuery {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub key: String,
}

impl ApiGetQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.group.is_empty() {
            return Some("Group cannot be empty".to_string());
        }
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_deserialize() {
        let json = r#"{"group": "scores", "key": "Tom"}"#;
        let query: ApiGetQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.group, "scores");
        assert_eq!(query.key, "Tom");
        assert!(query.validate().is_none());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let query: ApiGetQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.validate(), Some("Group cannot be empty".to_string()));
    }

    #[test]
    fn test_validate_empty_key() {
        let query = ApiGetQuery {
            group: "scores".to_string(),
            key: "".to_string(),
        };
        assert_eq!(query.validate(), Some("Key cannot be empty".to_string()));
    }
}
