//! Request types for the commerce search endpoint.

use serde::Serialize;

/// The upstream's safe default query, substituted when the caller submits a
/// blank search. Matches the behaviour the storefront itself relies on.
pub const DEFAULT_QUERY: &str = "dress";

/// Body of a search query POST, mirroring the upstream API contract.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub format: String,
    pub search_text: String,
    pub filters: serde_json::Value,
    pub user: SearchUser,
    pub template: String,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchUser {
    pub uid: String,
    pub sid: String,
}

impl SearchRequest {
    /// Builds a search request for `query`, substituting [`DEFAULT_QUERY`]
    /// when the query is blank.
    #[must_use]
    pub fn new(query: &str, page_size: u32) -> Self {
        let trimmed = query.trim();
        let search_text = if trimmed.is_empty() {
            DEFAULT_QUERY.to_string()
        } else {
            trimmed.to_string()
        };

        Self {
            format: "json".to_string(),
            search_text,
            filters: serde_json::json!({}),
            user: SearchUser {
                uid: "product-search".to_string(),
                sid: "live-preview".to_string(),
            },
            template: "search".to_string(),
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_substitutes_default() {
        let request = SearchRequest::new("   ", 20);
        assert_eq!(request.search_text, DEFAULT_QUERY);
    }

    #[test]
    fn query_is_trimmed() {
        let request = SearchRequest::new("  red dress  ", 20);
        assert_eq!(request.search_text, "red dress");
    }

    #[test]
    fn serializes_upstream_contract_fields() {
        let request = SearchRequest::new("tote", 20);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["format"], "json");
        assert_eq!(json["search_text"], "tote");
        assert_eq!(json["template"], "search");
        assert_eq!(json["page_size"], 20);
        assert_eq!(json["user"]["uid"], "product-search");
        assert_eq!(json["user"]["sid"], "live-preview");
        assert!(json["filters"].as_object().is_some_and(serde_json::Map::is_empty));
    }
}
