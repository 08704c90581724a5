// src/feed/upstream.rs
use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

pub const NEWS_PATH: &str = "/breaking-news/live";
pub const PINNED_PATH: &str = "/breaking-news-plural";
pub const SPONSORED_PATH: &str = "/sponsored-posts";

/// A read request against the content API: path plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    pub fn news() -> Self {
        Self {
            path: NEWS_PATH,
            query: Vec::new(),
        }
    }

    pub fn pinned() -> Self {
        Self {
            path: PINNED_PATH,
            query: vec![
                ("filters[isPinned][$eq]", "true".to_string()),
                ("sort", "PublishedTimestamp:desc".to_string()),
            ],
        }
    }

    pub fn sponsored() -> Self {
        Self {
            path: SPONSORED_PATH,
            query: vec![("filters[IsActive][$eq]", "true".to_string())],
        }
    }
}

/// Source of raw CMS records. Implementations return the `data` array of
/// the response (see [`records_from_body`]).
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn fetch_records(&self, req: &UpstreamRequest) -> Result<Vec<Value>, FetchError>;

    /// Base URL prepended to relative media paths.
    fn media_base(&self) -> &str {
        ""
    }

    fn name(&self) -> &'static str;
}

/// Extract records from a `{data: [...]}` body. A missing `data` field is an
/// empty list; a non-object body or a non-array `data` is malformed.
pub fn records_from_body(path: &str, body: Value) -> Result<Vec<Value>, FetchError> {
    let mut obj = match body {
        Value::Object(map) => map,
        other => {
            return Err(FetchError::Malformed {
                path: path.to_string(),
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            })
        }
    };

    match obj.remove("data") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(FetchError::Malformed {
            path: path.to_string(),
            message: format!("`data` must be an array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_array_is_extracted() {
        let out = records_from_body("/x", json!({ "data": [{ "id": 1 }, { "id": 2 }] })).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(records_from_body("/x", json!({ "meta": {} })).unwrap().is_empty());
        assert!(records_from_body("/x", json!({ "data": null })).unwrap().is_empty());
    }

    #[test]
    fn non_array_data_is_malformed() {
        let err = records_from_body("/x", json!({ "data": { "id": 1 } })).unwrap_err();
        assert_eq!(err.kind(), "malformed");
        let err = records_from_body("/x", json!([1, 2])).unwrap_err();
        assert!(!err.is_unavailable());
    }

    #[test]
    fn pinned_request_carries_filter_and_sort() {
        let r = UpstreamRequest::pinned();
        assert_eq!(r.path, "/breaking-news-plural");
        assert!(r
            .query
            .contains(&("filters[isPinned][$eq]", "true".to_string())));
        assert!(r.query.contains(&("sort", "PublishedTimestamp:desc".to_string())));
    }
}
