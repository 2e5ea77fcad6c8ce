//! Parsed API responses.

use serde_json::Value;
use std::fmt;

/// Body of a successful response: structured when the server declared JSON,
/// raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
}

impl ApiResponse {
    pub fn is_json(&self) -> bool {
        matches!(self, ApiResponse::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(v) => Some(v),
            ApiResponse::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(v) => Some(v),
            ApiResponse::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiResponse::Json(_) => None,
            ApiResponse::Text(s) => Some(s),
        }
    }

    /// Looks up a value by JSON pointer, e.g. `/query/general/sitename`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.as_json().and_then(|v| v.pointer(pointer))
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiResponse::Json(v) => match serde_json::to_string_pretty(v) {
                Ok(s) => f.write_str(&s),
                Err(_) => write!(f, "{}", v),
            },
            ApiResponse::Text(s) => f.write_str(s),
        }
    }
}

/// Whether a `Content-Type` header value declares JSON. XML, any other type,
/// and a missing header are all treated as text.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.contains("application/json"))
}
