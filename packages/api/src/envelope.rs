//! The `{ data, error }` response envelope.
//!
//! Every endpoint answers with this shape, success or failure. Both keys are
//! always present so the client can decode a response without looking at the
//! status code first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// A successful response with nothing to return (e.g. no active session).
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_result(self) -> Result<Option<T>, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_serializes_both_keys() {
        let value = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(value, json!({ "data": 3, "error": null }));
    }

    #[test]
    fn err_serializes_null_data() {
        let value = serde_json::to_value(ApiResponse::<u32>::err("nope")).unwrap();
        assert_eq!(value, json!({ "data": null, "error": "nope" }));
    }

    #[test]
    fn into_result_prefers_error() {
        let resp: ApiResponse<u32> = ApiResponse {
            data: Some(1),
            error: Some("broken".into()),
        };
        assert_eq!(resp.into_result(), Err("broken".to_string()));
        assert_eq!(ApiResponse::<u32>::empty().into_result(), Ok(None));
    }
}
