//! Cloudflare API v4 wire types
//!
//! Every Cloudflare response is wrapped in the same envelope:
//!
//! ```json
//! { "success": true, "errors": [], "messages": [], "result": ... }
//! ```

use ddns_core::DnsRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL value sent with updates; Cloudflare treats it as "automatic"
pub const AUTOMATIC_TTL: u32 = 0;

/// Response envelope
///
/// `result` is a list of records for lookups and a single record for
/// updates. It is `null` on most failure responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// The first error entry, or a placeholder when the list is empty
    pub fn first_error(&self) -> String {
        self.errors
            .first()
            .map(ToString::to_string)
            .unwrap_or_else(|| "no error details provided".to_string())
    }
}

/// One entry of the envelope's `errors` list
///
/// Cloudflare sends `{"code": 1004, "message": "..."}`. Bare strings and
/// other JSON values are accepted too and kept as the message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawApiError")]
pub struct ApiError {
    pub code: Option<i64>,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawApiError {
    Structured {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: String,
    },
    Text(String),
    Other(serde_json::Value),
}

impl From<RawApiError> for ApiError {
    fn from(raw: RawApiError) -> Self {
        match raw {
            RawApiError::Structured { code, message } => Self { code, message },
            RawApiError::Text(message) => Self { code: None, message },
            RawApiError::Other(value) => Self {
                code: None,
                message: value.to_string(),
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Body of `PUT /zones/:zone_id/dns_records/:record_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub name: &'a str,
    pub content: &'a str,
    pub ttl: u32,
    pub proxied: bool,
}

impl<'a> UpdateRecordRequest<'a> {
    /// Unproxied A record with automatic TTL
    pub fn a_record(name: &'a str, content: &'a str) -> Self {
        Self {
            record_type: "A",
            name,
            content,
            ttl: AUTOMATIC_TTL,
            proxied: false,
        }
    }

    /// The record this request would produce
    pub fn to_record(&self, id: &str) -> DnsRecord {
        DnsRecord {
            id: id.to_string(),
            record_type: self.record_type.to_string(),
            name: self.name.to_string(),
            content: self.content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_shape() {
        let body = serde_json::to_string(&UpdateRecordRequest::a_record(
            "home.example.com",
            "203.0.113.9",
        ))
        .unwrap();

        assert_eq!(
            body,
            r#"{"type":"A","name":"home.example.com","content":"203.0.113.9","ttl":0,"proxied":false}"#
        );
    }

    #[test]
    fn test_structured_error_entry() {
        let response: ApiResponse<DnsRecord> = serde_json::from_str(
            r#"{"success":false,"errors":[{"code":9109,"message":"Invalid access token"}],"messages":[],"result":null}"#,
        )
        .unwrap();

        assert!(!response.success);
        assert!(response.result.is_none());
        assert_eq!(response.first_error(), "9109: Invalid access token");
    }

    #[test]
    fn test_string_error_entry() {
        let response: ApiResponse<DnsRecord> =
            serde_json::from_str(r#"{"success":false,"errors":["record is locked"]}"#).unwrap();

        assert_eq!(
            response.errors,
            vec![ApiError {
                code: None,
                message: "record is locked".to_string()
            }]
        );
        assert_eq!(response.first_error(), "record is locked");
    }

    #[test]
    fn test_empty_error_list() {
        let response: ApiResponse<Vec<DnsRecord>> =
            serde_json::from_str(r#"{"success":false,"errors":[],"result":[]}"#).unwrap();

        assert_eq!(response.first_error(), "no error details provided");
    }

    #[test]
    fn test_missing_errors_field() {
        let response: ApiResponse<Vec<DnsRecord>> =
            serde_json::from_str(r#"{"success":true,"result":[]}"#).unwrap();

        assert!(response.errors.is_empty());
        assert_eq!(response.result, Some(Vec::new()));
    }
}
