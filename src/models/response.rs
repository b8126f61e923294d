//! Replayable response model
//!
//! Everything needed to serve a response again later without contacting
//! the network: status, headers, and the body bytes.

use serde::{Deserialize, Serialize};

// == Stored Response ==
/// A network response in replayable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    /// HTTP status code
    pub status: u16,
    /// Header name/value pairs, in received order
    pub headers: Vec<(String, String)>,
    /// Body payload
    pub body: Vec<u8>,
}

impl StoredResponse {
    /// Creates a response with the given status and body, no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Creates a 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    /// True for 2xx status codes. Only successful responses are written
    /// to a bucket; anything else is returned to the caller unstored.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body size in bytes.
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success_boundaries() {
        assert!(StoredResponse::new(200, b"".to_vec()).is_success());
        assert!(StoredResponse::new(299, b"".to_vec()).is_success());
        assert!(!StoredResponse::new(199, b"".to_vec()).is_success());
        assert!(!StoredResponse::new(304, b"".to_vec()).is_success());
        assert!(!StoredResponse::new(404, b"".to_vec()).is_success());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let mut resp = StoredResponse::ok(b"{}".to_vec());
        resp.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.header("etag"), None);
    }
}
