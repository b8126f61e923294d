//! Intercepted request model
//!
//! Defines the shape of an outgoing request as seen at the interception
//! point, along with the normalized identity used as a cache key.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CacheError, Result};

// == Method ==
/// HTTP method of an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

// == Destination ==
/// The resource class an intercepted request is fetching.
///
/// Mirrors the destination reported by the platform for each outgoing
/// request; `Other` covers everything the cache rules never target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Script,
    Style,
    Image,
    Font,
    Other,
}

// == Request ==
/// An outgoing request captured at the interception point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, query string included
    pub url: String,
    /// Resource class being fetched
    pub destination: Destination,
}

impl Request {
    /// Creates a GET request for the given URL and destination.
    pub fn get(url: impl Into<String>, destination: Destination) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            destination,
        }
    }

    /// Normalized request identity: method plus the full URL.
    ///
    /// The query string is deliberately part of the key; two URLs differing
    /// only in query parameters are distinct cache entries.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }

    /// Parses and returns the request URL.
    pub fn parsed_url(&self) -> Result<Url> {
        Url::parse(&self.url)
            .map_err(|e| CacheError::InvalidRequest(format!("{}: {}", self.url, e)))
    }

    /// Host component of the request URL, if it has one.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}
