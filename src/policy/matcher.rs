//! Request Matcher Module
//!
//! Predicates deciding whether a cache rule applies to an outgoing request.

use crate::models::{Destination, Request};

// == Request Matcher ==
/// Predicate over an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMatcher {
    /// Matches requests fetching the given resource class
    Destination(Destination),
    /// Matches requests whose URL host matches a host pattern:
    /// exact (`api.example.com`) or leading-wildcard (`*.example.com`)
    HostPattern(String),
}

impl RequestMatcher {
    /// Evaluates the predicate against a request.
    ///
    /// A request without a parseable host never matches a host pattern.
    pub fn matches(&self, request: &Request) -> bool {
        match self {
            RequestMatcher::Destination(dest) => request.destination == *dest,
            RequestMatcher::HostPattern(pattern) => match request.host() {
                Some(host) => host_matches(pattern, &host),
                None => false,
            },
        }
    }
}

/// Host comparison: exact match, or suffix match under a `*.` wildcard.
///
/// `*.example.com` matches `api.example.com` and `a.b.example.com`, but not
/// the bare apex `example.com`.
fn host_matches(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(suffix) => host
            .strip_suffix(suffix)
            .is_some_and(|rest| rest.ends_with('.')),
        None => pattern.eq_ignore_ascii_case(host),
    }
}
