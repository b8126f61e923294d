//! Cache Rule Module
//!
//! A rule binds a matcher to a strategy and a bucket with its bounds.
//! Rules are evaluated in declaration order and the first match wins, so
//! the rule list is an ordered list, never a dispatch table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::BucketLimits;
use crate::models::Request;
use crate::policy::RequestMatcher;

// == Strategy ==
/// How a matched request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Prefer the cached response; consult the network only on a miss
    CacheFirst,
    /// Prefer a live network response; fall back to cache on failure
    /// or timeout
    NetworkFirst,
}

// == Cache Rule ==
/// One matcher-to-policy binding.
#[derive(Debug, Clone)]
pub struct CacheRule {
    /// Predicate deciding whether this rule applies
    pub matcher: RequestMatcher,
    /// Strategy executed on a match
    pub strategy: Strategy,
    /// Bucket the matched responses live in
    pub cache_name: String,
    /// Capacity bound of the bucket
    pub max_entries: usize,
    /// Age bound of the bucket's entries
    pub max_age: Duration,
    /// Bounded wait for the live fetch (NetworkFirst only)
    pub network_timeout: Option<Duration>,
}

impl CacheRule {
    /// Bucket bounds carried by this rule.
    pub fn limits(&self) -> BucketLimits {
        BucketLimits::new(self.max_entries, self.max_age)
    }
}

// == Classify ==
/// Finds the rule governing `request`: first match in declaration order.
///
/// Returns None for requests no rule targets; those pass straight through
/// to the network with no caching side effects.
pub fn classify<'a>(rules: &'a [CacheRule], request: &Request) -> Option<&'a CacheRule> {
    rules.iter().find(|rule| rule.matcher.matches(request))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Destination;

    fn image_rule() -> CacheRule {
        CacheRule {
            matcher: RequestMatcher::Destination(Destination::Image),
            strategy: Strategy::CacheFirst,
            cache_name: "images".to_string(),
            max_entries: 50,
            max_age: Duration::from_secs(2_592_000),
            network_timeout: None,
        }
    }

    fn api_rule() -> CacheRule {
        CacheRule {
            matcher: RequestMatcher::HostPattern("api.example.com".to_string()),
            strategy: Strategy::NetworkFirst,
            cache_name: "api".to_string(),
            max_entries: 20,
            max_age: Duration::from_secs(86_400),
            network_timeout: Some(Duration::from_secs(10)),
        }
    }

    #[test]
    fn test_classify_first_match_wins() {
        // An image served from the API host: the image rule is declared
        // first, so it governs.
        let rules = vec![image_rule(), api_rule()];
        let req = Request::get("https://api.example.com/avatar.png", Destination::Image);

        let rule = classify(&rules, &req).unwrap();
        assert_eq!(rule.cache_name, "images");

        // Declaration order reversed, the API rule wins instead.
        let rules = vec![api_rule(), image_rule()];
        let rule = classify(&rules, &req).unwrap();
        assert_eq!(rule.cache_name, "api");
    }

    #[test]
    fn test_classify_no_match() {
        let rules = vec![image_rule(), api_rule()];
        let req = Request::get("https://www.example.com/app.js", Destination::Script);
        assert!(classify(&rules, &req).is_none());
    }

    #[test]
    fn test_rule_limits() {
        let limits = image_rule().limits();
        assert_eq!(limits.max_entries, Some(50));
        assert_eq!(limits.max_age, Some(Duration::from_secs(2_592_000)));
    }
}
