//! Configuration Module
//!
//! Static configuration for the cache manager: the remote-API host pattern,
//! the ordered runtime cache rules, the precache size ceiling, and the sweep
//! interval. Loaded once, from environment variables or a JSON document.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::models::Destination;
use crate::policy::{CacheRule, RequestMatcher, Strategy};

/// Cumulative size ceiling for precached assets (5 MiB).
pub const DEFAULT_PRECACHE_CEILING_BYTES: u64 = 5 * 1024 * 1024;

/// Placeholder remote-API host pattern. A deployment overrides this via
/// `API_HOST_PATTERN` or a config document; it is a parameter, not a
/// constant baked into the rules.
const DEFAULT_API_HOST_PATTERN: &str = "api.example.com";

// == Matcher Config ==
/// Declarative form of a request matcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherConfig {
    /// Requests fetching the given resource class
    Destination(Destination),
    /// Requests whose host matches the configured remote-API pattern
    ApiHost,
    /// Requests whose host matches an explicit pattern
    Host(String),
}

// == Rule Config ==
/// Declarative form of one cache rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// What the rule matches
    pub matcher: MatcherConfig,
    /// Strategy executed on a match
    pub strategy: Strategy,
    /// Bucket name
    pub cache_name: String,
    /// Capacity bound
    pub max_entries: usize,
    /// Age bound in seconds
    pub max_age_seconds: u64,
    /// Bounded network wait in seconds (NetworkFirst only)
    #[serde(default)]
    pub network_timeout_seconds: Option<u64>,
}

// == Cache Config ==
/// Complete static configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Host pattern identifying the remote API
    pub api_host_pattern: String,
    /// Ordered rule list; first match wins
    pub rules: Vec<RuleConfig>,
    /// Cumulative size ceiling for precached assets, in bytes
    pub precache_max_total_bytes: u64,
    /// Background expiry sweep interval in seconds
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    /// Creates a config from environment variables with defaults.
    ///
    /// # Environment Variables
    /// - `API_HOST_PATTERN` - Remote-API host pattern (default: placeholder)
    /// - `PRECACHE_MAX_TOTAL_BYTES` - Precache ceiling (default: 5 MiB)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            api_host_pattern: env::var("API_HOST_PATTERN")
                .unwrap_or_else(|_| DEFAULT_API_HOST_PATTERN.to_string()),
            precache_max_total_bytes: env::var("PRECACHE_MAX_TOTAL_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PRECACHE_CEILING_BYTES),
            sweep_interval_secs: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            rules: default_rules(),
        }
    }

    /// Parses a config from a JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Resolves the declarative rules into runtime rules, substituting the
    /// configured host pattern for `ApiHost` matchers.
    pub fn resolve_rules(&self) -> Vec<CacheRule> {
        self.rules
            .iter()
            .map(|rule| CacheRule {
                matcher: match &rule.matcher {
                    MatcherConfig::Destination(dest) => RequestMatcher::Destination(*dest),
                    MatcherConfig::ApiHost => {
                        RequestMatcher::HostPattern(self.api_host_pattern.clone())
                    }
                    MatcherConfig::Host(pattern) => RequestMatcher::HostPattern(pattern.clone()),
                },
                strategy: rule.strategy,
                cache_name: rule.cache_name.clone(),
                max_entries: rule.max_entries,
                max_age: Duration::from_secs(rule.max_age_seconds),
                network_timeout: rule.network_timeout_seconds.map(Duration::from_secs),
            })
            .collect()
    }

    /// Background sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            api_host_pattern: DEFAULT_API_HOST_PATTERN.to_string(),
            rules: default_rules(),
            precache_max_total_bytes: DEFAULT_PRECACHE_CEILING_BYTES,
            sweep_interval_secs: 60,
        }
    }
}

/// The reference rule set: images are CacheFirst for 30 days in a bucket of
/// 50; API calls are NetworkFirst with a 10 second wait, kept for a day in
/// a bucket of 20.
fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig {
            matcher: MatcherConfig::Destination(Destination::Image),
            strategy: Strategy::CacheFirst,
            cache_name: "images".to_string(),
            max_entries: 50,
            max_age_seconds: 2_592_000,
            network_timeout_seconds: None,
        },
        RuleConfig {
            matcher: MatcherConfig::ApiHost,
            strategy: Strategy::NetworkFirst,
            cache_name: "api".to_string(),
            max_entries: 20,
            max_age_seconds: 86_400,
            network_timeout_seconds: Some(10),
        },
    ]
}
