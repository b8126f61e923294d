//! Policy Module
//!
//! Request classification: ordered matcher-to-strategy rules with
//! first-match-wins semantics.

mod matcher;
mod rule;

pub use matcher::RequestMatcher;
pub use rule::{classify, CacheRule, Strategy};
