//! Strategy Module
//!
//! Executors for the two runtime caching strategies.

mod cache_first;
mod network_first;

pub use cache_first::cache_first;
pub use network_first::network_first;

// == Test Support ==
#[cfg(test)]
pub(crate) mod testing {
    //! Scripted fetcher for exercising strategies without a network.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::{CacheError, Result};
    use crate::fetch::Fetcher;
    use crate::models::{Request, StoredResponse};

    /// One scripted fetch outcome.
    #[derive(Debug, Clone)]
    pub enum FakeOutcome {
        Respond(StoredResponse),
        Fail,
    }

    /// Fetcher that replays a script of outcomes, then repeats a default.
    /// Counts calls so tests can assert whether the network was contacted.
    pub struct FakeFetcher {
        script: Mutex<VecDeque<FakeOutcome>>,
        default: FakeOutcome,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        /// Always answers with the given response.
        pub fn always(response: StoredResponse) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                default: FakeOutcome::Respond(response),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// Always fails at the transport level.
        pub fn failing() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                default: FakeOutcome::Fail,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        /// Sleeps this long before answering each fetch.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Queues an outcome consumed before the default applies.
        pub fn push(&self, outcome: FakeOutcome) {
            self.script.lock().unwrap().push_back(outcome);
        }

        /// Number of fetches attempted so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, request: &Request) -> Result<StoredResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.default.clone());

            match outcome {
                FakeOutcome::Respond(response) => Ok(response),
                FakeOutcome::Fail => Err(CacheError::Fetch {
                    url: request.url.clone(),
                    reason: "scripted failure".to_string(),
                }),
            }
        }
    }
}
