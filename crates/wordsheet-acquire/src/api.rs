// Remote definition fetcher.
//
// One request per attempt against the dictionary API. The API is flaky, so
// every failed attempt (bad status, transport error, undecodable body) is
// retried after a fixed delay until the attempt budget runs out. There is
// no backoff growth, no jitter and no distinction between failure causes.

use std::time::Duration;

use anyhow::Context;
use reqwest::Url;
use thiserror::Error;
use wordsheet_model::ApiResponse;

pub const API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

/// Why a single attempt failed. Every variant is retried.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("could not decode response body: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not get any data from the dictionary API for '{term}' after {attempts} attempts (last error: {last})")]
    Exhausted {
        term: String,
        attempts: u32,
        last: AttemptError,
    },
}

/// Attempt budget and delay between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first. `None` retries forever.
    pub max_attempts: Option<u32>,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Some(10),
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// A policy that gives up after `max_attempts` attempts (at least one).
    pub fn bounded(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            delay,
        }
    }

    /// A policy that never gives up. Only reachable by explicit opt-in.
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            max_attempts: None,
            delay,
        }
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// A successful fetch and how many attempts it took.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub entries: ApiResponse,
    pub attempts: u32,
}

/// Something that can make one definition request for a term.
#[allow(async_fn_in_trait)]
pub trait DefinitionSource {
    async fn attempt(&self, term: &str) -> Result<ApiResponse, AttemptError>;
}

/// Fetch definitions for `term`, retrying failed attempts per `policy`.
///
/// Sleeps `policy.delay` between attempts but not after the last one. The
/// sleep stalls the caller; nothing else runs meanwhile.
pub async fn fetch<S: DefinitionSource>(
    source: &S,
    term: &str,
    policy: &RetryPolicy,
) -> Result<Fetched, FetchError> {
    let mut attempts = 0;

    loop {
        attempts += 1;
        tracing::info!(term = %term.trim(), attempt = attempts, "Getting data from dictionary API");

        match source.attempt(term).await {
            Ok(entries) => {
                tracing::debug!(entries = entries.len(), attempts, "Received dictionary API data");
                return Ok(Fetched { entries, attempts });
            }
            Err(err) if policy.exhausted(attempts) => {
                return Err(FetchError::Exhausted {
                    term: term.trim().to_string(),
                    attempts,
                    last: err,
                });
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    delay_secs = policy.delay.as_secs_f64(),
                    "Error getting dictionary API data, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

/// The public dictionary API at dictionaryapi.dev.
pub struct DictionaryApi {
    client: reqwest::Client,
    base_url: Url,
}

impl DictionaryApi {
    pub fn new(client: reqwest::Client) -> anyhow::Result<Self> {
        Self::with_base_url(client, API_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("Invalid API URL: {base_url}"))?;
        anyhow::ensure!(!base_url.cannot_be_a_base(), "API URL cannot take a path: {base_url}");
        Ok(Self { client, base_url })
    }

    /// The request URL for a term; the term is trimmed and percent-encoded
    /// as a single path segment.
    pub fn entry_url(&self, term: &str) -> Url {
        append_segment(&self.base_url, term.trim())
    }
}

impl DefinitionSource for DictionaryApi {
    async fn attempt(&self, term: &str) -> Result<ApiResponse, AttemptError> {
        let url = self.entry_url(term);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| AttemptError::Decode(e.to_string()))
    }
}

/// Append one path segment to a base URL. `base` must be able to take a path.
pub(crate) fn append_segment(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use wordsheet_model::WordEntry;

    /// Fails the first `failures` attempts with a 503, then succeeds.
    struct FlakySource {
        failures: u32,
        calls: Cell<u32>,
    }

    impl FlakySource {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Cell::new(0),
            }
        }
    }

    impl DefinitionSource for FlakySource {
        async fn attempt(&self, term: &str) -> Result<ApiResponse, AttemptError> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n <= self.failures {
                return Err(AttemptError::Status(503));
            }
            Ok(vec![WordEntry {
                word: term.to_string(),
                ..Default::default()
            }])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_two_failures() {
        let source = FlakySource::new(2);
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let fetched = fetch(&source, "hello", &policy).await.unwrap();

        assert_eq!(fetched.attempts, 3);
        assert_eq!(fetched.entries[0].word, "hello");
        assert_eq!(source.calls.get(), 3);
        // Exactly two 5 second delays
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(15), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_sleep() {
        let source = FlakySource::new(0);
        let start = tokio::time::Instant::now();

        let fetched = fetch(&source, "hello", &RetryPolicy::default()).await.unwrap();

        assert_eq!(fetched.attempts, 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let source = FlakySource::new(u32::MAX);
        let policy = RetryPolicy::bounded(5, Duration::from_secs(5));
        let start = tokio::time::Instant::now();

        let err = fetch(&source, " hello\n", &policy).await.unwrap_err();

        let FetchError::Exhausted { term, attempts, last } = err;
        assert_eq!(term, "hello");
        assert_eq!(attempts, 5);
        assert!(matches!(last, AttemptError::Status(503)));
        assert_eq!(source.calls.get(), 5);
        // Four delays between five attempts, none after the last
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(20), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(25), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_keeps_retrying() {
        let source = FlakySource::new(25);
        let policy = RetryPolicy::unbounded(Duration::from_secs(5));

        let fetched = fetch(&source, "hello", &policy).await.unwrap();
        assert_eq!(fetched.attempts, 26);
    }

    #[test]
    fn test_bounded_policy_allows_at_least_one_attempt() {
        let policy = RetryPolicy::bounded(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, Some(1));
    }

    #[test]
    fn test_entry_url_encodes_term() {
        let api = DictionaryApi::new(reqwest::Client::new()).unwrap();
        assert_eq!(
            api.entry_url("hello\n").as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/hello"
        );
        assert_eq!(
            api.entry_url("ice cream").as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/ice%20cream"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let api = DictionaryApi::with_base_url(reqwest::Client::new(), "http://localhost:8080/entries").unwrap();
        assert_eq!(api.entry_url("cat").as_str(), "http://localhost:8080/entries/cat");
    }
}
