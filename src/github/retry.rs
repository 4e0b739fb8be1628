use super::*;
use crate::config::FetchConfig;
use std::time::Duration;
use tracing::{info, warn};

/// Caller-side policy around a [`StatsSource`].
///
/// GitHub answers `202 Accepted` while it computes statistics for a
/// repository it has not seen recently, which the fetcher reports as
/// `StatsUnavailable`. Retrying a few times with a delay usually gets the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.retry_delay_ms),
            timeout: match config.request_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

impl RetryPolicy {
    pub async fn fetch<S: StatsSource>(
        &self,
        source: &S,
        identity: &RepositoryIdentity,
    ) -> Result<Vec<RawContributorRecord>, StatsError> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(source, identity).await {
                Ok(records) => {
                    info!(
                        "Received statistics for {} contributors of {}",
                        records.len(),
                        identity
                    );
                    return Ok(records);
                }
                Err(StatsError::StatsUnavailable) if attempt < max_attempts => {
                    warn!(
                        "Statistics for {} not available yet (attempt {}/{}), retrying in {:?}",
                        identity, attempt, max_attempts, self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn attempt<S: StatsSource>(
        &self,
        source: &S,
        identity: &RepositoryIdentity,
    ) -> Result<Vec<RawContributorRecord>, StatsError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, source.fetch(identity))
                .await
                .unwrap_or(Err(StatsError::StatsUnavailable)),
            None => source.fetch(identity).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    /// Replays a fixed list of outcomes, one per call.
    struct ScriptedSource {
        outcomes: RefCell<Vec<Result<Vec<RawContributorRecord>, StatsError>>>,
        calls: Cell<u32>,
    }

    impl ScriptedSource {
        fn new(mut outcomes: Vec<Result<Vec<RawContributorRecord>, StatsError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: RefCell::new(outcomes),
                calls: Cell::new(0),
            }
        }
    }

    impl StatsSource for ScriptedSource {
        async fn fetch(
            &self,
            _identity: &RepositoryIdentity,
        ) -> Result<Vec<RawContributorRecord>, StatsError> {
            self.calls.set(self.calls.get() + 1);
            self.outcomes
                .borrow_mut()
                .pop()
                .unwrap_or(Err(StatsError::StatsUnavailable))
        }
    }

    struct SlowSource;

    impl StatsSource for SlowSource {
        async fn fetch(
            &self,
            _identity: &RepositoryIdentity,
        ) -> Result<Vec<RawContributorRecord>, StatsError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
            timeout: None,
        }
    }

    fn record(login: &str) -> RawContributorRecord {
        RawContributorRecord {
            author: Some(Author {
                login: login.to_string(),
                avatar_url: format!("https://avatars/{}", login),
            }),
            weeks: Vec::new(),
        }
    }

    fn identity() -> RepositoryIdentity {
        RepositoryIdentity::new("octo", "widgets")
    }

    #[tokio::test]
    async fn test_retries_until_stats_are_computed() {
        let source = ScriptedSource::new(vec![
            Err(StatsError::StatsUnavailable),
            Err(StatsError::StatsUnavailable),
            Ok(vec![record("amy")]),
        ]);

        let records = policy(3).fetch(&source, &identity()).await.unwrap();

        assert_eq!(records, vec![record("amy")]);
        assert_eq!(source.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let source = ScriptedSource::new(vec![]);

        let err = policy(4).fetch(&source, &identity()).await.unwrap_err();

        assert_eq!(err, StatsError::StatsUnavailable);
        assert_eq!(source.calls.get(), 4);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let not_found = StatsError::RepositoryNotFound {
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
        };
        let source = ScriptedSource::new(vec![Err(not_found.clone())]);

        let err = policy(5).fetch(&source, &identity()).await.unwrap_err();

        assert_eq!(err, not_found);
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_calls_once() {
        let source = ScriptedSource::new(vec![Ok(Vec::new())]);

        let records = policy(0).fetch(&source, &identity()).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_unavailable() {
        let policy = RetryPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(10),
            timeout: Some(Duration::from_secs(1)),
        };

        let err = policy.fetch(&SlowSource, &identity()).await.unwrap_err();

        assert_eq!(err, StatsError::StatsUnavailable);
    }

    #[test]
    fn test_policy_from_config() {
        let config = FetchConfig {
            max_attempts: 0,
            retry_delay_ms: 250,
            request_timeout_secs: 0,
        };

        let policy = RetryPolicy::from(&config);

        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.delay, Duration::from_millis(250));
        assert_eq!(policy.timeout, None);
    }
}
