use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod fetcher;
pub mod identity;
pub mod retry;

pub use fetcher::StatsFetcher;
pub use retry::RetryPolicy;

/// An owner/repository pair on GitHub.
///
/// Built once per request from user input (see [`RepositoryIdentity::parse`])
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryIdentity {
    owner_login: String,
    repository_name: String,
}

impl RepositoryIdentity {
    pub fn new(owner_login: impl Into<String>, repository_name: impl Into<String>) -> Self {
        Self {
            owner_login: owner_login.into(),
            repository_name: repository_name.into(),
        }
    }

    pub fn owner_login(&self) -> &str {
        &self.owner_login
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner_login, self.repository_name)
    }
}

/// One contributor's activity in one week bucket, as sent by the stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WeeklyContribution {
    #[serde(rename = "a", default)]
    pub additions: Option<u64>,
    #[serde(rename = "d", default)]
    pub deletions: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
}

/// A single entry of the `/stats/contributors` response.
///
/// `author` is `None` for deleted or anonymized accounts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawContributorRecord {
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub weeks: Vec<WeeklyContribution>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("Repository {owner}/{repo} was not found.")]
    RepositoryNotFound { owner: String, repo: String },
    #[error("Contributor statistics are currently unavailable.")]
    StatsUnavailable,
}

impl StatsError {
    pub fn is_network_class(&self) -> bool {
        matches!(self, StatsError::StatsUnavailable)
    }
}

/// Anything that can produce the raw contributor records of a repository.
pub trait StatsSource {
    async fn fetch(
        &self,
        identity: &RepositoryIdentity,
    ) -> Result<Vec<RawContributorRecord>, StatsError>;
}
