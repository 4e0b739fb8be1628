use super::*;
use crate::config::GithubConfig;
use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::debug;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Client for the `/repos/{owner}/{repo}/stats/contributors` endpoint.
///
/// Every call to [`StatsFetcher::fetch`] issues exactly one request and
/// reduces every failure to a [`StatsError`]. Nothing is retried here.
pub struct StatsFetcher {
    api_base_url: String,
    user_agent: String,
    token: String,
}

impl StatsFetcher {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let token = config
            .token
            .clone()
            .context("GitHub token is not configured")?;

        Ok(Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            token,
        })
    }

    fn endpoint(&self, identity: &RepositoryIdentity) -> String {
        format!(
            "{}/repos/{}/{}/stats/contributors",
            self.api_base_url,
            identity.owner_login(),
            identity.repository_name()
        )
    }

    pub async fn fetch(
        &self,
        identity: &RepositoryIdentity,
    ) -> Result<Vec<RawContributorRecord>, StatsError> {
        let url = self.endpoint(identity);
        debug!("Requesting contributor statistics from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .build()
            .map_err(|_| StatsError::StatsUnavailable)?;

        let response = client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await
            .map_err(|_| StatsError::StatsUnavailable)?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<RawContributorRecord>>()
                .await
                .map_err(|_| StatsError::StatsUnavailable),
            StatusCode::NOT_FOUND => Err(StatsError::RepositoryNotFound {
                owner: identity.owner_login().to_string(),
                repo: identity.repository_name().to_string(),
            }),
            // 202 while GitHub is still computing, 204 for empty repositories
            _ => Err(StatsError::StatsUnavailable),
        }
    }
}

impl StatsSource for StatsFetcher {
    async fn fetch(
        &self,
        identity: &RepositoryIdentity,
    ) -> Result<Vec<RawContributorRecord>, StatsError> {
        StatsFetcher::fetch(self, identity).await
    }
}
