use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod html;
pub mod reporter;
pub mod table;

pub use reporter::Reporter;

use crate::github::{RepositoryIdentity, StatsError};
use crate::stats::ContributorStats;

pub const EMPTY_PROMPT: &str = "Please provide a valid GitHub repository URL.";
pub const NETWORK_PROBLEMS: &str = "Network problems.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Html,
}

/// Ranked contributors of one repository, ready to be rendered.
///
/// `repository` is `None` when the user input did not name a repository,
/// in which case `contributors` is empty too.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionReport {
    pub repository: Option<RepositoryIdentity>,
    pub generated_at: DateTime<Utc>,
    pub contributors: Vec<ContributorStats>,
}

impl ContributionReport {
    pub fn new(repository: RepositoryIdentity, contributors: Vec<ContributorStats>) -> Self {
        Self {
            repository: Some(repository),
            generated_at: Utc::now(),
            contributors,
        }
    }

    pub fn empty() -> Self {
        Self {
            repository: None,
            generated_at: Utc::now(),
            contributors: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }
}

/// Message shown to the user for a failed request.
///
/// Network-class failures get a fixed text so transport details never leak.
pub fn error_message(err: &StatsError) -> String {
    if err.is_network_class() {
        NETWORK_PROBLEMS.to_string()
    } else {
        err.to_string()
    }
}

pub fn add_file_extension(path: &str, format: &OutputFormat) -> String {
    let extension = match format {
        OutputFormat::Html => ".html",
        OutputFormat::Json => ".json",
        OutputFormat::Table => ".txt",
    };

    if path.ends_with(extension) {
        path.to_string()
    } else {
        format!("{}{}", path, extension)
    }
}

pub trait OutputGenerator {
    async fn generate(&mut self, report: &ContributionReport) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_format_values() {
        assert_eq!(OutputFormat::from_str("json", true), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("HTML", true), Ok(OutputFormat::Html));
        assert_eq!(OutputFormat::from_str("table", false), Ok(OutputFormat::Table));
        assert!(OutputFormat::from_str("jsno", true).is_err());
    }

    #[test]
    fn test_add_file_extension() {
        assert_eq!(add_file_extension("report", &OutputFormat::Json), "report.json");
        assert_eq!(add_file_extension("report.html", &OutputFormat::Html), "report.html");
    }

    #[test]
    fn test_error_message_hides_network_details() {
        assert_eq!(error_message(&StatsError::StatsUnavailable), NETWORK_PROBLEMS);

        let not_found = StatsError::RepositoryNotFound {
            owner: "octo".to_string(),
            repo: "nope".to_string(),
        };
        assert_eq!(error_message(&not_found), "Repository octo/nope was not found.");
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ContributionReport::new(
            RepositoryIdentity::new("octo", "widgets"),
            vec![ContributorStats {
                name: "amy".to_string(),
                avatar_url: "u".to_string(),
                additions: 3,
                deletions: 1,
            }],
        );

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["repository"]["ownerLogin"], "octo");
        assert_eq!(value["repository"]["repositoryName"], "widgets");
        assert!(value["generatedAt"].is_string());
        assert_eq!(value["contributors"][0]["avatarUrl"], "u");
    }

    #[test]
    fn test_empty_report() {
        let report = ContributionReport::empty();

        assert!(report.is_empty());
        assert!(report.repository.is_none());
    }
}
