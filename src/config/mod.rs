use crate::output::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_NAME: &str = "contribstats";
const ENV_PREFIX: &str = "CONTRIBSTATS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub api_base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_format: OutputFormat,
    pub color_output: bool,
    pub max_contributors: Option<usize>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: "https://api.github.com".to_string(),
            user_agent: "contribstats".to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Table,
            color_output: true,
            max_contributors: None,
        }
    }
}

impl Config {
    /// Load configuration once at startup.
    ///
    /// Sources, later ones winning: built-in defaults, the config file
    /// (`path`, or `contribstats.*` in the working directory), `CONTRIBSTATS_*`
    /// environment variables. `GITHUB_TOKEN` is used when no token was set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        let mut config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        if config.github.token.is_none() {
            config.github.token = std::env::var("GITHUB_TOKEN").ok();
        }

        config.validate()?;
        debug!("Configuration loaded, API base {}", config.github.api_base_url);

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.github.token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => bail!(
                "No GitHub token configured: set GITHUB_TOKEN, {}_GITHUB__TOKEN or github.token in the config file",
                ENV_PREFIX
            ),
        }

        if self.github.api_base_url.trim().is_empty() {
            bail!("github.api_base_url must not be empty");
        }

        if self.output.max_contributors == Some(0) {
            bail!("output.max_contributors must be at least 1");
        }

        Ok(())
    }
}
