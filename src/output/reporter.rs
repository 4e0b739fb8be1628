use super::*;
use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use super::html::HtmlGenerator;
use super::table::TableGenerator;

pub struct Reporter {
    format: OutputFormat,
    output_path: Option<String>,
}

impl Reporter {
    pub fn new(format: OutputFormat, output_path: Option<&str>) -> Self {
        let output_path = output_path.map(|path| super::add_file_extension(path, &format));

        Self {
            format,
            output_path,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub async fn render(&mut self, report: &ContributionReport) -> Result<String> {
        let content = match self.format {
            OutputFormat::Table => TableGenerator::new().generate(report).await?,
            OutputFormat::Html => HtmlGenerator::new()?.generate(report).await?,
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
        };
        Ok(content)
    }

    pub async fn generate_report(&mut self, report: &ContributionReport) -> Result<()> {
        // a table written to a file must not carry terminal escape codes
        if self.format == OutputFormat::Table && self.output_path.is_some() {
            colored::control::set_override(false);
        }

        let content = self.render(report).await?;

        match &self.output_path {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("Failed to write report to {}", path))?;
                info!("Report saved to {}", path);
            }
            None => println!("{}", content),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn report() -> ContributionReport {
        ContributionReport::new(
            RepositoryIdentity::new("octo", "widgets"),
            vec![ContributorStats {
                name: "amy".to_string(),
                avatar_url: "u".to_string(),
                additions: 4,
                deletions: 2,
            }],
        )
    }

    #[test]
    fn test_output_path_gets_format_extension() {
        let reporter = Reporter::new(OutputFormat::Table, Some("out"));
        assert_eq!(reporter.output_path.as_deref(), Some("out.txt"));

        let reporter = Reporter::new(OutputFormat::Json, Some("out"));
        assert_eq!(reporter.output_path.as_deref(), Some("out.json"));

        let reporter = Reporter::new(OutputFormat::Html, None);
        assert_eq!(reporter.output_path, None);
    }

    #[tokio::test]
    async fn test_table_written_to_file_without_colors() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("ranking");
        let mut reporter = Reporter::new(OutputFormat::Table, base.to_str());

        reporter.generate_report(&report()).await.unwrap();

        let written = fs::read_to_string(dir.path().join("ranking.txt")).unwrap();
        assert!(written.contains("amy"));
        assert!(written.contains("+ 4 additions"));
        assert!(written.contains("6 updates"));
        assert!(!written.contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_json_render() {
        let mut reporter = Reporter::new(OutputFormat::Json, None);

        let content = reporter.render(&report()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["contributors"][0]["name"], "amy");
        assert_eq!(value["contributors"][0]["additions"], 4);
    }

    #[tokio::test]
    async fn test_generate_report_writes_file() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("report");
        let mut reporter = Reporter::new(OutputFormat::Html, base.to_str());

        reporter.generate_report(&report()).await.unwrap();

        let written = fs::read_to_string(dir.path().join("report.html")).unwrap();
        assert!(written.contains("+ 4 additions"));
    }
}
