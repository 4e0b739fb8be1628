use super::*;
use colored::*;
use std::fmt::Write;

const NAME_WIDTH: usize = 24;
const ADDITIONS_WIDTH: usize = 20;
const DELETIONS_WIDTH: usize = 20;

pub struct TableGenerator;

impl TableGenerator {
    pub fn new() -> Self {
        Self
    }

    fn render(&self, report: &ContributionReport) -> String {
        let mut out = String::new();

        if let Some(repository) = &report.repository {
            let _ = writeln!(
                out,
                "Repository: {}",
                repository.to_string().bright_white()
            );
        }

        let _ = writeln!(
            out,
            "{}",
            format!(
                "{:<5}{:<name$}{:>add$}{:>del$}{:>14}",
                "#",
                "Name",
                "",
                "",
                "Total score",
                name = NAME_WIDTH,
                add = ADDITIONS_WIDTH,
                del = DELETIONS_WIDTH
            )
            .bold()
        );

        if report.is_empty() {
            let _ = writeln!(out, "{}", EMPTY_PROMPT.yellow());
            return out;
        }

        for (index, contributor) in report.contributors.iter().enumerate() {
            let rank = format!("{}.", index + 1);
            let additions = format!("+ {} additions", contributor.additions);
            let deletions = format!("- {} deletions", contributor.deletions);
            let total = format!("{} updates", contributor.total_changes());

            let _ = writeln!(
                out,
                "{:<5}{:<name$}{}{}{}",
                rank,
                contributor.name,
                format!("{:>add$}", additions, add = ADDITIONS_WIDTH).green(),
                format!("{:>del$}", deletions, del = DELETIONS_WIDTH).red(),
                format!("{:>14}", total).cyan(),
                name = NAME_WIDTH
            );
        }

        out
    }
}

impl OutputGenerator for TableGenerator {
    async fn generate(&mut self, report: &ContributionReport) -> Result<String> {
        Ok(self.render(report))
    }
}
