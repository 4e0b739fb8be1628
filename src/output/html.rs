use super::*;
use rust_embed::RustEmbed;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "contributors.html";

#[derive(RustEmbed)]
#[folder = "src/output/templates/"]
#[include = "*.html"]
struct Templates;

#[derive(RustEmbed)]
#[folder = "src/output/assets/"]
#[include = "*.css"]
struct Assets;

pub struct HtmlGenerator {
    tera: Tera,
}

/// One table row as the template sees it.
#[derive(Serialize)]
struct ContributorRow<'a> {
    rank: usize,
    name: &'a str,
    avatar_url: &'a str,
    additions: u64,
    deletions: u64,
    total: u64,
}

impl HtmlGenerator {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Load templates from embedded resources
        for file in Templates::iter() {
            let template_name = file.as_ref();
            let template_content = Templates::get(template_name)
                .ok_or_else(|| anyhow::anyhow!("Template {} not found", template_name))?;
            let template_str = std::str::from_utf8(&template_content.data)
                .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in template {}: {}", template_name, e))?;

            tera.add_raw_template(template_name, template_str)
                .map_err(|e| anyhow::anyhow!("Failed to add template {}: {}", template_name, e))?;
        }

        Ok(Self { tera })
    }

    fn load_asset(&self, filename: &str) -> Result<String> {
        let asset = Assets::get(filename)
            .ok_or_else(|| anyhow::anyhow!("Asset {} not found", filename))?;
        let content = std::str::from_utf8(&asset.data)
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in asset {}: {}", filename, e))?;
        Ok(content.to_string())
    }

    fn prepare_template_context(&self, report: &ContributionReport) -> Result<Context> {
        let mut context = Context::new();

        context.insert("css_content", &self.load_asset("styles.css")?);
        context.insert(
            "repository",
            &report.repository.as_ref().map(|r| r.to_string()),
        );
        context.insert(
            "generated_date",
            &report
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        );
        context.insert("empty_prompt", EMPTY_PROMPT);

        let rows: Vec<_> = report
            .contributors
            .iter()
            .enumerate()
            .map(|(index, contributor)| ContributorRow {
                rank: index + 1,
                name: &contributor.name,
                avatar_url: &contributor.avatar_url,
                additions: contributor.additions,
                deletions: contributor.deletions,
                total: contributor.total_changes(),
            })
            .collect();
        context.insert("rows", &rows);

        Ok(context)
    }
}

impl OutputGenerator for HtmlGenerator {
    async fn generate(&mut self, report: &ContributionReport) -> Result<String> {
        let context = self.prepare_template_context(report)?;
        let html = self.tera.render(TEMPLATE_NAME, &context)?;
        Ok(html)
    }
}
