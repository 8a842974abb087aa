use anyhow::{Context, Result};
use clap::Parser;
use mdpages_config::Config;
use std::path::{Path, PathBuf};

/// Prints FILE with every template tag expanded.
#[derive(Parser, Debug, Clone)]
pub struct Expand {
    /// Markdown file to expand.
    pub file: PathBuf,

    /// Directory holding the templates, overrides `template.dir`.
    #[clap(long)]
    pub template_dir: Option<PathBuf>,
}

impl Expand {
    pub async fn run(self, config: Config) -> Result<()> {
        let expanded = expand_file(&config, &self.file, self.template_dir).await?;
        print!("{expanded}");
        Ok(())
    }
}

async fn expand_file(config: &Config, file: &Path, template_dir: Option<PathBuf>) -> Result<String> {
    let markdown = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    Ok(super::expander(config, template_dir)
        .expand(&markdown, file)
        .await)
}
