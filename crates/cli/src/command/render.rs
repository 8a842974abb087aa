use anyhow::{Context, Result};
use clap::Parser;
use mdpages_config::Config;
use std::path::{Path, PathBuf};

/// Prints FILE rendered to HTML.
#[derive(Parser, Debug, Clone)]
pub struct Render {
    /// Markdown file to render.
    pub file: PathBuf,

    /// Directory holding the templates, overrides `template.dir`.
    #[clap(long)]
    pub template_dir: Option<PathBuf>,

    /// Print only the rendered markdown, without the page shell.
    #[clap(long)]
    pub body_only: bool,
}

impl Render {
    pub async fn run(self, config: Config) -> Result<()> {
        let html = render_file(&config, &self.file, self.template_dir, self.body_only).await?;
        println!("{html}");
        Ok(())
    }
}

async fn render_file(
    config: &Config,
    file: &Path,
    template_dir: Option<PathBuf>,
    body_only: bool,
) -> Result<String> {
    let url_base = url_base(&config.server.root, file);

    let page = super::page_renderer(config, template_dir)
        .render_file(file, &url_base)
        .await
        .with_context(|| format!("failed to render {}", file.display()))?;

    if body_only {
        Ok(page.body)
    } else {
        Ok(page.into_html())
    }
}

/// Directory URL `file` would be served under from `root`, `/` for files
/// outside of it.
fn url_base(root: &Path, file: &Path) -> String {
    let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    let file = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());
    let parent = file.parent().unwrap_or(Path::new(""));
    let Ok(relative) = parent.strip_prefix(&root) else {
        return "/".to_string();
    };

    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdpages_config::ServerConfig;
    use std::fs;

    #[test]
    fn test_url_base() {
        let root = Path::new("/srv/site");
        assert_eq!(url_base(root, Path::new("/srv/site/index.md")), "/");
        assert_eq!(
            url_base(root, Path::new("/srv/site/docs/guide/setup.md")),
            "/docs/guide/"
        );
        assert_eq!(url_base(root, Path::new("/elsewhere/page.md")), "/");
    }

    #[tokio::test]
    async fn test_render_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("templates/warn.md"), "**Warning:** {{text}}").unwrap();
        let page = root.join("docs/setup.md");
        fs::write(
            &page,
            "# Setup\n\n!{{warn}{\"text\": \"careful\"}}\n\n[next](install.md)\n",
        )
        .unwrap();

        let config = Config {
            server: ServerConfig {
                root: root.to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };

        let body = render_file(&config, &page, None, true).await.unwrap();
        assert!(body.contains(r#"<h1 id="setup">Setup</h1>"#));
        assert!(body.contains("<strong>Warning:</strong> careful"));
        assert!(body.contains(r#"<a href="/docs/install">next</a>"#));
        assert!(!body.contains("<html"));

        let html = render_file(&config, &page, None, false).await.unwrap();
        assert!(html.contains("<title>Setup</title>"));
        assert!(html.contains(&body));
    }
}
