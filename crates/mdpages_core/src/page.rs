//! From a markdown file on disk to a complete HTML page.

use crate::assets::build_page;
use crate::render::{to_html, RenderOptions};
use crate::template::{FsSource, TemplateExpander, TemplateSource};
use std::path::{Path, PathBuf};

/// Error type for page rendering.
///
/// Template problems never end up here, they are reported inline in the
/// page. Only the page itself failing to load is an error.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A rendered page, before it is wrapped into the HTML shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: String,
}

impl Page {
    /// The complete HTML document.
    pub fn into_html(self) -> String {
        build_page(&self.title, &self.body)
    }
}

/// Expands templates in a markdown page and renders it to HTML.
#[derive(Debug, Clone)]
pub struct PageRenderer<S = FsSource> {
    expander: TemplateExpander<S>,
    options: RenderOptions,
}

impl<S: TemplateSource> PageRenderer<S> {
    pub fn new(expander: TemplateExpander<S>, options: RenderOptions) -> Self {
        Self { expander, options }
    }

    pub fn expander(&self) -> &TemplateExpander<S> {
        &self.expander
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders markdown that was read from `source_path`.
    ///
    /// `url_base` is the directory URL the page is served under, relative
    /// links are resolved against it.
    pub async fn render_markdown(&self, markdown: &str, source_path: &Path, url_base: &str) -> Page {
        let expanded = self.expander.expand(markdown, source_path).await;
        let result = to_html(&expanded, &self.options.with_link_base(url_base));

        let title = result.title.unwrap_or_else(|| {
            source_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        tracing::debug!(
            path = %source_path.display(),
            url_base,
            title = %title,
            "Rendered page"
        );

        Page {
            title,
            body: result.html,
        }
    }

    /// Reads and renders the markdown file at `path`.
    pub async fn render_file(&self, path: &Path, url_base: &str) -> Result<Page, PageError> {
        let markdown = self
            .expander
            .source()
            .read_to_string(path)
            .await
            .map_err(|source| PageError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(self.render_markdown(&markdown, path, url_base).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ExpanderConfig;
    use std::fs;

    fn renderer(template_dir: &Path) -> PageRenderer {
        PageRenderer::new(
            TemplateExpander::new(ExpanderConfig::new(template_dir)),
            RenderOptions::gfm(),
        )
    }

    #[tokio::test]
    async fn test_render_file_with_templates() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("note.md"),
            "> **{{kind}}**: {{text}}\n\n!{{footer}{}}",
        )
        .unwrap();
        fs::write(templates.join("footer.md"), "[Back](index.md)").unwrap();

        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        let page_path = docs.join("setup.md");
        fs::write(
            &page_path,
            "# Setup\n\n!{{note}{\"kind\": \"Tip\", \"text\": \"read this\"}}\n\n!{{missing}{}}\n",
        )
        .unwrap();

        let page = renderer(&templates)
            .render_file(&page_path, "/docs/")
            .await
            .unwrap();

        assert_eq!(page.title, "Setup");
        assert!(page.body.contains("<strong>Tip</strong>: read this"));
        assert!(page.body.contains(r#"<a href="/docs/">Back</a>"#));
        assert!(page
            .body
            .contains("<!-- Template file missing.md not found -->"));
        assert!(!page.body.contains("!{{"));

        let html = page.into_html();
        assert!(html.contains("<title>Setup</title>"));
    }

    #[tokio::test]
    async fn test_title_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let page = renderer(dir.path())
            .render_markdown("no heading", &dir.path().join("notes.md"), "/")
            .await;
        assert_eq!(page.title, "notes");
    }

    #[tokio::test]
    async fn test_missing_page_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = renderer(dir.path())
            .render_file(&dir.path().join("ghost.md"), "/")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ghost.md"));
    }
}
