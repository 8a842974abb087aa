//! Template expansion.
//!
//! Markdown pages can pull in reusable fragments with a tag:
//!
//! ```text
//! !{{card}{ "title": "Install", "href": "/guide/install" }}
//! ```
//!
//! `card` is loaded from `card.md` in the template directory, tags nested in
//! it are expanded first (recursively), then its `{{title}}` and `{{href}}`
//! placeholders are replaced by the argument values and the result is spliced
//! in place of the tag. Tags that cannot be expanded are replaced by an HTML
//! comment describing the problem, so a page always renders.

mod args;
mod error;
mod source;
mod tag;

pub use self::args::{parse_args, substitute, ArgumentMap};
pub use self::error::TemplateError;
pub use self::source::{FsSource, TemplateSource};
pub use self::tag::{find_first_tag, Tag};

use futures::future::{BoxFuture, FutureExt};
use std::path::{Component, Path, PathBuf};

/// Settings of a [`TemplateExpander`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// Directory holding the `<name>.md` template files.
    pub template_dir: PathBuf,
    /// Maximum nesting of templates inside templates.
    pub max_depth: usize,
    /// Maximum number of templates loaded by a single `expand` call.
    pub max_expansions: usize,
}

impl ExpanderConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 32;
    pub const DEFAULT_MAX_EXPANSIONS: usize = 1024;

    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_expansions: Self::DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Bookkeeping shared by every level of one `expand` call.
#[derive(Debug)]
struct Expansion {
    /// Templates currently being expanded, outermost first.
    stack: Vec<String>,
    /// Template loads left before every remaining tag is refused.
    budget: usize,
}

/// Expands `!{{name}{args}}` tags against a template directory.
#[derive(Debug, Clone)]
pub struct TemplateExpander<S = FsSource> {
    source: S,
    config: ExpanderConfig,
}

impl TemplateExpander<FsSource> {
    /// Creates an expander reading templates from the filesystem.
    pub fn new(config: ExpanderConfig) -> Self {
        Self::with_source(FsSource, config)
    }
}

impl<S: TemplateSource> TemplateExpander<S> {
    pub fn with_source(source: S, config: ExpanderConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Path of the file backing template `name`.
    ///
    /// Names always resolve against the template directory. Sub-directories
    /// are allowed, but absolute names and `..` are not.
    pub fn template_path(&self, name: &str) -> Result<PathBuf, TemplateError> {
        let is_valid = !name.is_empty()
            && Path::new(name)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_valid {
            return Err(TemplateError::InvalidName {
                name: name.to_string(),
            });
        }

        Ok(self.config.template_dir.join(format!("{name}.md")))
    }

    /// Expands every tag in `text`.
    ///
    /// `context` is the file `text` came from; it only shows up in logs.
    /// Failed tags are replaced with an HTML comment, this never fails.
    pub async fn expand(&self, text: &str, context: &Path) -> String {
        let mut expansion = Expansion {
            stack: Vec::new(),
            budget: self.config.max_expansions,
        };
        self.expand_text(text.to_string(), context.to_path_buf(), &mut expansion)
            .await
    }

    fn expand_text<'a>(
        &'a self,
        mut text: String,
        context: PathBuf,
        expansion: &'a mut Expansion,
    ) -> BoxFuture<'a, String> {
        async move {
            // Restart from the beginning after each replacement until no tag is left.
            while let Some((span, name, raw_args)) = find_first_tag(&text)
                .map(|tag| (tag.span, tag.name.trim().to_string(), tag.raw_args.to_string()))
            {
                tracing::debug!(
                    name = %name,
                    raw_args = %raw_args,
                    context = %context.display(),
                    depth = expansion.stack.len(),
                    "Found template tag"
                );

                let replacement = match self.expand_tag(&name, &raw_args, expansion).await {
                    Ok(expanded) => expanded,
                    Err(err) => {
                        tracing::warn!(
                            name = err.name(),
                            context = %context.display(),
                            error = %err,
                            "Failed to expand template tag"
                        );
                        err.placeholder()
                    }
                };

                text.replace_range(span, &replacement);
            }

            text
        }
        .boxed()
    }

    async fn expand_tag(
        &self,
        name: &str,
        raw_args: &str,
        expansion: &mut Expansion,
    ) -> Result<String, TemplateError> {
        if expansion.budget == 0 {
            return Err(TemplateError::ExpansionLimit {
                name: name.to_string(),
            });
        }

        let args = parse_args(name, raw_args).map_err(|source| TemplateError::InvalidJson {
            name: name.to_string(),
            source,
        })?;

        let path = self.template_path(name)?;

        if expansion.stack.len() >= self.config.max_depth
            || expansion.stack.iter().any(|active| active == name)
        {
            tracing::debug!(name, stack = ?expansion.stack, "Refusing to re-enter template");
            return Err(TemplateError::RecursionLimit {
                name: name.to_string(),
            });
        }

        expansion.budget -= 1;

        let content = self
            .source
            .read_to_string(&path)
            .await
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => TemplateError::NotFound {
                    name: name.to_string(),
                },
                _ => TemplateError::Read {
                    name: name.to_string(),
                    source: err,
                },
            })?;

        expansion.stack.push(name.to_string());
        let expanded = self.expand_text(content, path, expansion).await;
        expansion.stack.pop();

        Ok(substitute(&expanded, &args))
    }
}
