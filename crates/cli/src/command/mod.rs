pub mod expand;
pub mod render;
pub mod serve;

use mdpages_config::Config;
use mdpages_core::{ExpanderConfig, PageRenderer, RenderOptions, TemplateExpander};
use std::path::PathBuf;

fn render_options(config: &Config) -> RenderOptions {
    let render = &config.render;
    RenderOptions {
        enable_tables: render.enable_tables,
        enable_strikethrough: render.enable_strikethrough,
        enable_tasklists: render.enable_tasklists,
        enable_footnotes: render.enable_footnotes,
        enable_heading_attributes: render.enable_heading_attributes,
        enable_smart_punctuation: render.enable_smart_punctuation,
        link_base: None,
    }
}

/// `--template-dir` is taken as given, the configured directory is relative
/// to the served root.
fn expander(config: &Config, template_dir: Option<PathBuf>) -> TemplateExpander {
    let template_dir = template_dir.unwrap_or_else(|| config.template_dir());
    TemplateExpander::new(ExpanderConfig {
        template_dir,
        max_depth: config.template.max_depth,
        max_expansions: config.template.max_expansions,
    })
}

fn page_renderer(config: &Config, template_dir: Option<PathBuf>) -> PageRenderer {
    PageRenderer::new(expander(config, template_dir), render_options(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdpages_config::{RenderConfig, ServerConfig, TemplateConfig};

    #[test]
    fn test_expander_follows_config() {
        let config = Config {
            server: ServerConfig {
                root: PathBuf::from("/srv/site"),
                ..Default::default()
            },
            template: TemplateConfig {
                max_depth: 4,
                ..Default::default()
            },
            ..Default::default()
        };

        let from_config = expander(&config, None);
        assert_eq!(
            from_config.config().template_dir,
            PathBuf::from("/srv/site/templates")
        );
        assert_eq!(from_config.config().max_depth, 4);

        let overridden = expander(&config, Some(PathBuf::from("partials")));
        assert_eq!(overridden.config().template_dir, PathBuf::from("partials"));
    }

    #[test]
    fn test_render_options_follow_config() {
        let config = Config {
            render: RenderConfig {
                enable_tables: false,
                enable_smart_punctuation: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let options = render_options(&config);
        assert!(!options.enable_tables);
        assert!(options.enable_smart_punctuation);
        assert!(options.enable_footnotes);
        assert_eq!(render_options(&Config::default()), RenderOptions::gfm());
    }
}
