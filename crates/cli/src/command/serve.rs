use anyhow::{anyhow, Context, Result};
use clap::Parser;
use mdpages_config::Config;
use mdpages_server::AppState;
use std::path::PathBuf;
use std::sync::Arc;

/// Serves the markdown tree over HTTP.
#[derive(Parser, Debug, Clone)]
pub struct Serve {
    /// Root of the markdown tree, overrides `server.root`.
    #[clap(long)]
    pub root: Option<PathBuf>,

    /// Address to listen on, overrides `server.addr`.
    #[clap(long)]
    pub addr: Option<String>,

    /// Directory holding the templates, overrides `template.dir`.
    #[clap(long)]
    pub template_dir: Option<PathBuf>,
}

impl Serve {
    /// Applies the command line overrides on top of `config`.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(root) = &self.root {
            config.server.root = root.clone();
        }
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
        config
    }

    pub async fn run(self, config: Config) -> Result<()> {
        let config = self.apply(config);

        let listener = tokio::net::TcpListener::bind(&config.server.addr)
            .await
            .with_context(|| format!("failed to bind {}", config.server.addr))?;

        let state = Arc::new(AppState {
            root: config.server.root.clone(),
            index_files: config.server.index_files.clone(),
            renderer: super::page_renderer(&config, self.template_dir),
        });

        tracing::debug!(
            template_dir = %state.renderer.expander().config().template_dir.display(),
            "Template directory"
        );

        mdpages_server::serve(listener, state)
            .await
            .map_err(|err| anyhow!(err))
    }
}
