use crate::{command, logger};
use anyhow::Result;
use clap::Parser;
use mdpages_config::load_config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub enum RunCmd {
    /// Serve a markdown tree over HTTP.
    #[clap(name = "serve")]
    Serve(command::serve::Serve),
    /// Print a markdown file with its templates expanded.
    #[clap(name = "expand")]
    Expand(command::expand::Expand),
    /// Print a markdown file rendered to HTML.
    #[clap(name = "render")]
    Render(command::render::Render),
}

/// Options shared by every subcommand.
#[derive(Parser, Debug)]
pub struct Args {
    /// Enable the logging system, writing to this file.
    #[clap(long)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    #[clap(long)]
    pub config_file: Option<PathBuf>,
}

impl RunCmd {
    pub async fn run(self, args: Args) -> Result<()> {
        let loaded = load_config(args.config_file);
        let config = loaded.config;

        let log_path = logger::log_path(args.log, &config.log);
        let _guard = logger::init(log_path, &config.log)?;

        if let Some(err) = loaded.maybe_error {
            tracing::error!(
                path = %loaded.file_path.display(),
                "Failed to load config, using defaults: {err}"
            );
        }

        match self {
            Self::Serve(serve) => serve.run(config).await,
            Self::Expand(expand) => expand.run(config).await,
            Self::Render(render) => render.run(config).await,
        }
    }
}
