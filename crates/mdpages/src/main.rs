use clap::Parser;
use cli::{Args, RunCmd};

#[derive(Parser, Debug)]
pub enum Cmd {
    /// Display the current version.
    #[clap(name = "version")]
    Version,

    /// Run a mdpages command.
    #[clap(flatten)]
    Run(Box<RunCmd>),
}

#[derive(Parser, Debug)]
#[clap(name = "mdpages", disable_version_flag = true)]
pub struct Mdpages {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mdpages = Mdpages::parse();

    match mdpages.cmd {
        Cmd::Version => {
            println!(
                "mdpages {}, built for {}.",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::ARCH
            );
        }
        Cmd::Run(run_cmd) => {
            if let Err(e) = run_cmd.run(mdpages.args).await {
                eprintln!("error: {e:?}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
