//! EVC CLI - Command line tool for election poll charts and vote-count spreadsheets.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "evc-cli",
    version,
    about = "Election poll trends and vote-count toolkit"
)]
struct Cli {
    #[command(flatten)]
    api: evc_cmd::ApiArgs,

    #[command(subcommand)]
    command: evc_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads API_URL from the environment
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }
    let cli = Cli::parse();
    evc_cmd::run(cli.command, &cli.api).await
}
