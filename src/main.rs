use clap::Parser;
use dotenvy::dotenv;
use remote_power::{client, logging, server, Cli, Command};
use tracing::debug;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    let args = Cli::parse();

    logging::init(args.log_level)?;
    debug!(?args);

    match args.command {
        Command::Run(args) => server::launch(args).await?,
        Command::Client(args) => client::client(args).await?,
    }

    Ok(())
}
