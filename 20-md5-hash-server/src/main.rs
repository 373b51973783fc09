use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use md5_hash_server::{
    cli::{Cli, Command},
    client,
    config::{ClientConfig, ServerConfig},
    server::Server,
};

fn init_tracing(default_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Server(args) => {
            init_tracing("info");
            let config = ServerConfig::from(&args);
            let server = match Server::bind(&config) {
                Ok(server) => server,
                Err(err) => {
                    error!("{err}");
                    error!("check for other servers or change ports");
                    return Ok(ExitCode::FAILURE);
                }
            };
            info!("listening on {}", server.local_addr()?);
            info!("press ctrl+c to stop the server");
            if let Err(err) = server.run_until_ctrl_c().await {
                error!("server exited with error: {err}");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Client(args) => {
            init_tracing("warn");
            let config = ClientConfig::from(&args);
            if let Err(err) = client::run(&config).await {
                client::report_error(&err).await?;
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
