mod analyze_cmd;
mod report;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use fraudscreen_config::load_and_prepare;
use fraudscreen_gateway::{start_server, GatewayState};
use fraudscreen_logging::init_logger;

#[derive(Parser)]
#[command(name = "fraudscreen")]
#[command(about = "FraudScreen — AI-assisted fraud screening for uploaded documents")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.fraudscreen/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the analysis service
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Screen one image or PDF through a running analysis service
    Analyze {
        file: PathBuf,
        /// Analyze endpoint URL (overrides config)
        #[arg(long)]
        endpoint: Option<String>,
        /// Print the raw analysis result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show whether the analysis service is up
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_and_prepare(cli.config.as_deref()).await?;

    init_logger(config.logging.dir.as_deref(), &config.logging.level);
    debug!(config = %config.redacted()?, "Configuration loaded");

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
                .parse()
                .context("Invalid bind address")?;
            info!(
                model = %config.model.model,
                base_url = %config.model.base_url,
                "Starting FraudScreen analysis service"
            );
            start_server(addr, GatewayState::from_config(&config)).await?;
        }
        Commands::Analyze {
            file,
            endpoint,
            json,
        } => {
            if let Some(endpoint) = endpoint {
                config.client.endpoint = endpoint;
            }
            analyze_cmd::run(&config.client, &file, json).await?;
        }
        Commands::Status => {
            status_cmd::run(&config.client.endpoint).await?;
        }
    }

    Ok(())
}
