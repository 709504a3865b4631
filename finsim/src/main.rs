use finsim::{FinsimConfig, FinsimServer, ROUTES};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Finsim - multiplayer trading simulation server

USAGE:
    finsim [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 8080)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults (accepts dev:<name> bearer tokens)
    finsim

    # Run with config file
    finsim --config finsim.json

    # Run with custom port
    PORT=9000 finsim
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finsim=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            FinsimConfig::from_file(&path)?
        }
        None => {
            tracing::info!("Using default configuration");
            FinsimConfig::from_env()
        }
    };

    let server = FinsimServer::from_config(config)?;

    tracing::info!("Starting {}", server.config.name);
    tracing::info!("REST API: http://{}/api/", server.config.address());
    tracing::info!("Available endpoints:");
    for (method, path) in ROUTES {
        tracing::info!("  {:<5} {}", method, path);
    }

    server.run().await?;
    Ok(())
}
