use anyhow::Result;
use clap::{Parser, Subcommand};
use fixture_lifecycle::adapters::memory::InMemoryApiClient;
use fixture_lifecycle::app::config::FixtureConfig;
use fixture_lifecycle::cli;
use fixture_lifecycle::server::http;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fixturectl",
    version,
    about = "Run tests on fixtures provisioned through a resource API"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the static-data and dynamic-data cases
    Run {
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Resource API root, e.g. http://127.0.0.1:8088
        #[arg(long, env = "FIXTURE_BASE_URL")]
        base_url: Option<String>,
        /// Collection to provision fixtures under
        #[arg(long)]
        resource_path: Option<String>,
        /// Label for provisioned fixtures
        #[arg(long)]
        label: Option<String>,
        /// Run cases on separate threads
        #[arg(long)]
        parallel: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the sandbox resource API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8088")]
        addr: SocketAddr,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match args.command {
        Command::Run {
            config,
            base_url,
            resource_path,
            label,
            parallel,
            json,
        } => {
            let file_config = match config {
                Some(path) => FixtureConfig::load(&path)?,
                None => FixtureConfig::default(),
            };
            let config = file_config.with_overrides(base_url, resource_path, label);
            if !cli::run_demo_suite(&config, parallel, json)? {
                anyhow::bail!("one or more fixture cases failed");
            }
        }
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(http::serve(Arc::new(InMemoryApiClient::new()), addr))?;
        }
    }

    Ok(())
}
