#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime portal API server binary.
//!
//! ```text
//! crime_portal_server [--bind 0.0.0.0] [--port 9000] [--no-seed]
//! crime_portal_server --interactive
//! ```
//!
//! Flags override the `BIND_ADDR`, `PORT`, and `SEED_FIXTURES` environment
//! variables.

use clap::Parser;
use crime_portal_server::{ServerConfig, interactive, run_server};

#[derive(Parser)]
#[command(name = "crime_portal_server", about = "Serve the crime portal API")]
struct Cli {
    /// Prompt for the bind address, port, and seeding before starting
    #[arg(short, long)]
    interactive: bool,
    /// Interface to bind
    #[arg(long)]
    bind: Option<String>,
    /// TCP port
    #[arg(long)]
    port: Option<u16>,
    /// Start with empty stores instead of the demo fixtures
    #[arg(long)]
    no_seed: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.no_seed {
        config.seed_fixtures = false;
    }

    if cli.interactive {
        return interactive::run(config).await;
    }

    run_server(config).await
}
