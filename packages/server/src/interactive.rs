//! Interactive mode for the server.
//!
//! Prompts for bind address, port, and seeding before starting the server.

use dialoguer::{Confirm, Input};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the matching field of `defaults`. Anything the
/// user cannot answer (e.g. no terminal) keeps the default.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(defaults: ServerConfig) -> std::io::Result<()> {
    println!("Crime Portal Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let seed_fixtures = Confirm::new()
        .with_prompt("Load demo users, reports, and missing items?")
        .default(defaults.seed_fixtures)
        .interact()
        .unwrap_or(defaults.seed_fixtures);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        bind_addr,
        port,
        seed_fixtures,
    })
    .await
}
