//! RAX Auth Server - Entry Point
//!
//! A line-protocol front end for an in-memory credential store.

use log::info;
use std::process::ExitCode;
use std::sync::Arc;

use rax_auth_server::auth::{Authenticator, CredentialStore};
use rax_auth_server::config::ServerConfig;
use rax_auth_server::error::ServerError;
use rax_auth_server::error::handlers::handle_error;
use rax_auth_server::server::{Server, seed_users};
use rax_auth_server::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Launching auth server...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;

    let store = Arc::new(CredentialStore::new());
    let authenticator = Arc::new(Authenticator::new(store, config.startup.input_limits()));
    let seeded = seed_users(&authenticator, &config.users)?;
    info!("Seeded {} users", seeded);

    let server = Server::bind(&config.startup, authenticator).await?;
    server.run().await;
    Ok(())
}
