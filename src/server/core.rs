use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::auth::Authenticator;
use crate::client::{ClientRegistry, handle_client};
use crate::config::{SeedUser, StartupConfig};
use crate::error::AuthError;
use crate::protocol::responses::{self, format_response};

pub struct Server {
    client_registry: Arc<Mutex<ClientRegistry>>,
    authenticator: Arc<Authenticator>,
    listener: TcpListener,
    max_command_length: usize,
}

impl Server {
    /// Binds the control socket described by `config`.
    pub async fn bind(
        config: &StartupConfig,
        authenticator: Arc<Authenticator>,
    ) -> Result<Self, std::io::Error> {
        let socket = config.control_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        Ok(Self {
            client_registry: Arc::new(Mutex::new(ClientRegistry::new(config.max_clients))),
            authenticator,
            listener,
            max_command_length: config.max_command_length,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per client.
    pub async fn run(&self) {
        let max_clients = self.client_registry.lock().await.max_clients();
        match self.local_addr() {
            Ok(addr) => info!("Starting Rax auth server on {} (max {} clients)", addr, max_clients),
            Err(e) => warn!("Starting Rax auth server on unknown address: {}", e),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let authenticator = Arc::clone(&self.authenticator);
                    let max_command_length = self.max_command_length;

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_client(
                            stream,
                            addr,
                            client_registry,
                            authenticator,
                            max_command_length,
                        )
                        .await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Admits a client if there is room, runs its session, then unregisters it.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: Arc<Mutex<ClientRegistry>>,
    authenticator: Arc<Authenticator>,
    max_command_length: usize,
) -> Result<(), std::io::Error> {
    {
        let mut clients = client_registry.lock().await;
        if !clients.try_insert(client_addr) {
            drop(clients);
            stream
                .write_all(
                    format_response(
                        responses::SERVICE_UNAVAILABLE,
                        "Too many connections. Try again later.",
                    )
                    .as_bytes(),
                )
                .await?;
            return Ok(());
        }
        info!(
            "Accepted client: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            clients.max_clients()
        );
    }

    let result = handle_client(stream, client_addr, authenticator, max_command_length).await;

    client_registry.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);
    result
}

/// Registers the configured seed users. Stops at the first invalid entry.
pub fn seed_users(authenticator: &Authenticator, users: &[SeedUser]) -> Result<usize, AuthError> {
    for seed in users {
        authenticator.register(&seed.username, &seed.email, &seed.password)?;
    }
    Ok(users.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialStore, InputLimits};

    fn seed(username: &str, email: &str) -> SeedUser {
        SeedUser {
            username: username.into(),
            email: email.into(),
            password: "pw".into(),
        }
    }

    #[test]
    fn test_seed_users() {
        let auth = Authenticator::new(Arc::new(CredentialStore::new()), InputLimits::default());
        let users = vec![seed("alice", "alice@example.com"), seed("bob", "bob@example.com")];
        assert_eq!(seed_users(&auth, &users).unwrap(), 2);
        assert!(auth.authenticate("bob", "pw").is_some());
    }

    #[test]
    fn test_seed_users_rejects_invalid() {
        let auth = Authenticator::new(Arc::new(CredentialStore::new()), InputLimits::default());
        let users = vec![seed("alice", "bad-email")];
        assert!(seed_users(&auth, &users).is_err());
    }
}
