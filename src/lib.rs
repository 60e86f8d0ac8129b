pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod utils;

pub use auth::{Authenticator, CredentialStore, User, hash_password};
pub use server::Server;
