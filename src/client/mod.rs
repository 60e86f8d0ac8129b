//! Client management system
//!
//! Handles client connections, login state, and the connected-client registry.

pub mod handler;
pub mod registry;
pub mod state;

pub use handler::handle_client;
pub use registry::ClientRegistry;
pub use state::Client;
