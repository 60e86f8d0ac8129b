//! Server core functionality
//!
//! The listener, accept loop and startup seeding.

pub mod core;

pub use self::core::{Server, seed_users};
