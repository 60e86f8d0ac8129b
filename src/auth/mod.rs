//! Authentication system
//!
//! Credential storage, password hashing and credential verification.

pub mod credentials;
pub mod hashing;
pub mod validator;

pub use credentials::{Credential, CredentialStore, User};
pub use hashing::hash_password;
pub use validator::{Authenticator, InputLimits};
