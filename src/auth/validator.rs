//! Authentication validator
//!
//! Registers users into the credential store and verifies username/password
//! pairs against it.

use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::credentials::{CredentialStore, User};
use super::hashing::hash_password;
use crate::error::AuthError;

/// Length limits applied to credentials before they reach the store.
#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_username_length: usize,
    pub max_password_length: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_username_length: 32,
            max_password_length: 128,
        }
    }
}

/// Rejects blank, oversized or line-breaking input.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

fn validate_username(username: &str, limits: &InputLimits) -> Result<(), AuthError> {
    if !is_valid_input(username, limits.max_username_length) {
        return Err(AuthError::MalformedInput("Invalid username format".into()));
    }

    if username.contains(['@', '#', ',', '%'])
        || username.contains(char::is_whitespace)
        || username.starts_with(char::is_numeric)
    {
        return Err(AuthError::InvalidUsername(username.to_string()));
    }

    Ok(())
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

/// Verifies credentials against a shared [`CredentialStore`].
#[derive(Debug)]
pub struct Authenticator {
    store: Arc<CredentialStore>,
    limits: InputLimits,
    next_id: AtomicU64,
}

impl Authenticator {
    pub fn new(store: Arc<CredentialStore>, limits: InputLimits) -> Self {
        Self {
            store,
            limits,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Registers `username`, hashing `password` once for storage.
    ///
    /// An existing entry for the same username is replaced, so its old
    /// password stops working.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User, AuthError> {
        validate_username(username, &self.limits)?;
        validate_email(email)?;
        if !is_valid_input(password, self.limits.max_password_length) {
            return Err(AuthError::MalformedInput("Invalid password format".into()));
        }
        // The line protocol trims arguments, so such a password could never log in.
        if password.trim() != password {
            return Err(AuthError::MalformedInput(
                "Password cannot start or end with whitespace".into(),
            ));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            username: username.to_string(),
            email: email.to_string(),
        };
        self.store
            .put(username, user.clone(), hash_password(password));

        info!("Registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Returns the user only when `password` hashes to the stored digest.
    ///
    /// Unknown usernames, malformed usernames and wrong passwords all yield
    /// `None`.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<User> {
        if !is_valid_input(username, self.limits.max_username_length) {
            warn!("Authentication failed for malformed username");
            return None;
        }

        let user = match self.store.get(username) {
            Some((user, stored_hash)) if stored_hash == hash_password(password) => Some(user),
            _ => None,
        };

        match &user {
            Some(user) => info!("User {} authenticated", user.username),
            None => warn!("Authentication failed for user {}", username),
        }
        user
    }
}
