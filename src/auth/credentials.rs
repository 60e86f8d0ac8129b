//! Credential storage
//!
//! Holds users and their password digests, keyed by username.

use log::debug;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
}

/// Stored proof material for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

/// In-memory credential store.
///
/// Every key maps to exactly one user and one credential, both carrying the
/// key as their username. Writers are serialized against readers.
#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: RwLock<HashMap<String, (User, Credential)>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `username`.
    pub fn put(&self, username: &str, user: User, password_hash: String) {
        let user = User {
            username: username.to_string(),
            ..user
        };
        let credential = Credential {
            username: username.to_string(),
            password_hash,
        };

        let replaced = self
            .write()
            .insert(username.to_string(), (user, credential))
            .is_some();

        if replaced {
            debug!("Replaced credentials for user {}", username);
        } else {
            debug!("Stored credentials for user {}", username);
        }
    }

    /// Returns the user and stored digest for `username`, if present.
    pub fn get(&self, username: &str) -> Option<(User, String)> {
        self.read()
            .get(username)
            .map(|(user, credential)| (user.clone(), credential.password_hash.clone()))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.read().contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, (User, Credential)>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, (User, Credential)>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
