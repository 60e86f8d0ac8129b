//! Module `client`
//!
//! Defines the `Client` struct holding per-connection login state.

use std::net::SocketAddr;

use crate::auth::User;

/// State of a connected client.
///
/// `pending_username` is set by USER and consumed by PASS; `user` is set
/// once PASS succeeds.
#[derive(Debug, Default)]
pub struct Client {
    pending_username: Option<String>,
    user: Option<User>,
    client_addr: Option<SocketAddr>,
}

impl Client {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr: Some(client_addr),
            ..Self::default()
        }
    }

    /// Clears login state. The peer address is kept.
    pub fn logout(&mut self) {
        self.pending_username = None;
        self.user = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn pending_username(&self) -> Option<&str> {
        self.pending_username.as_deref()
    }

    pub fn client_addr(&self) -> Option<&SocketAddr> {
        self.client_addr.as_ref()
    }

    /// Starts a new login attempt, dropping any current login.
    pub fn set_pending_username(&mut self, username: Option<String>) {
        self.user = None;
        self.pending_username = username;
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.pending_username = None;
        self.user = user;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn test_login_flow_state() {
        let mut client = Client::default();
        client.set_pending_username(Some("alice".into()));
        assert_eq!(client.pending_username(), Some("alice"));
        assert!(!client.is_logged_in());

        client.set_user(Some(alice()));
        assert!(client.is_logged_in());
        assert!(client.pending_username().is_none());

        client.set_pending_username(Some("bob".into()));
        assert!(!client.is_logged_in());
    }

    #[test]
    fn test_logout_keeps_addr() {
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let mut client = Client::new(addr);
        client.set_user(Some(alice()));
        client.logout();
        assert!(!client.is_logged_in());
        assert_eq!(client.client_addr(), Some(&addr));
    }
}
