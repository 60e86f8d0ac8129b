//! Client registry
//!
//! Tracks connected peers so the server can enforce its client limit.

use log::debug;
use std::collections::HashSet;
use std::net::SocketAddr;

/// Registry of connected peer addresses
#[derive(Debug)]
pub struct ClientRegistry {
    clients: HashSet<SocketAddr>,
    max_clients: usize,
}

impl ClientRegistry {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashSet::new(),
            max_clients,
        }
    }

    /// Registers `addr` unless the registry is full. Returns whether it was admitted.
    pub fn try_insert(&mut self, addr: SocketAddr) -> bool {
        if self.clients.len() >= self.max_clients {
            debug!("Rejecting {}: {} clients connected", addr, self.clients.len());
            return false;
        }
        self.clients.insert(addr);
        true
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> bool {
        self.clients.remove(addr)
    }

    pub fn contains(&self, addr: &SocketAddr) -> bool {
        self.clients.contains(addr)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }
}
