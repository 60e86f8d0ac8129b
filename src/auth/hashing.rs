//! Password hashing
//!
//! Produces the stored digest for a plaintext password.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Hashes a password into a lowercase hex SHA-256 digest.
///
/// Unsalted and unstretched: the same input always yields the same digest.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_password("secret1"), hash_password("secret1"));
    }

    #[test]
    fn test_hash_known_vector() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_shape() {
        let digest = hash_password("");
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_different_passwords_differ() {
        assert_ne!(hash_password("secret1"), hash_password("secret2"));
        assert_ne!(hash_password("a"), hash_password("A"));
    }
}
