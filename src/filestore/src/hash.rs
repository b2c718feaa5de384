//! Credential hashing

use sha3::{Digest, Sha3_512};

/// Turns a plaintext password into the string stored in the users resource
///
/// The output must not contain `:` or line breaks.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;

    /// Compare a password against a stored hash
    fn verify(&self, password: &str, stored: &str) -> bool {
        self.hash(password) == stored
    }
}

/// Unsalted SHA3-512, hex encoded
///
/// Matches what the legacy store did (a bare digest of the password). Swap
/// in a salted KDF through [`FileUserStore::with_hasher`] for real
/// deployments.
///
/// [`FileUserStore::with_hasher`]: crate::FileUserStore::with_hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha3PasswordHasher;

impl PasswordHasher for Sha3PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let mut hasher = Sha3_512::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_hash_shape() {
        let hash = Sha3PasswordHasher.hash("secret");
        assert_eq!(hash.len(), 128);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!hash.contains(':'));
    }

    #[test]
    fn test_sha3_hash_is_deterministic() {
        let hasher = Sha3PasswordHasher;
        assert_eq!(hasher.hash("secret"), hasher.hash("secret"));
        assert_ne!(hasher.hash("secret"), hasher.hash("Secret"));
    }

    #[test]
    fn test_verify() {
        let hasher = Sha3PasswordHasher;
        let stored = hasher.hash("hunter2");
        assert!(hasher.verify("hunter2", &stored));
        assert!(!hasher.verify("hunter3", &stored));
    }

    #[test]
    fn test_empty_password_hashes() {
        // SHA3-512 of the empty string
        assert!(Sha3PasswordHasher
            .hash("")
            .starts_with("a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6"));
    }
}
