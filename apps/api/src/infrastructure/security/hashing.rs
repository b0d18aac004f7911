use sha2::{Digest, Sha256};

/// Hex SHA-256 of `salt || value`, used for IPs and fingerprints.
pub fn hash_with_salt(value: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
