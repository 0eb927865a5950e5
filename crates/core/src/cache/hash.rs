//! Cache key generation for request identities.

use sha2::{Digest, Sha256};

/// Compute the storage key for a request identity (method + URL).
pub fn compute_request_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_request_key("GET", "http://localhost:3000/");
        let hash2 = compute_request_key("GET", "http://localhost:3000/");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_method_case_insensitive() {
        let upper = compute_request_key("GET", "http://localhost:3000/");
        let lower = compute_request_key("get", "http://localhost:3000/");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_hash_different_query() {
        let old = compute_request_key("GET", "http://localhost:3000/styles.css?v=20250427_8");
        let new = compute_request_key("GET", "http://localhost:3000/styles.css?v=20250427_9");
        assert_ne!(old, new);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_request_key("GET", "http://localhost:3000/");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
