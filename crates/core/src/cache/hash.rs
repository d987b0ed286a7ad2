//! Request-identity key generation.

use sha2::{Digest, Sha256};

/// Compute the bucket key identifying one request.
///
/// Two requests with the same method and canonical URL map to the same
/// entry; headers do not participate in identity.
pub fn request_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_stability() {
        let key1 = request_key("GET", "https://example.com/index.html");
        let key2 = request_key("GET", "https://example.com/index.html");
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_different_url() {
        let key1 = request_key("GET", "https://example.com/index.html");
        let key2 = request_key("GET", "https://example.com/app.js");
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_key_different_method() {
        let get = request_key("GET", "https://example.com/");
        let head = request_key("HEAD", "https://example.com/");
        assert_ne!(get, head);
    }

    #[test]
    fn test_key_format() {
        let key = request_key("GET", "https://example.com/");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
