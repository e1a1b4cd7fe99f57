//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{Rng, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Uniformly pick a number in `low..=high` from the OS RNG
pub fn random_in_range(low: u32, high: u32) -> u32 {
    OsRng.gen_range(low..=high)
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Short, non-reversible tag for correlating sensitive values in logs
///
/// First 9 bytes of SHA-256, URL-safe base64 (12 characters).
pub fn log_digest(data: &[u8]) -> String {
    let hash = sha256(data);
    general_purpose::URL_SAFE_NO_PAD.encode(&hash[..9])
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_random_in_range_bounds() {
        for _ in 0..1_000 {
            let n = random_in_range(100_000, 999_999);
            assert!((100_000..=999_999).contains(&n));
        }
        assert_eq!(random_in_range(7, 7), 7);
    }

    #[test]
    fn test_log_digest() {
        let a = log_digest(b"a@b.com");
        assert_eq!(a.len(), 12);
        assert_eq!(a, log_digest(b"a@b.com"));
        assert_ne!(a, log_digest(b"c@d.com"));
        assert!(!a.contains("a@b.com"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"482913", b"482913"));
        assert!(!constant_time_eq(b"482913", b"482914"));
        assert!(!constant_time_eq(b"482913", b"48291"));
        assert!(!constant_time_eq(b"482913", b" 482913"));
    }
}
