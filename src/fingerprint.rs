//! Content Fingerprinting
//!
//! Stable SHA-256 digests used as deduplication keys in the Analysis
//! Registry: identical document content always hashes to the same
//! fingerprint, so re-submissions update rather than duplicate.

use sha2::{Digest, Sha256};

/// Fingerprint of document text
pub fn content_fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint of several parts, length-prefixed so distinct splits
/// of the same bytes cannot collide. Used when no document content is
/// available and the submission itself must serve as the key.
pub fn composite_fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_fingerprint_is_stable() {
        let a = content_fingerprint("the same thesis text");
        let b = content_fingerprint("the same thesis text");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_different_content_differs() {
        assert_ne!(
            content_fingerprint("draft one"),
            content_fingerprint("draft two")
        );
    }

    #[test]
    fn test_composite_resists_boundary_shifts() {
        assert_ne!(
            composite_fingerprint(&["ab", "c"]),
            composite_fingerprint(&["a", "bc"])
        );
    }
}
