//! Block and payload digests.

use sha2::{Digest, Sha256};

/// Algorithm label used in `WARC-Block-Digest` and `WARC-Payload-Digest`.
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Returns `sha256:<lowercase hex>` for `data`.
#[must_use]
pub fn sha256_label(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{DIGEST_ALGORITHM}:{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            sha256_label(b""),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_differs_per_input() {
        assert_ne!(sha256_label(b"a"), sha256_label(b"b"));
        assert!(sha256_label(b"abc").starts_with("sha256:"));
        assert_eq!(sha256_label(b"abc").len(), "sha256:".len() + 64);
    }
}
