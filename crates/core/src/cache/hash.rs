//! Content digests for cached documents.

use sha2::{Digest, Sha256};

/// SHA-256 of sanitized document content, hex encoded.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
