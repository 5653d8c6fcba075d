use sha2::{Digest, Sha256};

/// Content-addressed fingerprint of raw bytes: lowercase hex SHA-256 digest.
///
/// Deterministic and fixed-length (64 chars) regardless of input size.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Fingerprint of a text submission (UTF-8 bytes).
pub fn sha256_text(text: &str) -> String {
    sha256_hex(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(sha256_text("hello world"), sha256_text("hello world"));
        assert_eq!(sha256_hex(b"\x00\x01\x02"), sha256_hex(b"\x00\x01\x02"));
    }

    #[test]
    fn test_digest_known_vector() {
        // sha256("abc")
        assert_eq!(
            sha256_text("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_length_is_fixed() {
        assert_eq!(sha256_text("").len(), 64);
        assert_eq!(sha256_text("x").len(), 64);
        assert_eq!(sha256_hex(&vec![0u8; 100_000]).len(), 64);
    }

    #[test]
    fn test_different_content_yields_different_digest() {
        assert_ne!(sha256_text("a"), sha256_text("b"));
        // text and identical raw bytes share the same digest
        assert_eq!(sha256_text("abc"), sha256_hex(b"abc"));
    }
}
