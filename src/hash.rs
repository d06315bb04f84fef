// Hashing module: the single digest primitive the rest of the crate
// builds on. Files are identified by the SHA-256 of their *path*, not
// their content, so the same path always maps to the same CDN key.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the UTF-8 bytes of `input`.
///
/// Pure and deterministic: the transfer log relies on this both for the
/// primary file identity and for collision-breaking (where the input is
/// the path concatenated with a fresh timestamp string).
pub fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest("notes.txt"), digest("notes.txt"));
        assert_ne!(digest("notes.txt"), digest("notes.txt "));
    }

    #[test]
    fn digest_is_fixed_length_hex() {
        for input in ["", "a", "photo.png", "some/long/nested/path.tar.gz"] {
            let d = digest(input);
            assert_eq!(d.len(), 64);
            assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn digest_matches_known_vectors() {
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest("notes.txt"),
            "e39538e7f27a7bf579cd9b85a103c0f0b86b60b788534295538d0301a9c5dce6"
        );
    }
}
