//! Cryptographic digests over file contents.

use std::fmt;

use md5::Md5;
use sha2::{Digest, Sha256};

/// Supported digest algorithms.
///
/// Adding an algorithm is a new variant plus one match arm in
/// [`hex_digest`]; the public `digest(algorithm)` contract keeps its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the hex-encoded digest of `data` with the given algorithm.
pub fn hex_digest(algorithm: DigestAlgorithm, data: &[u8]) -> String {
    match algorithm {
        DigestAlgorithm::Md5 => hex_of::<Md5>(data),
        DigestAlgorithm::Sha256 => hex_of::<Sha256>(data),
    }
}

fn hex_of<D: Digest>(data: &[u8]) -> String {
    let mut hasher = D::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_value() {
        assert_eq!(
            hex_digest(DigestAlgorithm::Md5, b"Hello, World!"),
            "65a8e27d8879283831b664bd8b7f0ad4"
        );
    }

    #[test]
    fn test_sha256_known_value() {
        // SHA-256 of 8 zero bytes.
        assert_eq!(
            hex_digest(DigestAlgorithm::Sha256, &[0u8; 8]),
            "af5570f5a1810b7af78caf4bc70a660f0df51e42baf91d4de5b2328de0e83dfc"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = hex_digest(DigestAlgorithm::Sha256, b"payload");
        let b = hex_digest(DigestAlgorithm::Sha256, b"payload");
        assert_eq!(a, b);
        let c = hex_digest(DigestAlgorithm::Sha256, b"payload2");
        assert_ne!(a, c);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(DigestAlgorithm::Md5.as_str(), "md5");
        assert_eq!(DigestAlgorithm::Sha256.to_string(), "sha256");
    }
}
