//! Hash algorithm selection and expected-checksum parsing.

use std::fmt;
use std::str::FromStr;

use crate::hasher::AnyHasher;
use crate::{Result, VerifyError};

/// Supported hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5, used by the historical sample catalog.
    Md5,
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn digest_length(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha256 => 32,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Guess the algorithm from the length of a bare hex digest.
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            32 => Some(HashAlgorithm::Md5),
            64 => Some(HashAlgorithm::Sha256),
            _ => None,
        }
    }

    /// Fresh accumulator for this algorithm.
    pub fn hasher(&self) -> Result<AnyHasher> {
        match self {
            #[cfg(feature = "md5")]
            HashAlgorithm::Md5 => Ok(AnyHasher::Md5(Default::default())),
            #[cfg(feature = "sha256")]
            HashAlgorithm::Sha256 => Ok(AnyHasher::Sha256(Default::default())),
            #[allow(unreachable_patterns)]
            other => Err(VerifyError::UnsupportedAlgorithm(other.as_str().to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for HashAlgorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(VerifyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// An expected digest: algorithm plus lowercase hex value.
///
/// Accepts `"<algo>:<hex>"` or a bare hex string, in which case the
/// algorithm is inferred from its length (32 chars for MD5, 64 for SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    algorithm: HashAlgorithm,
    hex:       String,
}

impl Checksum {
    pub fn new(algorithm: HashAlgorithm, hex: &str) -> Result<Self> {
        let hex = hex.trim().to_ascii_lowercase();
        if hex.len() != algorithm.digest_length() * 2 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerifyError::InvalidChecksum(format!("{algorithm}:{hex}")));
        }
        Ok(Self { algorithm, hex })
    }

    pub fn md5(hex: &str) -> Result<Self> { Self::new(HashAlgorithm::Md5, hex) }

    pub fn sha256(hex: &str) -> Result<Self> { Self::new(HashAlgorithm::Sha256, hex) }

    pub fn algorithm(&self) -> HashAlgorithm { self.algorithm }

    pub fn hex(&self) -> &str { &self.hex }

    /// Compare against a computed hex digest, ignoring case.
    pub fn matches(&self, actual_hex: &str) -> bool { self.hex.eq_ignore_ascii_case(actual_hex) }
}

impl FromStr for Checksum {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((algo, hex)) => Self::new(algo.parse()?, hex),
            None => {
                let algorithm = HashAlgorithm::from_hex_len(s.len())
                    .ok_or_else(|| VerifyError::InvalidChecksum(s.to_string()))?;
                Self::new(algorithm, s)
            }
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_hex_is_classified_by_length() {
        let md5: Checksum = "4fa7669901cfeef410429be8640b594a".parse().unwrap();
        assert_eq!(md5.algorithm(), HashAlgorithm::Md5);

        let sha: Checksum = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
            .parse()
            .unwrap();
        assert_eq!(sha.algorithm(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_prefixed_checksum() {
        let c: Checksum = "MD5:4FA7669901CFEEF410429BE8640B594A".parse().unwrap();
        assert_eq!(c.algorithm(), HashAlgorithm::Md5);
        assert_eq!(c.hex(), "4fa7669901cfeef410429be8640b594a");
        assert_eq!(c.to_string(), "md5:4fa7669901cfeef410429be8640b594a");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!("abc".parse::<Checksum>(), Err(VerifyError::InvalidChecksum(_))));
        assert!(matches!(
            "md5:zz a7669901cfeef410429be8640b594a".parse::<Checksum>(),
            Err(VerifyError::InvalidChecksum(_))
        ));
        assert!(matches!(
            "crc32:deadbeef".parse::<Checksum>(),
            Err(VerifyError::UnsupportedAlgorithm(_))
        ));
        assert!(Checksum::sha256("4fa7669901cfeef410429be8640b594a").is_err());
    }

    #[test]
    fn test_matches_ignores_case() {
        let c = Checksum::md5("4fa7669901cfeef410429be8640b594a").unwrap();
        assert!(c.matches("4FA7669901CFEEF410429BE8640B594A"));
        assert!(!c.matches("00000000000000000000000000000000"));
    }
}
