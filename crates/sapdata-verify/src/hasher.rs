use digest::Digest;

/// Incremental hash accumulator.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

/// Any [`Digest`] from the RustCrypto family.
pub struct DigestHasher<D: Digest + Send>(D);

impl<D: Digest + Send> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }
}

impl<D: Digest + Send> Default for DigestHasher<D> {
    fn default() -> Self { Self::new() }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

#[cfg(feature = "md5")]
pub type Md5Hasher = DigestHasher<md5::Md5>;

#[cfg(feature = "sha256")]
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

/// Hasher selected at runtime from a [`crate::HashAlgorithm`].
pub enum AnyHasher {
    #[cfg(feature = "md5")]
    Md5(Md5Hasher),
    #[cfg(feature = "sha256")]
    Sha256(Sha256Hasher),
}

impl Hasher for AnyHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            #[cfg(feature = "md5")]
            Self::Md5(h) => h.update(data),
            #[cfg(feature = "sha256")]
            Self::Sha256(h) => h.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            #[cfg(feature = "md5")]
            Self::Md5(h) => h.finalize(),
            #[cfg(feature = "sha256")]
            Self::Sha256(h) => h.finalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "md5")]
    #[test]
    fn test_md5_known_vector() {
        let mut hasher = Md5Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hex::encode(hasher.finalize()), "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[cfg(feature = "sha256")]
    #[test]
    fn test_sha256_known_vector() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello world");
        assert_eq!(
            hex::encode(hasher.finalize()),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
