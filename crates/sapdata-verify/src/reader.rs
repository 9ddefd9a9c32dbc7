use std::io::{self, Read};

use crate::Hasher;

/// Streaming reader that hashes data as it passes through.
pub struct VerifiedReader<R, H> {
    reader: R,
    hasher: H,
    bytes:  u64,
}

impl<R, H> VerifiedReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes: 0,
        }
    }

    /// Bytes hashed so far.
    pub fn bytes_read(&self) -> u64 { self.bytes }
}

impl<R, H: Hasher> VerifiedReader<R, H> {
    /// Consume the reader and return the lowercase hex digest.
    pub fn finish(self) -> String { hex::encode(self.hasher.finalize()) }
}

impl<R: Read, H: Hasher> Read for VerifiedReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes += n as u64;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[cfg(feature = "sha256")]
    #[test]
    fn test_verified_reader_passes_bytes_through() {
        use crate::Sha256Hasher;

        let data = b"test data for verification";
        let mut verified = VerifiedReader::new(Cursor::new(data), Sha256Hasher::new());

        let mut out = Vec::new();
        verified.read_to_end(&mut out).unwrap();

        assert_eq!(out, data);
        assert_eq!(verified.bytes_read(), data.len() as u64);

        let mut direct = Sha256Hasher::new();
        direct.update(data);
        assert_eq!(verified.finish(), hex::encode(direct.finalize()));
    }

    #[cfg(feature = "md5")]
    #[test]
    fn test_empty_input_digest() {
        use crate::Md5Hasher;

        let verified = VerifiedReader::new(Cursor::new(Vec::<u8>::new()), Md5Hasher::new());
        assert_eq!(verified.finish(), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
