use std::io::{self, Read};

use crate::Hasher;

/// Reader that hashes everything passing through it.
///
/// Wraps any `Read` source so the bytes are digested in the same pass that
/// consumes them.
pub struct HashingReader<R, H> {
    reader: R,
    hasher: H,
}

impl<R, H> HashingReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self { reader, hasher }
    }
}

impl<R: Read, H: Hasher> HashingReader<R, H> {
    /// Consume the reader and return the digest of all bytes read so far.
    pub fn finish(self) -> Vec<u8> {
        self.hasher.finalize()
    }
}

impl<R: Read, H: Hasher> Read for HashingReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}
