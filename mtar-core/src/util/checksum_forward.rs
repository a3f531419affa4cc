use crate::hash::fletcher16::Fletcher16;
use std::io::{Result, Write};

/// Write adapter that folds every byte accepted by `inner` into a running
/// Fletcher-16 state and counts it.
pub struct ChecksumForward<W: Write> {
    inner: W,
    state: Fletcher16,
    pub counted: u64,
}

impl<W: Write> ChecksumForward<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            state: Fletcher16::new(),
            counted: 0,
        }
    }

    pub fn checksum(&self) -> u16 {
        self.state.finalize()
    }
}

impl<W: Write> Write for ChecksumForward<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        // Only the prefix the inner writer accepted belongs to the stream.
        let n = self.inner.write(buf)?;
        self.state = self.state.update_slice(&buf[..n]);
        self.counted += n as u64;
        Ok(n)
    }
    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::fletcher16::checksum;

    /// Accepts at most `cap` bytes per call.
    struct Stingy {
        data: Vec<u8>,
        cap: usize,
    }

    impl Write for Stingy {
        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            let n = buf.len().min(self.cap);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn partial_writes_only_hash_accepted_bytes() {
        let mut stingy = Stingy {
            data: Vec::new(),
            cap: 3,
        };
        let mut fw = ChecksumForward::new(&mut stingy);
        fw.write_all(b"hello world").unwrap();
        assert_eq!(fw.counted, 11);
        assert_eq!(fw.checksum(), checksum(b"hello world"));
        assert_eq!(stingy.data, b"hello world");
    }
}
