//! Fletcher-16 checksum.
//!
//! Two 8-bit accumulators reduced mod 255. The state is a plain value: every
//! update returns the next state, so partial results can be kept, compared
//! and resumed freely.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fletcher16 {
    sum1: u16,
    sum2: u16,
}

impl Fletcher16 {
    pub const fn new() -> Self {
        Self { sum1: 0, sum2: 0 }
    }

    #[must_use]
    pub const fn update(self, byte: u8) -> Self {
        let sum1 = (self.sum1 + byte as u16) % 255;
        let sum2 = (self.sum2 + sum1) % 255;
        Self { sum1, sum2 }
    }

    #[must_use]
    pub fn update_slice(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |state, &b| state.update(b))
    }

    pub const fn finalize(self) -> u16 {
        (self.sum2 << 8) | self.sum1
    }
}

/// One-shot checksum of an in-memory buffer.
pub fn checksum(bytes: &[u8]) -> u16 {
    Fletcher16::new().update_slice(bytes).finalize()
}
