//! Bounded stream copy with a rolling checksum.

use crate::error::Result;
use crate::util::checksum_forward::ChecksumForward;
use serde::Serialize;
use std::io::{ErrorKind, Read, Write};

const COPY_BUF_LEN: usize = 1 << 16;

/// Outcome of a bounded copy. `bytes` may be short of the requested limit
/// when the source ran dry; that is not an error here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Copied {
    pub bytes: u64,
    pub checksum: u16,
}

/// Copy up to `max_bytes` from `src` into `dst`, stopping early at end of
/// stream. Never reads past `max_bytes`, so `src` is left positioned right
/// after the copied region.
pub fn copy_with_checksum<R, W>(src: &mut R, dst: &mut W, max_bytes: u64) -> Result<Copied>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut fw = ChecksumForward::new(dst);
    let mut buf = vec![0u8; COPY_BUF_LEN];
    let mut left = max_bytes;

    while left > 0 {
        let want = buf.len().min(usize::try_from(left).unwrap_or(usize::MAX));
        let n = match src.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        fw.write_all(&buf[..n])?;
        left -= n as u64;
    }

    Ok(Copied {
        bytes: fw.counted,
        checksum: fw.checksum(),
    })
}
