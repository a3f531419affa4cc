//! Archive header section.
//!
//! Layout, all integers in host byte order:
//! - `[u32 count]`
//! - `count` records, each:
//!   - name bytes followed by one `0` terminator
//!   - `[u32 size]`
//!   - `[u16 checksum]`
//!
//! The data section starts immediately after the last record. Its offset is
//! not stored; it is whatever the sequential parse consumed.

use crate::error::{MtarError, Result};
use serde::Serialize;
use std::io::{self, Read, Write};

pub const COUNT_LEN: u64 = 4;
pub const SIZE_LEN: u64 = 4;
pub const CHECKSUM_LEN: u64 = 2;
pub const NAME_TERMINATOR: u8 = 0;
/// Longest name accepted when packing or parsing.
pub const MAX_NAME_LEN: usize = 4096;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    pub size: u32,
    pub checksum: u16,
}

impl FileRecord {
    pub fn encoded_len(&self) -> u64 {
        record_len(&self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveHeader {
    pub records: Vec<FileRecord>,
}

/// On-disk size of one record whose name is `name`.
pub fn record_len(name: &str) -> u64 {
    name.len() as u64 + 1 + SIZE_LEN + CHECKSUM_LEN
}

/// Header byte-size for a set of names, known before any data is copied.
pub fn header_len<'a>(names: impl IntoIterator<Item = &'a str>) -> u64 {
    COUNT_LEN + names.into_iter().map(record_len).sum::<u64>()
}

/// Reject names the header cannot carry or that would escape the extraction
/// directory.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MtarError::InvalidName("empty name".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(MtarError::InvalidName(format!(
            "name is {} bytes, limit is {MAX_NAME_LEN}",
            name.len()
        )));
    }
    if name.as_bytes().contains(&NAME_TERMINATOR) {
        return Err(MtarError::InvalidName(format!("{name:?} contains a NUL byte")));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(MtarError::InvalidName(format!("{name:?} is not a plain file name")));
    }
    Ok(())
}

impl ArchiveHeader {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check every record name before any entry is acted on.
    pub fn validate_names(&self) -> Result<()> {
        self.records.iter().try_for_each(|r| validate_name(&r.name))
    }

    pub fn encoded_len(&self) -> u64 {
        header_len(self.records.iter().map(|r| r.name.as_str()))
    }

    pub fn write_to(&self, mut w: impl Write) -> Result<()> {
        let count =
            u32::try_from(self.records.len()).map_err(|_| MtarError::TooManyEntries(self.len()))?;
        w.write_all(&count.to_ne_bytes())?;
        for r in &self.records {
            w.write_all(r.name.as_bytes())?;
            w.write_all(&[NAME_TERMINATOR])?;
            w.write_all(&r.size.to_ne_bytes())?;
            w.write_all(&r.checksum.to_ne_bytes())?;
        }
        Ok(())
    }

    /// Parse a header from the start of `r`. Returns the header and the
    /// number of bytes consumed, which is the data section offset.
    pub fn read_from(mut r: impl Read) -> Result<(Self, u64)> {
        let mut c4 = [0u8; 4];
        read_field(&mut r, &mut c4, "file count")?;
        let count = u32::from_ne_bytes(c4);
        let mut consumed = COUNT_LEN;

        // A corrupt count must not drive the allocation.
        let mut records = Vec::with_capacity(count.min(1024) as usize);
        for i in 0..count {
            let name = read_name(&mut r, i)?;

            let mut s4 = [0u8; 4];
            read_field(&mut r, &mut s4, "entry size")?;
            let mut c2 = [0u8; 2];
            read_field(&mut r, &mut c2, "entry checksum")?;

            let rec = FileRecord {
                name,
                size: u32::from_ne_bytes(s4),
                checksum: u16::from_ne_bytes(c2),
            };
            consumed += rec.encoded_len();
            records.push(rec);
        }

        Ok((Self { records }, consumed))
    }
}

fn read_field(r: &mut impl Read, buf: &mut [u8], what: &str) -> Result<()> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => MtarError::CorruptHeader(format!("truncated {what}")),
        _ => MtarError::Io(e),
    })
}

/// Single forward scan up to the terminator, growing the buffer as it goes.
fn read_name(r: &mut impl Read, index: u32) -> Result<String> {
    let mut name = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(0) => {
                return Err(MtarError::CorruptHeader(format!(
                    "name of entry {index} is not terminated"
                )));
            }
            Ok(_) if byte[0] == NAME_TERMINATOR => break,
            Ok(_) => {
                if name.len() == MAX_NAME_LEN {
                    return Err(MtarError::CorruptHeader(format!(
                        "name of entry {index} exceeds {MAX_NAME_LEN} bytes"
                    )));
                }
                name.push(byte[0]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    if name.is_empty() {
        return Err(MtarError::CorruptHeader(format!("entry {index} has an empty name")));
    }
    String::from_utf8(name)
        .map_err(|_| MtarError::CorruptHeader(format!("name of entry {index} is not UTF-8")))
}
