use crate::container::header::FileRecord;
use crate::error::Result;
use crate::read::opened::Opened;
use serde::Serialize;
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct Listing {
    pub records: Vec<FileRecord>,
    /// Offset of the first data byte, i.e. the parsed header length.
    pub data_start: u64,
    pub archive_len: u64,
}

impl Listing {
    /// Data bytes the header promises minus what the file actually holds.
    /// Positive means the archive is truncated.
    pub fn missing_bytes(&self) -> i128 {
        let declared: u64 = self.records.iter().map(|r| u64::from(r.size)).sum();
        let present = self.archive_len.saturating_sub(self.data_start);
        i128::from(declared) - i128::from(present)
    }
}

/// Read only the header of `archive`.
pub fn list(archive: &Path) -> Result<Listing> {
    let opened = Opened::open(archive)?;
    Ok(Listing {
        data_start: opened.data_start,
        archive_len: opened.archive_len,
        records: opened.header.records,
    })
}
