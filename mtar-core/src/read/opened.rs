use crate::container::header::ArchiveHeader;
use crate::error::{MtarError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// An archive whose header has been parsed. The underlying reader sits at
/// the first byte of the data section.
pub struct Opened {
    pub header: ArchiveHeader,
    pub data_start: u64,
    pub archive_len: u64,
    reader: BufReader<File>,
}

impl Opened {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path).map_err(|source| MtarError::ArchiveUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let archive_len = f.metadata()?.len();

        let mut reader = BufReader::new(f);
        let (header, data_start) = ArchiveHeader::read_from(&mut reader)?;

        Ok(Self {
            header,
            data_start,
            archive_len,
            reader,
        })
    }

    /// Split into the header and the data-section reader.
    pub fn into_parts(self) -> (ArchiveHeader, impl Read) {
        (self.header, self.reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::header::FileRecord;
    use std::io::Write;

    #[test]
    fn missing_archive_is_unreadable() {
        let td = tempfile::tempdir().unwrap();
        let err = Opened::open(&td.path().join("absent.mtar")).err().unwrap();
        assert!(matches!(err, MtarError::ArchiveUnreadable { .. }));
    }

    #[test]
    fn reader_starts_at_data_section() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("t.mtar");
        let header = ArchiveHeader {
            records: vec![FileRecord {
                name: "x".into(),
                size: 4,
                checksum: 0,
            }],
        };
        let mut f = File::create(&p).unwrap();
        header.write_to(&mut f).unwrap();
        f.write_all(b"DATA").unwrap();
        drop(f);

        let opened = Opened::open(&p).unwrap();
        assert_eq!(opened.data_start, header.encoded_len());
        assert_eq!(opened.archive_len, opened.data_start + 4);
        let (h, mut r) = opened.into_parts();
        assert_eq!(h, header);
        let mut rest = Vec::new();
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"DATA");
    }
}
