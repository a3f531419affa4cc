use crate::container::header::{ArchiveHeader, FileRecord};
use crate::error::{MtarError, Result};
use crate::read::check::EntryCheck;
use crate::read::opened::Opened;
use crate::util::copy::{Copied, copy_with_checksum};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Treat a checksum mismatch as fatal instead of reporting it.
    pub strict: bool,
    /// Refuse to replace files that already exist in the destination.
    pub keep_existing: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ExtractReport {
    pub entries: Vec<EntryCheck>,
}

impl ExtractReport {
    pub fn mismatches(&self) -> impl Iterator<Item = &EntryCheck> {
        self.entries.iter().filter(|c| !c.is_ok())
    }

    pub fn all_ok(&self) -> bool {
        self.entries.iter().all(EntryCheck::is_ok)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct VerifyReport {
    pub entries: Vec<EntryCheck>,
    /// Bytes found after the last entry's data.
    pub trailing_bytes: u64,
}

impl VerifyReport {
    pub fn all_ok(&self) -> bool {
        self.entries.iter().all(EntryCheck::is_ok)
    }
}

/// Copy exactly `record.size` bytes of the data section into `dst`. A short
/// copy means the archive is truncated.
fn copy_entry<R, W>(data: &mut R, dst: &mut W, record: &FileRecord) -> Result<Copied>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let copied = copy_with_checksum(data, dst, u64::from(record.size))?;
    if copied.bytes < u64::from(record.size) {
        return Err(MtarError::CorruptData {
            name: record.name.clone(),
            expected: record.size,
            actual: copied.bytes,
        });
    }
    Ok(copied)
}

/// Stream one entry into `out` through a buffer. Bytes already copied are
/// flushed even when the archive ran short; the copy error wins over a
/// flush error.
fn write_entry<R, W>(data: &mut R, out: W, record: &FileRecord) -> Result<Copied>
where
    R: Read + ?Sized,
    W: Write,
{
    let mut out = BufWriter::new(out);
    let copied = copy_entry(data, &mut out, record);
    let flushed = out.flush();
    let copied = copied?;
    flushed?;
    Ok(copied)
}

fn check_entry(index: usize, record: &FileRecord, copied: Copied) -> EntryCheck {
    let check = EntryCheck::new(record, copied.checksum);
    if check.is_ok() {
        info!(
            index,
            name = %record.name,
            size = record.size,
            checksum = format_args!("{:#06x}", check.computed),
            "entry verified"
        );
    } else {
        warn!(
            index,
            name = %record.name,
            stored = format_args!("{:#06x}", check.stored),
            computed = format_args!("{:#06x}", check.computed),
            "checksum mismatch"
        );
    }
    check
}

fn create_dest(path: &Path, keep_existing: bool) -> Result<File> {
    let mut oo = OpenOptions::new();
    oo.write(true);
    if keep_existing {
        oo.create_new(true);
    } else {
        oo.create(true).truncate(true);
    }
    oo.open(path).map_err(|source| MtarError::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract every entry of `archive` into `dest`.
///
/// Entries are written in header order. A checksum mismatch is reported in
/// the returned [`ExtractReport`] and extraction continues, unless
/// [`ExtractOptions::strict`] is set. A truncated data section aborts with
/// [`MtarError::CorruptData`], leaving the current entry's file short.
pub fn extract(
    archive: &Path,
    dest: &Path,
    opts: Option<&ExtractOptions>,
) -> Result<ExtractReport> {
    let opened = Opened::open(archive)?;
    let (header, mut data) = opened.into_parts();
    extract_from(&header, &mut data, dest, opts)
}

/// Extract from an already parsed header and a reader positioned at the
/// start of the data section.
pub fn extract_from<R: Read + ?Sized>(
    header: &ArchiveHeader,
    data: &mut R,
    dest: &Path,
    opts: Option<&ExtractOptions>,
) -> Result<ExtractReport> {
    let opts = opts.cloned().unwrap_or_default();
    header.validate_names()?;
    fs::create_dir_all(dest).map_err(|source| MtarError::DestinationUnwritable {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut report = ExtractReport::default();
    for (i, record) in header.records.iter().enumerate() {
        let path = dest.join(&record.name);
        let out = create_dest(&path, opts.keep_existing)?;
        let copied = write_entry(data, out, record)?;

        let check = check_entry(i, record, copied);
        if opts.strict {
            if let Some(err) = check.to_error() {
                return Err(err);
            }
        }
        report.entries.push(check);
    }
    Ok(report)
}

/// Recompute every entry's checksum without writing any files.
pub fn verify(archive: &Path) -> Result<VerifyReport> {
    let opened = Opened::open(archive)?;
    let (header, mut data) = opened.into_parts();
    verify_from(&header, &mut data)
}

pub fn verify_from<R: Read + ?Sized>(
    header: &ArchiveHeader,
    data: &mut R,
) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();
    for (i, record) in header.records.iter().enumerate() {
        let copied = copy_entry(data, &mut io::sink(), record)?;
        report.entries.push(check_entry(i, record, copied));
    }

    report.trailing_bytes = io::copy(data, &mut io::sink())?;
    if report.trailing_bytes > 0 {
        warn!(
            trailing = report.trailing_bytes,
            "archive has bytes after the last entry"
        );
    }
    Ok(report)
}
