use crate::container::header::{ArchiveHeader, FileRecord, header_len, validate_name};
use crate::error::{MtarError, Result};
use crate::util::copy::copy_with_checksum;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Largest entry the 4-byte size field can describe.
pub const MAX_ENTRY_LEN: u64 = u32::MAX as u64;

#[derive(Clone, Debug)]
struct PlannedEntry {
    name: String,
    source: PathBuf,
}

/// First phase of packing: names and header size, fixed before any source
/// is read.
#[derive(Clone, Debug)]
pub struct PackPlan {
    entries: Vec<PlannedEntry>,
    header_len: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct PackReport {
    pub archive: PathBuf,
    pub header_len: u64,
    pub records: Vec<FileRecord>,
}

impl PackReport {
    pub fn archive_len(&self) -> u64 {
        self.header_len
            + self
                .records
                .iter()
                .map(|r| u64::from(r.size))
                .sum::<u64>()
    }
}

fn entry_name(path: &Path) -> Result<String> {
    let base = path
        .file_name()
        .ok_or_else(|| MtarError::InvalidName(format!("{} has no file name", path.display())))?;
    let name = base.to_str().ok_or_else(|| {
        MtarError::InvalidName(format!("{} is not valid UTF-8", path.display()))
    })?;
    validate_name(name)?;
    Ok(name.to_string())
}

fn open_source(path: &Path) -> Result<File> {
    let unreadable = |source| MtarError::SourceFileUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let f = File::open(path).map_err(unreadable)?;
    let meta = f.metadata().map_err(unreadable)?;
    if !meta.is_file() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    Ok(f)
}

impl PackPlan {
    pub fn new<P: AsRef<Path>>(sources: &[P]) -> Result<Self> {
        if u32::try_from(sources.len()).is_err() {
            return Err(MtarError::TooManyEntries(sources.len()));
        }
        let entries = sources
            .iter()
            .map(|p| {
                let source = p.as_ref().to_path_buf();
                Ok(PlannedEntry {
                    name: entry_name(&source)?,
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let header_len = header_len(entries.iter().map(|e| e.name.as_str()));
        debug!(entries = entries.len(), header_len, "planned archive layout");
        Ok(Self {
            entries,
            header_len,
        })
    }

    pub fn header_len(&self) -> u64 {
        self.header_len
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Second phase: stream every source, in plan order, into `data` and
    /// return the completed header. Each source is closed before the next
    /// one is opened.
    pub fn write_data<W: Write + ?Sized>(&self, data: &mut W) -> Result<ArchiveHeader> {
        let mut records = Vec::with_capacity(self.entries.len());
        for (i, e) in self.entries.iter().enumerate() {
            let mut src = BufReader::new(open_source(&e.source)?);
            // One byte past the limit tells an oversized source apart from one
            // that is exactly u32::MAX long.
            let copied = copy_with_checksum(&mut src, data, MAX_ENTRY_LEN + 1)?;
            let size = u32::try_from(copied.bytes).map_err(|_| MtarError::SourceTooLarge {
                path: e.source.clone(),
                limit: MAX_ENTRY_LEN,
            })?;
            info!(
                index = i,
                name = %e.name,
                size,
                checksum = format_args!("{:#06x}", copied.checksum),
                "added entry"
            );
            records.push(FileRecord {
                name: e.name.clone(),
                size,
                checksum: copied.checksum,
            });
        }
        Ok(ArchiveHeader { records })
    }
}

/// Reserve the header, write the data section after it, then rewind and
/// commit the header over the reserved bytes.
pub fn pack_into<W: Write + Seek>(plan: &PackPlan, out: &mut W) -> Result<ArchiveHeader> {
    out.seek(SeekFrom::Start(plan.header_len()))?;
    let header = {
        let mut data = BufWriter::new(&mut *out);
        let header = plan.write_data(&mut data)?;
        data.flush()?;
        header
    };

    out.seek(SeekFrom::Start(0))?;
    header.write_to(&mut *out)?;
    let committed = out.stream_position()?;
    debug_assert_eq!(
        committed,
        plan.header_len(),
        "committed header overran its reservation"
    );
    out.flush()?;
    Ok(header)
}

/// For sinks that cannot seek: spool the data section to an anonymous temp
/// file, then emit header followed by data.
pub fn pack_streaming<W: Write>(plan: &PackPlan, mut out: W) -> Result<ArchiveHeader> {
    let mut spool = tempfile::tempfile()?;
    let header = {
        let mut data = BufWriter::new(&mut spool);
        let header = plan.write_data(&mut data)?;
        data.flush()?;
        header
    };
    debug_assert_eq!(header.encoded_len(), plan.header_len());

    header.write_to(&mut out)?;
    spool.seek(SeekFrom::Start(0))?;
    io::copy(&mut spool, &mut out)?;
    out.flush()?;
    Ok(header)
}

/// Temp file beside `out` that ends up with the mode a plain create would
/// give, or with the mode of the archive it replaces.
fn staging_file(dir: &Path, out: &Path) -> io::Result<tempfile::NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".mtar-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Subject to the umask, like any other newly created file.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;
    if let Ok(existing) = fs::metadata(out) {
        fs::set_permissions(tmp.path(), existing.permissions())?;
    }
    Ok(tmp)
}

/// Pack `sources` into a new archive at `out`.
///
/// The archive is assembled in a temporary file beside `out` and only moved
/// into place once the header is committed, so a failed pack never leaves a
/// half-written archive behind.
pub fn pack<P: AsRef<Path>>(sources: &[P], out: &Path) -> Result<PackReport> {
    let plan = PackPlan::new(sources)?;

    let unwritable = |source| MtarError::DestinationUnwritable {
        path: out.to_path_buf(),
        source,
    };
    let dir = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = staging_file(dir, out).map_err(unwritable)?;

    let header = pack_into(&plan, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(out).map_err(|e| unwritable(e.error))?;

    info!(
        archive = %out.display(),
        entries = header.len(),
        "archive written"
    );
    Ok(PackReport {
        archive: out.to_path_buf(),
        header_len: plan.header_len(),
        records: header.records,
    })
}
