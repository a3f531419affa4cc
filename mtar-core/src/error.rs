use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MtarError {
    #[error("cannot read source file {path}: {source}")]
    SourceFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write destination {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open archive {path}: {source}")]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    #[error("corrupt data for {name}: expected {expected} bytes, archive holds {actual}")]
    CorruptData {
        name: String,
        expected: u32,
        actual: u64,
    },

    #[error("checksum mismatch for {name}: stored {stored:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        name: String,
        stored: u16,
        computed: u16,
    },

    #[error("invalid entry name: {0}")]
    InvalidName(String),

    #[error("{path} is larger than {limit} bytes")]
    SourceTooLarge { path: PathBuf, limit: u64 },

    #[error("{0} entries do not fit in the header count field")]
    TooManyEntries(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, MtarError>;
