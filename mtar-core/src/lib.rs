#![forbid(unsafe_code)]

pub mod error;

pub mod hash {
    pub mod fletcher16;
}

pub mod util {
    pub mod checksum_forward;
    pub mod copy;
}

pub mod container {
    pub mod header;
}

pub mod pack {
    pub mod writer;
}

pub mod read {
    pub mod check;
    pub mod extract;
    pub mod opened;
}

pub mod list;

// Re-exports: stable API surface
pub use container::header::{ArchiveHeader, FileRecord};
pub use error::{MtarError, Result};
pub use hash::fletcher16::{Fletcher16, checksum};
pub use list::{Listing, list};
pub use pack::writer::{PackPlan, PackReport, pack, pack_into, pack_streaming};
pub use read::check::EntryCheck;
pub use read::extract::{
    ExtractOptions, ExtractReport, VerifyReport, extract, extract_from, verify, verify_from,
};
pub use util::copy::{Copied, copy_with_checksum};
