use serde::Serialize;

use crate::container::header::FileRecord;
use crate::error::MtarError;

/// Checksum outcome for one entry of an archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryCheck {
    pub name: String,
    pub size: u32,
    pub stored: u16,
    pub computed: u16,
}

impl EntryCheck {
    pub fn new(record: &FileRecord, computed: u16) -> Self {
        Self {
            name: record.name.clone(),
            size: record.size,
            stored: record.checksum,
            computed,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.stored == self.computed
    }

    pub fn to_error(&self) -> Option<MtarError> {
        (!self.is_ok()).then(|| MtarError::ChecksumMismatch {
            name: self.name.clone(),
            stored: self.stored,
            computed: self.computed,
        })
    }
}

/// First mismatch in `checks`, as an error.
pub fn first_mismatch(checks: &[EntryCheck]) -> Option<MtarError> {
    checks.iter().find_map(EntryCheck::to_error)
}
