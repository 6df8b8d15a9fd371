use crate::state_machine::InvariantViolation;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot body could not be (de)serialized: {0}")]
    Body(#[from] serde_json::Error),

    #[error("not a fleet snapshot")]
    BadMagic,

    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u8),

    #[error("snapshot is truncated: expected {expected} body bytes, found {found}")]
    Truncated { expected: u64, found: u64 },

    #[error("snapshot has {0} unexpected trailing bytes")]
    TrailingBytes(u64),

    #[error("snapshot holds an inconsistent store: {0}")]
    Inconsistent(#[from] InvariantViolation),
}
