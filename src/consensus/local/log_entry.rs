use crate::commitlog;
use crate::consensus::Term;
use bytes::{Buf, BufMut, Bytes};
use std::convert::TryFrom;
use std::io;

/// Byte representation:
///
/// ```text
/// |                                         1                           |
/// | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 0 | 1 | 2 | 3 | 4 | 5 | ... |
/// +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+-...-+
/// |Vrs|       Term (8 bytes LE)       |   Data (variable size)      ... |
/// +---+-------------------------------+-----------------------------...-+
/// ```
///
/// * `Vrs` - version of the serialized payload
/// * `Term` - leadership term when this entry was ordered
/// * `Data` - the opaque command payload
#[derive(Clone, Debug, PartialEq)]
pub(super) struct LogEntry {
    pub term: Term,
    pub data: Bytes,
}

const LOG_ENTRY_FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 1 + 8;

impl commitlog::Entry for LogEntry {}

impl TryFrom<Vec<u8>> for LogEntry {
    type Error = io::Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() < HEADER_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("log entry is {} bytes, shorter than its header", bytes.len()),
            ));
        }

        let mut bytes = Bytes::from(bytes);
        let version = bytes.get_u8();
        if version != LOG_ENTRY_FORMAT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown log entry version {}", version),
            ));
        }
        let term = Term::new(bytes.get_u64_le());

        Ok(LogEntry { term, data: bytes })
    }
}

impl From<LogEntry> for Vec<u8> {
    fn from(entry: LogEntry) -> Self {
        let mut bytes = Vec::with_capacity(HEADER_LEN + entry.data.len());
        bytes.put_u8(LOG_ENTRY_FORMAT_VERSION);
        bytes.put_u64_le(entry.term.as_u64());
        bytes.put_slice(&entry.data);

        bytes
    }
}
