use crate::consensus::StateSnapshot;
use crate::model::{PrintJob, Printer};
use crate::snapshot::{SnapshotError, SnapshotSink};
use crate::state_machine::FleetStore;
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Byte representation:
///
/// ```text
/// | 0 | 1 | 2 | 3 | 4 | 5 | ... | 12 | 13 | ...                |
/// +---+---+---+---+---+---+-...-+----+----+-...----------------+
/// |    "PFSN"     |Vrs|  Length (u64 LE) |  Body (JSON) ...     |
/// +---------------+---+------------------+---------------------+
/// ```
///
/// * `Vrs` - version of the artifact format
/// * `Length` - exact size of `Body`. An artifact with fewer or more bytes is rejected, so a
///   half-written artifact can never be mistaken for a complete one.
/// * `Body` - both entity maps plus the id sequences and the last applied log index
const SNAPSHOT_MAGIC: &[u8; 4] = b"PFSN";
const SNAPSHOT_FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 8;

#[derive(Serialize, Deserialize)]
struct SnapshotBody {
    printers: Vec<Printer>,
    jobs: Vec<PrintJob>,
    highest_printer_sequence: u64,
    highest_job_sequence: u64,
    #[serde(default)]
    last_applied_index: Option<u64>,
}

/// FleetSnapshot is an immutable copy of a fleet store, detached from the live one.
#[derive(Clone, Debug)]
pub struct FleetSnapshot {
    store: FleetStore,
}

impl FleetSnapshot {
    pub(crate) fn new(store: FleetStore) -> Self {
        FleetSnapshot { store }
    }

    pub fn store(&self) -> &FleetStore {
        &self.store
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        let body = SnapshotBody {
            printers: self.store.printers().cloned().collect(),
            jobs: self.store.jobs().cloned().collect(),
            highest_printer_sequence: self.store.highest_printer_sequence(),
            highest_job_sequence: self.store.highest_job_sequence(),
            last_applied_index: self.store.last_applied_index(),
        };
        let body = serde_json::to_vec(&body)?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.put_slice(SNAPSHOT_MAGIC);
        bytes.put_u8(SNAPSHOT_FORMAT_VERSION);
        bytes.put_u64_le(body.len() as u64);
        bytes.put_slice(&body);

        Ok(bytes)
    }
}

impl StateSnapshot for FleetSnapshot {
    fn persist(&self, mut sink: Box<dyn SnapshotSink>) -> Result<(), SnapshotError> {
        let bytes = match self.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                sink.cancel();
                return Err(e);
            }
        };

        if let Err(e) = sink.write_all(&bytes).and_then(|_| sink.flush()) {
            sink.cancel();
            return Err(e.into());
        }

        sink.close()?;
        Ok(())
    }
}

/// Reads one complete artifact and rebuilds the store it describes. Fails, rather than returning a
/// partial store, on anything short of a complete, consistent artifact.
pub fn decode_snapshot(reader: &mut dyn Read) -> Result<FleetStore, SnapshotError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.len() < HEADER_LEN || &bytes[..4] != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let mut header = &bytes[4..HEADER_LEN];
    let version = header.get_u8();
    if version != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let expected = header.get_u64_le();
    let found = (bytes.len() - HEADER_LEN) as u64;
    if found < expected {
        return Err(SnapshotError::Truncated { expected, found });
    }
    if found > expected {
        return Err(SnapshotError::TrailingBytes(found - expected));
    }

    let body: SnapshotBody = serde_json::from_slice(&bytes[HEADER_LEN..])?;
    let store = FleetStore::from_parts(
        body.printers,
        body.jobs,
        body.highest_printer_sequence,
        body.highest_job_sequence,
        body.last_applied_index,
    )?;

    Ok(store)
}
