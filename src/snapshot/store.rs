use crate::commitlog::Index;
use crate::consensus::{EntryId, Term};
use crate::snapshot::SnapshotSink;
use bytes::Bytes;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SnapshotMeta {
    /// The last log entry whose effects the snapshot contains.
    pub last_included: EntryId,
}

/// SnapshotStore holds completed snapshot artifacts. Only an artifact whose sink was closed is ever
/// returned by `latest`.
pub trait SnapshotStore: Send {
    fn create(&mut self, meta: SnapshotMeta) -> io::Result<Box<dyn SnapshotSink>>;

    fn latest(&self) -> io::Result<Option<(SnapshotMeta, Box<dyn Read + Send>)>>;
}

type Slot = Arc<Mutex<Option<(SnapshotMeta, Bytes)>>>;

/// Keeps the newest snapshot in memory. Clones share the same slot.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    latest: Slot,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_meta(&self) -> Option<SnapshotMeta> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(meta, _)| *meta)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn create(&mut self, meta: SnapshotMeta) -> io::Result<Box<dyn SnapshotSink>> {
        Ok(Box::new(BufferSink {
            meta,
            buffer: Vec::new(),
            slot: self.latest.clone(),
        }))
    }

    fn latest(&self) -> io::Result<Option<(SnapshotMeta, Box<dyn Read + Send>)>> {
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(latest.as_ref().map(|(meta, bytes)| {
            let reader: Box<dyn Read + Send> = Box::new(io::Cursor::new(bytes.clone()));
            (*meta, reader)
        }))
    }
}

struct BufferSink {
    meta: SnapshotMeta,
    buffer: Vec<u8>,
    slot: Slot,
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SnapshotSink for BufferSink {
    fn close(self: Box<Self>) -> io::Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some((self.meta, Bytes::from(self.buffer)));
        Ok(())
    }

    fn cancel(self: Box<Self>) {}
}

const SNAPSHOT_FILE_PREFIX: &str = "snapshot-";
const SNAPSHOT_FILE_SUFFIX: &str = ".snap";
const TMP_SUFFIX: &str = ".tmp";

/// Keeps snapshots as files in one directory.
///
/// An artifact is written to `<name>.tmp` and renamed into place on close, so a crash mid-write
/// never leaves something that looks complete. Older snapshots are removed once a newer one is in
/// place.
pub struct FileSnapshotStore {
    logger: slog::Logger,
    directory: PathBuf,
}

impl FileSnapshotStore {
    pub fn open(logger: slog::Logger, directory: impl Into<PathBuf>) -> io::Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;

        // Leftovers of a write that never finished.
        for entry in fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == &TMP_SUFFIX[1..]) {
                slog::info!(logger, "Removing unfinished snapshot {:?}", path);
                fs::remove_file(&path)?;
            }
        }

        Ok(FileSnapshotStore { logger, directory })
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn create(&mut self, meta: SnapshotMeta) -> io::Result<Box<dyn SnapshotSink>> {
        let final_path = self.directory.join(file_name(meta.last_included));
        let mut tmp_path = final_path.clone().into_os_string();
        tmp_path.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_path);

        let file = File::create(&tmp_path)?;

        Ok(Box::new(FileSink {
            logger: self.logger.clone(),
            meta,
            file: BufWriter::new(file),
            tmp_path,
            final_path,
            directory: self.directory.clone(),
            finished: false,
        }))
    }

    fn latest(&self) -> io::Result<Option<(SnapshotMeta, Box<dyn Read + Send>)>> {
        match completed_snapshots(&self.directory)?.pop() {
            Some((last_included, path)) => {
                let reader: Box<dyn Read + Send> = Box::new(io::BufReader::new(File::open(path)?));
                Ok(Some((SnapshotMeta { last_included }, reader)))
            }
            None => Ok(None),
        }
    }
}

/// Completed snapshots in `directory`, oldest first.
fn completed_snapshots(directory: &Path) -> io::Result<Vec<(EntryId, PathBuf)>> {
    let mut snapshots = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let parsed = path.file_name().and_then(|name| name.to_str()).and_then(parse_file_name);
        if let Some(id) = parsed {
            snapshots.push((id, path));
        }
    }
    snapshots.sort_by_key(|(id, _)| *id);

    Ok(snapshots)
}

fn file_name(id: EntryId) -> String {
    format!(
        "{}{:020}-{:020}{}",
        SNAPSHOT_FILE_PREFIX,
        id.term.as_u64(),
        id.index.as_u64(),
        SNAPSHOT_FILE_SUFFIX
    )
}

fn parse_file_name(name: &str) -> Option<EntryId> {
    let stem = name
        .strip_prefix(SNAPSHOT_FILE_PREFIX)?
        .strip_suffix(SNAPSHOT_FILE_SUFFIX)?;
    let mut parts = stem.splitn(2, '-');
    let term = parts.next()?.parse::<u64>().ok()?;
    let index = parts.next()?.parse::<u64>().ok()?;

    Some(EntryId {
        term: Term::new(term),
        index: Index::try_new(index)?,
    })
}

struct FileSink {
    logger: slog::Logger,
    meta: SnapshotMeta,
    file: BufWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    directory: PathBuf,
    finished: bool,
}

impl FileSink {
    fn prune_older(&self) {
        let snapshots = match completed_snapshots(&self.directory) {
            Ok(snapshots) => snapshots,
            Err(e) => {
                slog::warn!(self.logger, "Failed to list snapshots for pruning: {:?}", e);
                return;
            }
        };

        for (id, path) in snapshots {
            if id < self.meta.last_included {
                if let Err(e) = fs::remove_file(&path) {
                    slog::warn!(self.logger, "Failed to remove old snapshot {:?}: {:?}", path, e);
                }
            }
        }
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl SnapshotSink for FileSink {
    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.file.flush()?;
        self.file.get_ref().sync_all()?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        self.finished = true;

        slog::info!(self.logger, "Snapshot {:?} is complete.", self.final_path);
        self.prune_older();

        Ok(())
    }

    fn cancel(mut self: Box<Self>) {
        self.finished = true;
        if let Err(e) = fs::remove_file(&self.tmp_path) {
            slog::warn!(self.logger, "Failed to remove cancelled snapshot {:?}: {:?}", self.tmp_path, e);
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if !self.finished {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}
