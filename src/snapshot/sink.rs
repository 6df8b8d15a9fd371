use std::io::{self, Write};

/// SnapshotSink is the destination of one snapshot artifact.
///
/// The writer ends every sink with exactly one of `close` (the artifact is complete and may be
/// read back) or `cancel` (the artifact must be discarded). A sink dropped without `close` counts
/// as cancelled. Readers never see an artifact that wasn't closed.
pub trait SnapshotSink: Write + Send {
    fn close(self: Box<Self>) -> io::Result<()>;

    fn cancel(self: Box<Self>);
}
