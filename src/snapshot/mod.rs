//! Point-in-time copies of the fleet store: the artifact format, and where artifacts are written.
mod codec;
mod error;
mod sink;
mod store;

pub use codec::decode_snapshot;
pub use codec::FleetSnapshot;
pub use error::SnapshotError;
pub use sink::SnapshotSink;
pub use store::FileSnapshotStore;
pub use store::InMemorySnapshotStore;
pub use store::SnapshotMeta;
pub use store::SnapshotStore;
