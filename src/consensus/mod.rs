//! The seam between the fleet and whatever orders its commands, plus an in-process engine that
//! implements it.
mod commit_stream;
mod engine;
mod follower;
mod leadership;
mod local;

pub use commit_stream::CommitStream;
pub use engine::Committed;
pub use engine::CommittedEntry;
pub use engine::ConsensusEngine;
pub use engine::EntryId;
pub use engine::LeaderInfo;
pub use engine::Leadership;
pub use engine::ReplicatedStateMachine;
pub use engine::StateSnapshot;
pub use engine::SubmitError;
pub use engine::Term;
pub use follower::CatchUp;
pub use follower::Follower;
pub use follower::SnapshotArtifact;
pub use leadership::LeadershipListener;
pub use local::LocalConsensus;
pub use local::LocalConsensusConfig;
pub use local::LocalConsensusError;
