mod api;
mod command;
mod commitlog;
mod consensus;
mod model;
mod pipeline;
mod server;
mod snapshot;
mod state_machine;
mod grpc {
    include!("../generated/printfleet.rs");
}

pub use api::try_create_fleet_node;
pub use api::FleetNode;
pub use api::FleetNodeConfig;
pub use api::FleetNodeCreationError;
pub use api::FleetOptions;
pub use api::FleetPipeline;
pub use command::CommandDecodeError;
pub use command::FleetCommand;
pub use command::COMMAND_FORMAT_VERSION;
pub use commitlog::Index;
pub use consensus::CatchUp;
pub use consensus::CommitStream;
pub use consensus::Committed;
pub use consensus::CommittedEntry;
pub use consensus::ConsensusEngine;
pub use consensus::EntryId;
pub use consensus::Follower;
pub use consensus::LeaderInfo;
pub use consensus::Leadership;
pub use consensus::LeadershipListener;
pub use consensus::LocalConsensus;
pub use consensus::LocalConsensusConfig;
pub use consensus::LocalConsensusError;
pub use consensus::ReplicatedStateMachine;
pub use consensus::SnapshotArtifact;
pub use consensus::StateSnapshot;
pub use consensus::SubmitError;
pub use consensus::Term;
pub use model::JobId;
pub use model::JobStatus;
pub use model::PrintJob;
pub use model::Printer;
pub use model::PrinterId;
pub use model::PrinterStatus;
pub use model::UnknownStatusError;
pub use pipeline::PipelineError;
pub use pipeline::SubmissionPipeline;
pub use server::shutdown_signal;
pub use server::RpcServer;
pub use server::RpcServerShutdownHandle;
pub use server::RpcServerShutdownSignal;
pub use snapshot::decode_snapshot;
pub use snapshot::FileSnapshotStore;
pub use snapshot::FleetSnapshot;
pub use snapshot::InMemorySnapshotStore;
pub use snapshot::SnapshotError;
pub use snapshot::SnapshotMeta;
pub use snapshot::SnapshotSink;
pub use snapshot::SnapshotStore;
pub use state_machine::Applied;
pub use state_machine::ApplyOutput;
pub use state_machine::FleetReader;
pub use state_machine::FleetStateMachine;
pub use state_machine::FleetStore;
pub use state_machine::InvariantViolation;
pub use state_machine::ValidationError;

