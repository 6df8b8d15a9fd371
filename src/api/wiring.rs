use crate::api::options::FleetOptionsValidated;
use crate::consensus::{LocalConsensus, LocalConsensusConfig, LocalConsensusError};
use crate::pipeline::SubmissionPipeline;
use crate::snapshot::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore};
use crate::state_machine::{ApplyOutput, FleetReader, FleetStateMachine};
use crate::FleetOptions;
use std::convert::TryFrom;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

pub struct FleetNodeConfig {
    pub node_id: String,
    pub info_logger: slog::Logger,
    // Where snapshots are kept across restarts. Without one, snapshots live in memory only.
    pub snapshot_directory: Option<PathBuf>,
    pub options: FleetOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum FleetNodeCreationError {
    #[error("Illegal options for configuring node: {0}")]
    IllegalOptions(String),
    #[error("Snapshot directory initialization failure")]
    SnapshotDirectory(#[source] io::Error),
    #[error("Consensus engine failed to start")]
    Engine(#[from] LocalConsensusError),
}

pub type FleetPipeline = SubmissionPipeline<LocalConsensus<ApplyOutput>>;

/// FleetNode is one replica of the fleet: its state machine, the engine driving it, and the
/// pipeline clients submit through.
#[derive(Clone)]
pub struct FleetNode {
    pipeline: Arc<FleetPipeline>,
}

impl FleetNode {
    pub fn pipeline(&self) -> &Arc<FleetPipeline> {
        &self.pipeline
    }

    pub fn engine(&self) -> &LocalConsensus<ApplyOutput> {
        self.pipeline.engine()
    }

    pub fn reader(&self) -> &FleetReader {
        self.pipeline.reader()
    }
}

/// Builds a node, restoring its state from the latest snapshot if there is one. The node starts
/// without a leader; call `become_leader` on its engine to let it accept writes.
pub async fn try_create_fleet_node(config: FleetNodeConfig) -> Result<FleetNode, FleetNodeCreationError> {
    let root_logger = config.info_logger.new(slog::o!("node" => config.node_id.clone()));

    let options = FleetOptionsValidated::try_from(config.options)
        .map_err(|e| FleetNodeCreationError::IllegalOptions(e.to_string()))?;

    let snapshot_store: Box<dyn SnapshotStore> = match config.snapshot_directory {
        Some(directory) => Box::new(
            FileSnapshotStore::open(root_logger.clone(), directory).map_err(FleetNodeCreationError::SnapshotDirectory)?,
        ),
        None => Box::new(InMemorySnapshotStore::new()),
    };

    let state_machine = FleetStateMachine::new(root_logger.clone());
    let reader = state_machine.reader();

    let engine = LocalConsensus::start(
        LocalConsensusConfig {
            node_id: config.node_id,
            info_logger: config.info_logger,
            snapshot_store,
            snapshot_threshold: options.snapshot_threshold,
            mailbox_size: options.mailbox_size,
        },
        state_machine,
    )?;

    let pipeline = SubmissionPipeline::new(root_logger.clone(), engine, reader, options.commit_timeout);
    slog::info!(root_logger, "Fleet node created with {:?}", options);

    Ok(FleetNode {
        pipeline: Arc::new(pipeline),
    })
}
