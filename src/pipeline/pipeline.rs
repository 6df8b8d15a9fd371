use crate::command::FleetCommand;
use crate::consensus::{ConsensusEngine, Leadership};
use crate::model::{JobId, JobStatus, PrintJob, Printer, PrinterId, PrinterStatus};
use crate::pipeline::ids::IdAllocator;
use crate::pipeline::PipelineError;
use crate::state_machine::{Applied, ApplyOutput, FleetReader};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// SubmissionPipeline turns client requests into committed commands.
///
/// Every mutation is checked against the local store first, then submitted, and answered only
/// once the engine reports it committed and applied. Reads are served from the local store.
pub struct SubmissionPipeline<E: ConsensusEngine<Output = ApplyOutput>> {
    logger: slog::Logger,
    engine: E,
    reader: FleetReader,
    ids: Mutex<IdAllocator>,
    commit_timeout: Duration,
}

impl<E: ConsensusEngine<Output = ApplyOutput>> SubmissionPipeline<E> {
    pub fn new(logger: slog::Logger, engine: E, reader: FleetReader, commit_timeout: Duration) -> Self {
        SubmissionPipeline {
            logger,
            engine,
            reader,
            ids: Mutex::new(IdAllocator::default()),
            commit_timeout,
        }
    }

    pub fn reader(&self) -> &FleetReader {
        &self.reader
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn leadership(&self) -> Leadership {
        self.engine.leadership()
    }

    pub async fn create_printer(&self, name: String, filament_weight: f64) -> Result<Printer, PipelineError> {
        self.ensure_leader()?;
        let printer_id = self.reader.read(|store| -> Result<PrinterId, PipelineError> {
            store
                .validate_create_printer(&name, filament_weight)
                .map_err(PipelineError::Invalid)?;
            self.allocate(|ids| ids.next_printer_id(store.highest_printer_sequence()))
                .ok_or(PipelineError::IdSpaceExhausted("printer"))
        })?;

        let command = FleetCommand::CreatePrinter {
            printer_id,
            name,
            filament_weight,
        };
        match self.submit(&command).await? {
            Applied::PrinterCreated(printer) => Ok(printer),
            Applied::PrinterUnchanged(printer) => {
                // Someone else's printer already lives under the id we picked.
                Err(PipelineError::IdConflict(format!("printer '{}' already exists", printer.id)))
            }
            other => Err(unexpected(other)),
        }
    }

    pub fn get_printer(&self, printer_id: &PrinterId) -> Option<Printer> {
        self.reader.printer(printer_id)
    }

    pub fn list_printers(&self) -> Vec<Printer> {
        self.reader.printers()
    }

    /// Submits a job and starts printing it: a `SubmitJob` followed by the `UpdatePrinterStatus`
    /// that activates it. Answers with the job as it stands after both.
    ///
    /// If only the first command commits, the error is `NotActivated` carrying the queued job, so
    /// the caller can start it with `update_printer_status` instead of submitting it again.
    pub async fn submit_job(&self, printer_id: PrinterId, filament_weight: f64) -> Result<PrintJob, PipelineError> {
        self.ensure_leader()?;
        let job_id = self.reader.read(|store| -> Result<JobId, PipelineError> {
            store
                .validate_submit_job(&printer_id, filament_weight)
                .map_err(PipelineError::Invalid)?;
            self.allocate(|ids| ids.next_job_id(store.highest_job_sequence()))
                .ok_or(PipelineError::IdSpaceExhausted("job"))
        })?;

        let submit = FleetCommand::SubmitJob {
            job_id: job_id.clone(),
            printer_id: printer_id.clone(),
            filament_weight,
        };
        let queued = match self.submit(&submit).await? {
            Applied::JobSubmitted { job, .. } => job,
            Applied::JobUnchanged(job) => {
                return Err(PipelineError::IdConflict(format!("job '{}' already exists", job.id)));
            }
            other => return Err(unexpected(other)),
        };

        let activate = FleetCommand::UpdatePrinterStatus {
            printer_id,
            status: PrinterStatus::Printing,
            job_id: Some(job_id.clone()),
        };
        if let Err(e) = self.submit(&activate).await {
            slog::warn!(self.logger, "Job '{}' was queued but not activated: {}", job_id, e);
            let job = self.reader.job(&job_id).unwrap_or(queued);
            return Err(PipelineError::NotActivated {
                job,
                source: Box::new(e),
            });
        }

        self.reader
            .job(&job_id)
            .ok_or_else(|| PipelineError::UnexpectedOutcome(format!("job '{}' vanished after commit", job_id)))
    }

    pub fn get_job(&self, job_id: &JobId) -> Option<PrintJob> {
        self.reader.job(job_id)
    }

    pub fn list_jobs(&self) -> Vec<PrintJob> {
        self.reader.jobs()
    }

    pub async fn update_job_status(&self, job_id: JobId, status: JobStatus) -> Result<PrintJob, PipelineError> {
        self.ensure_leader()?;
        self.reader
            .read(|store| store.validate_job_status(&job_id, status).map(|_| ()))
            .map_err(PipelineError::Invalid)?;

        match self.submit(&FleetCommand::UpdateJobStatus { job_id, status }).await? {
            Applied::JobUpdated { job, .. } => Ok(job),
            other => Err(unexpected(other)),
        }
    }

    pub async fn update_printer_status(
        &self,
        printer_id: PrinterId,
        status: PrinterStatus,
        job_id: Option<JobId>,
    ) -> Result<Printer, PipelineError> {
        self.ensure_leader()?;
        self.reader
            .read(|store| {
                store
                    .validate_printer_status(&printer_id, status, job_id.as_ref())
                    .map(|_| ())
            })
            .map_err(PipelineError::Invalid)?;

        let command = FleetCommand::UpdatePrinterStatus {
            printer_id,
            status,
            job_id,
        };
        match self.submit(&command).await? {
            Applied::PrinterUpdated { printer, .. } => Ok(printer),
            other => Err(unexpected(other)),
        }
    }

    fn ensure_leader(&self) -> Result<(), PipelineError> {
        match self.engine.leadership() {
            Leadership::Leader => Ok(()),
            Leadership::Follower(leader) => Err(PipelineError::NotLeader(leader)),
            Leadership::NoLeader => Err(PipelineError::NoLeader),
        }
    }

    fn allocate<T>(&self, f: impl FnOnce(&mut IdAllocator) -> T) -> T {
        f(&mut self.ids.lock().unwrap_or_else(PoisonError::into_inner))
    }

    async fn submit(&self, command: &FleetCommand) -> Result<Applied, PipelineError> {
        let bytes = command.encode().map_err(PipelineError::Encode)?;

        let committed = match self.engine.submit(bytes, self.commit_timeout).await {
            Ok(committed) => committed,
            Err(e) => {
                slog::info!(self.logger, "Submitting {} failed: {}", command.kind(), e);
                return Err(e.into());
            }
        };

        match committed.output {
            ApplyOutput::Applied(applied) => Ok(applied),
            ApplyOutput::Rejected(e) => {
                slog::info!(
                    self.logger,
                    "{} at {:?} was rejected when applied: {}",
                    command.kind(),
                    committed.entry_id,
                    e
                );
                Err(PipelineError::RejectedAtApply(e))
            }
            ApplyOutput::Undecodable(e) => Err(PipelineError::Undecodable(e)),
            ApplyOutput::AlreadyApplied => Err(PipelineError::UnexpectedOutcome(format!(
                "fresh entry {:?} was reported as already applied",
                committed.entry_id
            ))),
        }
    }
}

fn unexpected(applied: Applied) -> PipelineError {
    PipelineError::UnexpectedOutcome(format!("{:?}", applied))
}
