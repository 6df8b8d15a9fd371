use crate::command::{CommandDecodeError, FleetCommand};
use crate::consensus::{CommittedEntry, ReplicatedStateMachine, StateSnapshot};
use crate::model::{JobId, JobStatus, PrintJob, Printer, PrinterId, PrinterStatus};
use crate::snapshot::{self, FleetSnapshot, SnapshotError};
use crate::state_machine::reader::{self, FleetReader};
use crate::state_machine::{FleetStore, ValidationError};
use std::io::Read;
use std::sync::{Arc, Mutex};

/// What a command did to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    PrinterCreated(Printer),
    /// The printer already existed; nothing changed.
    PrinterUnchanged(Printer),
    JobSubmitted { job: PrintJob, printer: Printer },
    /// The very same job was already submitted; nothing changed.
    JobUnchanged(PrintJob),
    JobUpdated { job: PrintJob, printer: Printer },
    PrinterUpdated { printer: Printer, job: Option<PrintJob> },
}

/// ApplyOutput is the result of applying one committed log entry.
#[derive(Debug)]
pub enum ApplyOutput {
    Applied(Applied),
    Rejected(ValidationError),
    Undecodable(CommandDecodeError),
    /// The entry is at or below the last applied index, e.g. replayed after a restore.
    AlreadyApplied,
}

/// FleetStateMachine is the only writer of the fleet store.
pub struct FleetStateMachine {
    logger: slog::Logger,
    store: Arc<Mutex<FleetStore>>,
}

impl FleetStateMachine {
    pub fn new(logger: slog::Logger) -> Self {
        FleetStateMachine {
            logger,
            store: Arc::new(Mutex::new(FleetStore::new())),
        }
    }

    pub fn reader(&self) -> FleetReader {
        FleetReader::new(self.store.clone())
    }

    /// Applies a command that isn't tied to a log position. The last applied index is untouched.
    #[cfg(test)]
    pub(crate) fn apply_command(&mut self, command: &FleetCommand) -> Result<Applied, ValidationError> {
        let mut store = reader::lock_store(&self.store);
        apply_to_store(&mut store, command)
    }
}

impl ReplicatedStateMachine for FleetStateMachine {
    type Output = ApplyOutput;

    fn apply(&mut self, entry: &CommittedEntry) -> ApplyOutput {
        let index = entry.id.index.as_u64();
        let mut store = reader::lock_store(&self.store);

        if matches!(store.last_applied_index(), Some(last) if index <= last) {
            slog::debug!(self.logger, "Skipping already applied entry {:?}", entry.id);
            return ApplyOutput::AlreadyApplied;
        }

        let output = match FleetCommand::decode(&entry.data) {
            Ok(command) => match apply_to_store(&mut store, &command) {
                Ok(applied) => {
                    slog::debug!(self.logger, "Applied {} at {:?}", command.kind(), entry.id);
                    ApplyOutput::Applied(applied)
                }
                Err(e) => {
                    slog::info!(self.logger, "Rejected {} at {:?}: {}", command.kind(), entry.id, e);
                    ApplyOutput::Rejected(e)
                }
            },
            Err(e) => {
                slog::warn!(self.logger, "Skipping undecodable entry {:?}: {}", entry.id, e);
                ApplyOutput::Undecodable(e)
            }
        };

        // Rejected and skipped entries still consume their log position.
        store.set_last_applied_index(index);
        output
    }

    fn snapshot(&mut self) -> Result<Box<dyn StateSnapshot>, SnapshotError> {
        let store = reader::lock_store(&self.store).clone();
        slog::info!(
            self.logger,
            "Taking snapshot through index {:?} ({} printers, {} jobs)",
            store.last_applied_index(),
            store.printers().count(),
            store.jobs().count()
        );

        Ok(Box::new(FleetSnapshot::new(store)))
    }

    fn restore(&mut self, reader: &mut dyn Read) -> Result<(), SnapshotError> {
        let restored = snapshot::decode_snapshot(reader)?;
        slog::info!(
            self.logger,
            "Restored snapshot through index {:?}",
            restored.last_applied_index()
        );

        *reader::lock_store(&self.store) = restored;
        Ok(())
    }
}

fn apply_to_store(store: &mut FleetStore, command: &FleetCommand) -> Result<Applied, ValidationError> {
    match command {
        FleetCommand::CreatePrinter {
            printer_id,
            name,
            filament_weight,
        } => create_printer(store, printer_id, name, *filament_weight),
        FleetCommand::SubmitJob {
            job_id,
            printer_id,
            filament_weight,
        } => submit_job(store, job_id, printer_id, *filament_weight),
        FleetCommand::UpdateJobStatus { job_id, status } => update_job_status(store, job_id, *status),
        FleetCommand::UpdatePrinterStatus {
            printer_id,
            status,
            job_id,
        } => update_printer_status(store, printer_id, *status, job_id.as_ref()),
    }
}

fn create_printer(
    store: &mut FleetStore,
    printer_id: &PrinterId,
    name: &str,
    filament_weight: f64,
) -> Result<Applied, ValidationError> {
    if let Some(existing) = store.printer(printer_id) {
        return Ok(Applied::PrinterUnchanged(existing.clone()));
    }
    store.validate_create_printer(name, filament_weight)?;

    let printer = Printer::new(printer_id.clone(), name.to_string(), filament_weight);
    store.insert_printer(printer.clone());

    Ok(Applied::PrinterCreated(printer))
}

fn submit_job(
    store: &mut FleetStore,
    job_id: &JobId,
    printer_id: &PrinterId,
    filament_weight: f64,
) -> Result<Applied, ValidationError> {
    if let Some(existing) = store.job(job_id) {
        return if &existing.printer_id == printer_id && existing.filament_weight == filament_weight {
            Ok(Applied::JobUnchanged(existing.clone()))
        } else {
            Err(ValidationError::DuplicateJob(job_id.clone()))
        };
    }
    store.validate_submit_job(printer_id, filament_weight)?;

    let job = PrintJob::new(job_id.clone(), printer_id.clone(), filament_weight);
    store.insert_job(job.clone());
    let printer = printer_mut(store, printer_id)?;
    printer.current_job_id = Some(job_id.clone());
    let printer = printer.clone();

    Ok(Applied::JobSubmitted { job, printer })
}

fn update_job_status(store: &mut FleetStore, job_id: &JobId, status: JobStatus) -> Result<Applied, ValidationError> {
    store.validate_job_status(job_id, status)?;

    let job = job_mut(store, job_id)?;
    job.status = status;
    let job = job.clone();

    let printer = printer_mut(store, &job.printer_id)?;
    match status {
        JobStatus::Printing => printer.status = PrinterStatus::Printing,
        JobStatus::Completed => {
            printer.filament_weight -= job.filament_weight;
            printer.release();
        }
        JobStatus::Failed => printer.release(),
        // Nothing moves back to queued; validation has already refused it.
        JobStatus::Queued => {}
    }
    let printer = printer.clone();

    Ok(Applied::JobUpdated { job, printer })
}

fn update_printer_status(
    store: &mut FleetStore,
    printer_id: &PrinterId,
    status: PrinterStatus,
    job_id: Option<&JobId>,
) -> Result<Applied, ValidationError> {
    store.validate_printer_status(printer_id, status, job_id)?;

    let printer = printer_mut(store, printer_id)?;
    printer.status = status;
    if let Some(job_id) = job_id {
        printer.current_job_id = Some(job_id.clone());
    }
    let printer = printer.clone();

    let job = match &printer.current_job_id {
        Some(attached) => {
            let job = job_mut(store, attached)?;
            if status == PrinterStatus::Printing && job.status == JobStatus::Queued {
                job.status = JobStatus::Printing;
            }
            Some(job.clone())
        }
        None => None,
    };

    Ok(Applied::PrinterUpdated { printer, job })
}

fn printer_mut<'a>(store: &'a mut FleetStore, printer_id: &PrinterId) -> Result<&'a mut Printer, ValidationError> {
    store
        .printer_mut(printer_id)
        .ok_or_else(|| ValidationError::PrinterNotFound(printer_id.clone()))
}

fn job_mut<'a>(store: &'a mut FleetStore, job_id: &JobId) -> Result<&'a mut PrintJob, ValidationError> {
    store
        .job_mut(job_id)
        .ok_or_else(|| ValidationError::JobNotFound(job_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitlog::Index;
    use crate::consensus::{EntryId, Term};
    use crate::snapshot::InMemorySnapshotStore;
    use crate::snapshot::{SnapshotMeta, SnapshotStore};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn state_machine() -> FleetStateMachine {
        FleetStateMachine::new(slog::Logger::root(slog::Discard, slog::o!()))
    }

    fn printer_id(seq: u64) -> PrinterId {
        PrinterId::from_sequence(seq)
    }

    fn job_id(seq: u64) -> JobId {
        JobId::from_sequence(seq)
    }

    fn create_printer(seq: u64, name: &str, weight: f64) -> FleetCommand {
        FleetCommand::CreatePrinter {
            printer_id: printer_id(seq),
            name: name.into(),
            filament_weight: weight,
        }
    }

    fn submit_job(job: u64, printer: u64, weight: f64) -> FleetCommand {
        FleetCommand::SubmitJob {
            job_id: job_id(job),
            printer_id: printer_id(printer),
            filament_weight: weight,
        }
    }

    fn job_status(job: u64, status: JobStatus) -> FleetCommand {
        FleetCommand::UpdateJobStatus {
            job_id: job_id(job),
            status,
        }
    }

    fn printer_status(printer: u64, status: PrinterStatus, job: Option<u64>) -> FleetCommand {
        FleetCommand::UpdatePrinterStatus {
            printer_id: printer_id(printer),
            status,
            job_id: job.map(job_id),
        }
    }

    fn entry(index: u64, command: &FleetCommand) -> CommittedEntry {
        CommittedEntry {
            id: EntryId {
                term: Term::new(1),
                index: Index::new(index),
            },
            data: command.encode().unwrap(),
        }
    }

    fn apply_all(sm: &mut FleetStateMachine, commands: &[FleetCommand]) {
        for command in commands {
            sm.apply_command(command).unwrap();
        }
    }

    #[test]
    fn submit_then_complete_charges_filament() {
        let mut sm = state_machine();

        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 1000.0),
                submit_job(1, 1, 200.0),
                printer_status(1, PrinterStatus::Printing, Some(1)),
            ],
        );
        let job = sm.reader().job(&job_id(1)).unwrap();
        assert_eq!(job.status, JobStatus::Printing);

        let applied = sm.apply_command(&job_status(1, JobStatus::Completed)).unwrap();

        let printer = sm.reader().printer(&printer_id(1)).unwrap();
        assert_eq!(printer.filament_weight, 800.0);
        assert_eq!(printer.status, PrinterStatus::Idle);
        assert_eq!(printer.current_job_id, None);
        match applied {
            Applied::JobUpdated { job, printer: updated } => {
                assert_eq!(job.status, JobStatus::Completed);
                assert_eq!(updated, printer);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn submitting_attaches_but_leaves_printer_idle() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 1000.0)]);

        sm.apply_command(&submit_job(1, 1, 200.0)).unwrap();

        let printer = sm.reader().printer(&printer_id(1)).unwrap();
        assert_eq!(printer.status, PrinterStatus::Idle);
        assert_eq!(printer.current_job_id, Some(job_id(1)));
        assert_eq!(sm.reader().job(&job_id(1)).unwrap().status, JobStatus::Queued);
    }

    #[test]
    fn printing_through_job_status_marks_printer() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 1000.0), submit_job(1, 1, 200.0)]);

        sm.apply_command(&job_status(1, JobStatus::Printing)).unwrap();

        let printer = sm.reader().printer(&printer_id(1)).unwrap();
        assert_eq!(printer.status, PrinterStatus::Printing);
        assert_eq!(printer.current_job_id, Some(job_id(1)));
    }

    #[test]
    fn busy_printer_rejects_new_job() {
        let mut sm = state_machine();
        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 1000.0),
                submit_job(1, 1, 200.0),
                printer_status(1, PrinterStatus::Printing, Some(1)),
            ],
        );
        let before = sm.reader().copy_store();

        let result = sm.apply_command(&submit_job(2, 1, 100.0));

        assert!(matches!(result, Err(ValidationError::PrinterBusy { .. })));
        assert_eq!(sm.reader().copy_store(), before);
    }

    #[test]
    fn queued_job_blocks_printer_too() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 1000.0), submit_job(1, 1, 200.0)]);

        let result = sm.apply_command(&submit_job(2, 1, 100.0));

        assert!(matches!(result, Err(ValidationError::PrinterBusy { .. })));
    }

    #[test]
    fn capacity_rejection_leaves_store_unchanged() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 100.0)]);
        let before = sm.reader().copy_store();

        let result = sm.apply_command(&submit_job(1, 1, 100.5));

        assert_eq!(
            result,
            Err(ValidationError::InsufficientFilament {
                printer_id: printer_id(1),
                required: 100.5,
                remaining: 100.0,
            })
        );
        assert_eq!(sm.reader().copy_store(), before);
    }

    #[test]
    fn whole_spool_can_be_used() {
        let mut sm = state_machine();
        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 100.0),
                submit_job(1, 1, 100.0),
                job_status(1, JobStatus::Printing),
                job_status(1, JobStatus::Completed),
            ],
        );

        assert_eq!(sm.reader().printer(&printer_id(1)).unwrap().filament_weight, 0.0);
    }

    #[test]
    fn completed_job_cannot_restart() {
        let mut sm = state_machine();
        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 1000.0),
                submit_job(1, 1, 200.0),
                job_status(1, JobStatus::Printing),
                job_status(1, JobStatus::Completed),
            ],
        );

        let result = sm.apply_command(&job_status(1, JobStatus::Printing));

        assert_eq!(
            result,
            Err(ValidationError::InvalidTransition {
                job_id: job_id(1),
                from: JobStatus::Completed,
                to: JobStatus::Printing,
            })
        );
    }

    #[test]
    fn queued_job_cannot_skip_printing() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 1000.0), submit_job(1, 1, 200.0)]);

        let result = sm.apply_command(&job_status(1, JobStatus::Completed));

        assert!(matches!(result, Err(ValidationError::InvalidTransition { .. })));
    }

    #[test]
    fn failing_releases_without_charge() {
        let mut sm = state_machine();
        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 1000.0),
                submit_job(1, 1, 200.0),
                job_status(1, JobStatus::Printing),
            ],
        );

        sm.apply_command(&job_status(1, JobStatus::Failed)).unwrap();

        let printer = sm.reader().printer(&printer_id(1)).unwrap();
        assert_eq!(printer.filament_weight, 1000.0);
        assert_eq!(printer.status, PrinterStatus::Idle);
        assert_eq!(printer.current_job_id, None);
        assert!(printer.is_available());
    }

    #[test]
    fn completion_that_would_go_negative_is_rejected() {
        // Filament reported by the printer dropped below what the job needs while it printed.
        let job = PrintJob {
            status: JobStatus::Printing,
            ..PrintJob::new(job_id(1), printer_id(1), 300.0)
        };
        let printer = Printer {
            status: PrinterStatus::Printing,
            current_job_id: Some(job_id(1)),
            ..Printer::new(printer_id(1), "A".into(), 100.0)
        };
        let store = FleetStore::from_parts(vec![printer], vec![job], 1, 1, None).unwrap();
        let mut sm = state_machine();
        *reader::lock_store(&sm.store) = store.clone();

        let result = sm.apply_command(&job_status(1, JobStatus::Completed));

        assert!(matches!(result, Err(ValidationError::InsufficientFilament { .. })));
        assert_eq!(sm.reader().copy_store(), store);
    }

    #[test]
    fn create_printer_is_idempotent() {
        let mut sm = state_machine();
        let command = create_printer(1, "A", 1000.0);

        let first = sm.apply_command(&command).unwrap();
        let second = sm.apply_command(&create_printer(1, "B", 5.0)).unwrap();

        assert!(matches!(first, Applied::PrinterCreated(_)));
        match second {
            Applied::PrinterUnchanged(printer) => assert_eq!(printer.name, "A"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(sm.reader().printers().len(), 1);
    }

    #[test]
    fn duplicate_job_submission() {
        let mut sm = state_machine();
        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 1000.0),
                create_printer(2, "B", 1000.0),
                submit_job(1, 1, 200.0),
            ],
        );

        assert!(matches!(sm.apply_command(&submit_job(1, 1, 200.0)), Ok(Applied::JobUnchanged(_))));
        assert_eq!(
            sm.apply_command(&submit_job(1, 2, 200.0)),
            Err(ValidationError::DuplicateJob(job_id(1)))
        );
    }

    #[test]
    fn invalid_creations_are_rejected() {
        let mut sm = state_machine();

        assert_eq!(
            sm.apply_command(&create_printer(1, " ", 10.0)),
            Err(ValidationError::EmptyPrinterName)
        );
        assert!(matches!(
            sm.apply_command(&create_printer(1, "A", -1.0)),
            Err(ValidationError::InvalidFilamentWeight(_))
        ));
        assert!(matches!(
            sm.apply_command(&create_printer(1, "A", f64::NAN)),
            Err(ValidationError::InvalidFilamentWeight(_))
        ));
        assert_eq!(sm.reader().copy_store(), FleetStore::new());
    }

    #[test]
    fn printer_status_checks_the_job() {
        let mut sm = state_machine();
        apply_all(
            &mut sm,
            &[
                create_printer(1, "A", 1000.0),
                create_printer(2, "B", 1000.0),
                submit_job(1, 1, 200.0),
            ],
        );

        assert_eq!(
            sm.apply_command(&printer_status(2, PrinterStatus::Printing, Some(1))),
            Err(ValidationError::JobNotOnPrinter {
                job_id: job_id(1),
                printer_id: printer_id(2),
            })
        );
        assert_eq!(
            sm.apply_command(&printer_status(2, PrinterStatus::Printing, None)),
            Err(ValidationError::NoJobToPrint(printer_id(2)))
        );
        assert_eq!(
            sm.apply_command(&printer_status(3, PrinterStatus::Idle, None)),
            Err(ValidationError::PrinterNotFound(printer_id(3)))
        );
        assert_eq!(
            sm.apply_command(&printer_status(1, PrinterStatus::Printing, Some(9))),
            Err(ValidationError::JobNotFound(job_id(9)))
        );
    }

    #[test]
    fn printer_can_report_error() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 1000.0)]);

        let applied = sm.apply_command(&printer_status(1, PrinterStatus::Error, None)).unwrap();

        match applied {
            Applied::PrinterUpdated { printer, job } => {
                assert_eq!(printer.status, PrinterStatus::Error);
                assert_eq!(job, None);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            sm.apply_command(&submit_job(1, 1, 10.0)),
            Err(ValidationError::PrinterBusy { .. })
        ));
    }

    #[test]
    fn log_entries_apply_once() {
        let mut sm = state_machine();

        let first = sm.apply(&entry(1, &create_printer(1, "A", 1000.0)));
        let rejected = sm.apply(&entry(2, &submit_job(1, 1, 5000.0)));
        let garbage = sm.apply(&CommittedEntry {
            data: bytes::Bytes::from_static(b"not json"),
            ..entry(3, &create_printer(9, "X", 1.0))
        });
        let replayed = sm.apply(&entry(2, &submit_job(1, 1, 100.0)));

        assert!(matches!(first, ApplyOutput::Applied(Applied::PrinterCreated(_))));
        assert!(matches!(rejected, ApplyOutput::Rejected(ValidationError::InsufficientFilament { .. })));
        assert!(matches!(garbage, ApplyOutput::Undecodable(_)));
        assert!(matches!(replayed, ApplyOutput::AlreadyApplied));
        assert_eq!(sm.reader().read(|store| store.last_applied_index()), Some(3));
        assert!(sm.reader().jobs().is_empty());
    }

    #[test]
    fn snapshot_and_restore() {
        let mut leader = state_machine();
        let commands = vec![
            create_printer(1, "A", 1000.0),
            create_printer(2, "B", 500.0),
            submit_job(1, 1, 200.0),
            printer_status(1, PrinterStatus::Printing, Some(1)),
        ];
        for (i, command) in commands.iter().enumerate() {
            leader.apply(&entry(i as u64 + 1, command));
        }

        let mut store = InMemorySnapshotStore::new();
        let meta = SnapshotMeta {
            last_included: EntryId {
                term: Term::new(1),
                index: Index::new(4),
            },
        };
        leader.snapshot().unwrap().persist(store.create(meta).unwrap()).unwrap();

        let mut follower = state_machine();
        follower.apply_command(&create_printer(7, "stale", 1.0)).unwrap();
        let (_, mut reader) = store.latest().unwrap().unwrap();
        follower.restore(&mut reader).unwrap();

        assert_eq!(follower.reader().copy_store(), leader.reader().copy_store());

        // The log continues where the snapshot ends.
        assert!(matches!(
            follower.apply(&entry(4, &commands[3])),
            ApplyOutput::AlreadyApplied
        ));
        assert!(matches!(
            follower.apply(&entry(5, &job_status(1, JobStatus::Completed))),
            ApplyOutput::Applied(_)
        ));
    }

    #[test]
    fn failed_restore_keeps_state() {
        let mut sm = state_machine();
        apply_all(&mut sm, &[create_printer(1, "A", 1000.0)]);
        let before = sm.reader().copy_store();

        let result = sm.restore(&mut &b"PFSN\x01garbage"[..]);

        assert!(result.is_err());
        assert_eq!(sm.reader().copy_store(), before);
    }

    fn random_command(rng: &mut StdRng) -> FleetCommand {
        let printer = rng.gen_range(1..=4);
        let job = rng.gen_range(1..=12);
        match rng.gen_range(0..4) {
            0 => create_printer(printer, "P", rng.gen_range(0..2000) as f64),
            1 => submit_job(job, printer, rng.gen_range(1..600) as f64),
            2 => {
                let statuses = [JobStatus::Queued, JobStatus::Printing, JobStatus::Completed, JobStatus::Failed];
                job_status(job, statuses[rng.gen_range(0..statuses.len())])
            }
            _ => {
                let statuses = [PrinterStatus::Idle, PrinterStatus::Printing, PrinterStatus::Error];
                let job = if rng.gen_bool(0.5) { Some(job) } else { None };
                printer_status(printer, statuses[rng.gen_range(0..statuses.len())], job)
            }
        }
    }

    #[test]
    fn random_sequences_are_deterministic_and_keep_invariants() {
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut a = state_machine();
            let mut b = state_machine();

            for index in 1..=300 {
                let command = random_command(&mut rng);
                let committed = entry(index, &command);
                a.apply(&committed);
                b.apply(&committed);

                let store = a.reader().copy_store();
                if let Err(e) = store.check_invariants() {
                    panic!("seed {} step {} ({:?}): {}", seed, index, command, e);
                }
                assert!(store.printers().all(|p| p.filament_weight >= 0.0));
            }

            assert_eq!(a.reader().copy_store(), b.reader().copy_store(), "seed {}", seed);
        }
    }
}
