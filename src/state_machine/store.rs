use crate::model::{self, JobId, PrintJob, Printer, PrinterId};
use std::collections::BTreeMap;

/// FleetStore is the complete replicated state of the fleet.
///
/// Only the apply engine mutates it. Everyone else observes it through a `FleetReader`, under the
/// same lock the apply engine holds while mutating.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FleetStore {
    printers: BTreeMap<PrinterId, Printer>,
    jobs: BTreeMap<JobId, PrintJob>,
    // Highest id sequences ever applied. New ids are minted above these, so an id is never reused
    // even if a proposer raced another one.
    highest_printer_sequence: u64,
    highest_job_sequence: u64,
    // Index of the last log entry consumed by the apply engine, including rejected ones.
    last_applied_index: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("fleet invariant violated: {0}")]
pub struct InvariantViolation(String);

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn printer(&self, id: &PrinterId) -> Option<&Printer> {
        self.printers.get(id)
    }

    pub fn job(&self, id: &JobId) -> Option<&PrintJob> {
        self.jobs.get(id)
    }

    /// All printers, ordered by id.
    pub fn printers(&self) -> impl Iterator<Item = &Printer> {
        self.printers.values()
    }

    /// All jobs, ordered by id.
    pub fn jobs(&self) -> impl Iterator<Item = &PrintJob> {
        self.jobs.values()
    }

    pub fn highest_printer_sequence(&self) -> u64 {
        self.highest_printer_sequence
    }

    pub fn highest_job_sequence(&self) -> u64 {
        self.highest_job_sequence
    }

    pub fn last_applied_index(&self) -> Option<u64> {
        self.last_applied_index
    }

    pub(crate) fn from_parts(
        printers: Vec<Printer>,
        jobs: Vec<PrintJob>,
        highest_printer_sequence: u64,
        highest_job_sequence: u64,
        last_applied_index: Option<u64>,
    ) -> Result<Self, InvariantViolation> {
        let mut store = FleetStore {
            highest_printer_sequence,
            highest_job_sequence,
            last_applied_index,
            ..FleetStore::default()
        };

        for printer in printers {
            let id = printer.id.clone();
            if store.printers.insert(id.clone(), printer).is_some() {
                return Err(InvariantViolation(format!("printer '{}' appears twice", id)));
            }
        }
        for job in jobs {
            let id = job.id.clone();
            if store.jobs.insert(id.clone(), job).is_some() {
                return Err(InvariantViolation(format!("job '{}' appears twice", id)));
            }
        }

        store.check_invariants()?;
        Ok(store)
    }

    pub(crate) fn insert_printer(&mut self, printer: Printer) {
        if let Some(sequence) = printer.id.sequence() {
            self.highest_printer_sequence = self.highest_printer_sequence.max(sequence);
        }
        self.printers.insert(printer.id.clone(), printer);
    }

    pub(crate) fn insert_job(&mut self, job: PrintJob) {
        if let Some(sequence) = job.id.sequence() {
            self.highest_job_sequence = self.highest_job_sequence.max(sequence);
        }
        self.jobs.insert(job.id.clone(), job);
    }

    pub(crate) fn printer_mut(&mut self, id: &PrinterId) -> Option<&mut Printer> {
        self.printers.get_mut(id)
    }

    pub(crate) fn job_mut(&mut self, id: &JobId) -> Option<&mut PrintJob> {
        self.jobs.get_mut(id)
    }

    pub(crate) fn set_last_applied_index(&mut self, index: u64) {
        self.last_applied_index = Some(index);
    }

    /// Checks every cross-entity rule of the fleet. Holds after every apply; used to vet
    /// snapshots before they replace the live store.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for printer in self.printers.values() {
            if !model::is_valid_filament_weight(printer.filament_weight) {
                return Err(InvariantViolation(format!(
                    "printer '{}' has filament weight {}",
                    printer.id, printer.filament_weight
                )));
            }
            if let Some(sequence) = printer.id.sequence() {
                if sequence > self.highest_printer_sequence {
                    return Err(InvariantViolation(format!(
                        "printer '{}' is above the highest printer sequence {}",
                        printer.id, self.highest_printer_sequence
                    )));
                }
            }
            if let Some(job_id) = &printer.current_job_id {
                let job = self.jobs.get(job_id).ok_or_else(|| {
                    InvariantViolation(format!("printer '{}' is attached to unknown job '{}'", printer.id, job_id))
                })?;
                if job.printer_id != printer.id || job.status.is_terminal() {
                    return Err(InvariantViolation(format!(
                        "printer '{}' is attached to job '{}' ({}, on '{}')",
                        printer.id, job_id, job.status, job.printer_id
                    )));
                }
            }
        }

        for job in self.jobs.values() {
            if !model::is_valid_filament_weight(job.filament_weight) || job.filament_weight == 0.0 {
                return Err(InvariantViolation(format!(
                    "job '{}' has filament weight {}",
                    job.id, job.filament_weight
                )));
            }
            if let Some(sequence) = job.id.sequence() {
                if sequence > self.highest_job_sequence {
                    return Err(InvariantViolation(format!(
                        "job '{}' is above the highest job sequence {}",
                        job.id, self.highest_job_sequence
                    )));
                }
            }
            let printer = self.printers.get(&job.printer_id).ok_or_else(|| {
                InvariantViolation(format!("job '{}' is assigned to unknown printer '{}'", job.id, job.printer_id))
            })?;
            // At most one active job per printer: each active job must be *the* attached one.
            if !job.status.is_terminal() && printer.current_job_id.as_ref() != Some(&job.id) {
                return Err(InvariantViolation(format!(
                    "active job '{}' is not attached to its printer '{}'",
                    job.id, printer.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobStatus;

    fn printer(seq: u64, weight: f64) -> Printer {
        Printer::new(PrinterId::from_sequence(seq), format!("p{}", seq), weight)
    }

    #[test]
    fn inserting_tracks_highest_sequence() {
        let mut store = FleetStore::new();
        store.insert_printer(printer(3, 10.0));
        store.insert_printer(printer(1, 10.0));
        store.insert_printer(Printer::new(PrinterId::new("lab-printer"), "x".into(), 1.0));

        assert_eq!(store.highest_printer_sequence(), 3);
        assert_eq!(store.highest_job_sequence(), 0);

        let ids: Vec<&str> = store.printers().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["printer-1", "printer-3", "lab-printer"]);
    }

    #[test]
    fn from_parts_rejects_broken_state() {
        // Job on a printer that doesn't reference it.
        let job = PrintJob::new(JobId::from_sequence(1), PrinterId::from_sequence(1), 5.0);
        let result = FleetStore::from_parts(vec![printer(1, 10.0)], vec![job.clone()], 1, 1, Some(3));
        assert!(result.is_err());

        // Same job, correctly attached.
        let mut attached = printer(1, 10.0);
        attached.current_job_id = Some(job.id.clone());
        let store = FleetStore::from_parts(vec![attached.clone()], vec![job.clone()], 1, 1, Some(3)).unwrap();
        assert_eq!(store.last_applied_index(), Some(3));

        // Negative filament.
        let result = FleetStore::from_parts(vec![printer(1, -1.0)], vec![], 1, 0, None);
        assert!(result.is_err());

        // Sequence counter behind the ids in use.
        let result = FleetStore::from_parts(vec![attached], vec![job], 0, 1, None);
        assert!(result.is_err());

        // Duplicate printer.
        let result = FleetStore::from_parts(vec![printer(1, 1.0), printer(1, 2.0)], vec![], 1, 0, None);
        assert!(result.is_err());
    }

    #[test]
    fn finished_jobs_need_no_attachment() {
        let mut job = PrintJob::new(JobId::from_sequence(1), PrinterId::from_sequence(1), 5.0);
        job.status = JobStatus::Completed;

        let store = FleetStore::from_parts(vec![printer(1, 10.0)], vec![job], 1, 1, None);
        assert!(store.is_ok());
    }
}
