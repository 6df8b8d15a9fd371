use crate::model::{self, JobId, JobStatus, PrintJob, Printer, PrinterId, PrinterStatus};
use crate::state_machine::{FleetStore, ValidationError};

// The rules of the fleet, phrased as read-only checks against a store. The apply engine runs them
// before mutating anything, so a rejected command leaves the store untouched. The submission
// pipeline runs the very same functions as an optimistic pre-flight.
impl FleetStore {
    pub(crate) fn validate_create_printer(&self, name: &str, filament_weight: f64) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyPrinterName);
        }
        if !model::is_valid_filament_weight(filament_weight) {
            return Err(ValidationError::InvalidFilamentWeight(filament_weight));
        }

        Ok(())
    }

    pub(crate) fn validate_submit_job(
        &self,
        printer_id: &PrinterId,
        filament_weight: f64,
    ) -> Result<&Printer, ValidationError> {
        if !model::is_valid_filament_weight(filament_weight) || filament_weight == 0.0 {
            return Err(ValidationError::InvalidFilamentWeight(filament_weight));
        }

        let printer = self.existing_printer(printer_id)?;
        if !printer.is_available() {
            return Err(ValidationError::PrinterBusy {
                printer_id: printer.id.clone(),
                status: printer.status,
                current_job_id: printer.current_job_id.clone(),
            });
        }
        if filament_weight > printer.filament_weight {
            return Err(ValidationError::InsufficientFilament {
                printer_id: printer.id.clone(),
                required: filament_weight,
                remaining: printer.filament_weight,
            });
        }

        Ok(printer)
    }

    pub(crate) fn validate_job_status(&self, job_id: &JobId, status: JobStatus) -> Result<&PrintJob, ValidationError> {
        let job = self.existing_job(job_id)?;
        if !job.status.can_transition_to(status) {
            return Err(ValidationError::InvalidTransition {
                job_id: job.id.clone(),
                from: job.status,
                to: status,
            });
        }

        let printer = self.existing_printer(&job.printer_id)?;
        if status == JobStatus::Completed && printer.filament_weight - job.filament_weight < 0.0 {
            return Err(ValidationError::InsufficientFilament {
                printer_id: printer.id.clone(),
                required: job.filament_weight,
                remaining: printer.filament_weight,
            });
        }

        Ok(job)
    }

    pub(crate) fn validate_printer_status(
        &self,
        printer_id: &PrinterId,
        status: PrinterStatus,
        job_id: Option<&JobId>,
    ) -> Result<&Printer, ValidationError> {
        let printer = self.existing_printer(printer_id)?;

        if let Some(job_id) = job_id {
            let job = self.existing_job(job_id)?;
            if job.printer_id != printer.id {
                return Err(ValidationError::JobNotOnPrinter {
                    job_id: job.id.clone(),
                    printer_id: printer.id.clone(),
                });
            }
            if job.status.is_terminal() {
                return Err(ValidationError::JobFinished {
                    job_id: job.id.clone(),
                    status: job.status,
                });
            }
            if matches!(&printer.current_job_id, Some(attached) if attached != job_id) {
                return Err(ValidationError::PrinterBusy {
                    printer_id: printer.id.clone(),
                    status: printer.status,
                    current_job_id: printer.current_job_id.clone(),
                });
            }
        } else if status == PrinterStatus::Printing && printer.current_job_id.is_none() {
            return Err(ValidationError::NoJobToPrint(printer.id.clone()));
        }

        Ok(printer)
    }

    fn existing_printer(&self, printer_id: &PrinterId) -> Result<&Printer, ValidationError> {
        self.printer(printer_id)
            .ok_or_else(|| ValidationError::PrinterNotFound(printer_id.clone()))
    }

    fn existing_job(&self, job_id: &JobId) -> Result<&PrintJob, ValidationError> {
        self.job(job_id).ok_or_else(|| ValidationError::JobNotFound(job_id.clone()))
    }
}
