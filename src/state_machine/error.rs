use crate::model::{JobId, JobStatus, PrinterId, PrinterStatus};

/// Why a command can't be applied to the current state. The same checks run as a pre-flight in
/// the submission pipeline and authoritatively when the committed command is applied.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("printer '{0}' not found")]
    PrinterNotFound(PrinterId),

    #[error("job '{0}' not found")]
    JobNotFound(JobId),

    #[error("printer name must not be empty")]
    EmptyPrinterName,

    #[error("invalid filament weight {0}")]
    InvalidFilamentWeight(f64),

    #[error("printer '{printer_id}' is busy (status {status})")]
    PrinterBusy {
        printer_id: PrinterId,
        status: PrinterStatus,
        current_job_id: Option<JobId>,
    },

    #[error("not enough filament on printer '{printer_id}': {required}g required, {remaining}g remaining")]
    InsufficientFilament {
        printer_id: PrinterId,
        required: f64,
        remaining: f64,
    },

    #[error("job '{job_id}' can't move from {from} to {to}")]
    InvalidTransition {
        job_id: JobId,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("job '{job_id}' is not assigned to printer '{printer_id}'")]
    JobNotOnPrinter { job_id: JobId, printer_id: PrinterId },

    #[error("job '{job_id}' has already finished ({status})")]
    JobFinished { job_id: JobId, status: JobStatus },

    #[error("job '{0}' already exists with different parameters")]
    DuplicateJob(JobId),

    #[error("printer '{0}' has no job to print")]
    NoJobToPrint(PrinterId),
}
