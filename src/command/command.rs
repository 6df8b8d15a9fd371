use crate::model::{JobId, JobStatus, PrinterId, PrinterStatus};
use serde::{Deserialize, Serialize};

/// A state transition of the fleet. Ids of new entities are chosen by the proposer and travel
/// inside the command, so every replica inserts under the same id no matter when it applies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FleetCommand {
    CreatePrinter {
        printer_id: PrinterId,
        name: String,
        filament_weight: f64,
    },
    SubmitJob {
        job_id: JobId,
        printer_id: PrinterId,
        filament_weight: f64,
    },
    UpdateJobStatus {
        job_id: JobId,
        status: JobStatus,
    },
    UpdatePrinterStatus {
        printer_id: PrinterId,
        status: PrinterStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job_id: Option<JobId>,
    },
}

impl FleetCommand {
    /// The type discriminant, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            FleetCommand::CreatePrinter { .. } => "create_printer",
            FleetCommand::SubmitJob { .. } => "submit_job",
            FleetCommand::UpdateJobStatus { .. } => "update_job_status",
            FleetCommand::UpdatePrinterStatus { .. } => "update_printer_status",
        }
    }

    pub(crate) const KINDS: [&'static str; 4] = [
        "create_printer",
        "submit_job",
        "update_job_status",
        "update_printer_status",
    ];
}
