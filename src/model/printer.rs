use crate::model::{JobId, PrinterId, UnknownStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The string form of each variant is persisted (log entries and snapshots). Don't rename.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    Idle,
    Printing,
    Error,
}

impl PrinterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrinterStatus::Idle => "idle",
            PrinterStatus::Printing => "printing",
            PrinterStatus::Error => "error",
        }
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrinterStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(PrinterStatus::Idle),
            "printing" => Ok(PrinterStatus::Printing),
            "error" => Ok(PrinterStatus::Error),
            other => Err(UnknownStatusError::new("printer", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Printer {
    pub id: PrinterId,
    pub name: String,
    pub status: PrinterStatus,
    /// Remaining filament, in grams.
    pub filament_weight: f64,
    /// The job currently attached to this printer, from submission until it finishes or fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_job_id: Option<JobId>,
}

impl Printer {
    pub fn new(id: PrinterId, name: String, filament_weight: f64) -> Self {
        Printer {
            id,
            name,
            status: PrinterStatus::Idle,
            filament_weight,
            current_job_id: None,
        }
    }

    /// A printer accepts a new job only when it is idle and nothing is attached to it.
    pub fn is_available(&self) -> bool {
        self.status == PrinterStatus::Idle && self.current_job_id.is_none()
    }

    pub(crate) fn release(&mut self) {
        self.status = PrinterStatus::Idle;
        self.current_job_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_are_stable() {
        for (status, s) in vec![
            (PrinterStatus::Idle, "idle"),
            (PrinterStatus::Printing, "printing"),
            (PrinterStatus::Error, "error"),
        ] {
            assert_eq!(status.as_str(), s);
            assert_eq!(s.parse::<PrinterStatus>(), Ok(status));
            assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{}\"", s));
        }

        assert!("Idle".parse::<PrinterStatus>().is_err());
    }

    #[test]
    fn only_idle_and_unattached_is_available() {
        let mut printer = Printer::new(PrinterId::from_sequence(1), "A".into(), 1000.0);
        assert!(printer.is_available());

        printer.current_job_id = Some(JobId::from_sequence(1));
        assert!(!printer.is_available());

        printer.release();
        printer.status = PrinterStatus::Error;
        assert!(!printer.is_available());
    }

    #[test]
    fn missing_job_is_omitted_on_the_wire() {
        let printer = Printer::new(PrinterId::from_sequence(1), "A".into(), 1000.0);
        let json = serde_json::to_value(&printer).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": "printer-1", "name": "A", "status": "idle", "filament_weight": 1000.0})
        );
    }
}
