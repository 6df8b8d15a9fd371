//! Printers, print jobs and the rules that bind them together.
mod ids;
mod job;
mod printer;

pub use ids::JobId;
pub use ids::PrinterId;
pub use job::JobStatus;
pub use job::PrintJob;
pub use printer::Printer;
pub use printer::PrinterStatus;

/// Returned when parsing a status string that is not part of the persisted vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status '{value}'")]
pub struct UnknownStatusError {
    kind: &'static str,
    value: String,
}

impl UnknownStatusError {
    fn new(kind: &'static str, value: &str) -> Self {
        UnknownStatusError {
            kind,
            value: value.to_string(),
        }
    }
}

/// Filament weights are grams. Anything NaN, infinite or negative is never a legal weight.
pub(crate) fn is_valid_filament_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}
