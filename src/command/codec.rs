use crate::command::FleetCommand;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Highest envelope version this build writes and understands.
pub const COMMAND_FORMAT_VERSION: u32 = 1;
/// Oldest envelope version this build still understands.
const MIN_COMMAND_FORMAT_VERSION: u32 = 1;

/// Wire representation:
///
/// ```text
/// {"version": 1, "command": {"type": "submit_job", "job_id": "job-3", ...}}
/// ```
///
/// * `version` - version of the envelope; bumped only for incompatible changes
/// * `command.type` - discriminant, one of `FleetCommand::KINDS`
/// * remaining `command` fields - exactly the fields of the variant. Unknown fields are ignored,
///   so a newer build may add optional fields without breaking older replicas.
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    command: &'a FleetCommand,
}

#[derive(Deserialize)]
struct EnvelopeOwned {
    version: u32,
    command: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandDecodeError {
    #[error("payload is not a command envelope: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("unsupported command format version {0}")]
    UnsupportedVersion(u32),
    #[error("command has no type discriminant")]
    MissingType,
    #[error("unknown command type '{0}'")]
    UnknownType(String),
    #[error("invalid '{kind}' command: {source}")]
    InvalidFields {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FleetCommand {
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        let envelope = EnvelopeRef {
            version: COMMAND_FORMAT_VERSION,
            command: self,
        };

        serde_json::to_vec(&envelope).map(Bytes::from)
    }

    pub fn decode(bytes: &[u8]) -> Result<FleetCommand, CommandDecodeError> {
        let envelope: EnvelopeOwned = serde_json::from_slice(bytes).map_err(CommandDecodeError::Malformed)?;

        if envelope.version < MIN_COMMAND_FORMAT_VERSION || envelope.version > COMMAND_FORMAT_VERSION {
            return Err(CommandDecodeError::UnsupportedVersion(envelope.version));
        }

        let kind = match envelope.command.get("type").and_then(|t| t.as_str()) {
            Some(kind) => kind.to_string(),
            None => return Err(CommandDecodeError::MissingType),
        };
        if !FleetCommand::KINDS.contains(&kind.as_str()) {
            return Err(CommandDecodeError::UnknownType(kind));
        }

        serde_json::from_value(envelope.command).map_err(|source| CommandDecodeError::InvalidFields { kind, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JobId, JobStatus, PrinterId, PrinterStatus};
    use serde_json::json;

    fn to_json(command: &FleetCommand) -> serde_json::Value {
        serde_json::from_slice(&command.encode().unwrap()).unwrap()
    }

    #[test]
    fn wire_format_is_stable() {
        let create = FleetCommand::CreatePrinter {
            printer_id: PrinterId::from_sequence(1),
            name: "A".into(),
            filament_weight: 1000.0,
        };
        assert_eq!(
            to_json(&create),
            json!({"version": 1, "command": {
                "type": "create_printer", "printer_id": "printer-1", "name": "A", "filament_weight": 1000.0
            }})
        );

        let submit = FleetCommand::SubmitJob {
            job_id: JobId::from_sequence(4),
            printer_id: PrinterId::from_sequence(1),
            filament_weight: 200.0,
        };
        assert_eq!(
            to_json(&submit),
            json!({"version": 1, "command": {
                "type": "submit_job", "job_id": "job-4", "printer_id": "printer-1", "filament_weight": 200.0
            }})
        );

        let update_job = FleetCommand::UpdateJobStatus {
            job_id: JobId::from_sequence(4),
            status: JobStatus::Completed,
        };
        assert_eq!(
            to_json(&update_job),
            json!({"version": 1, "command": {"type": "update_job_status", "job_id": "job-4", "status": "completed"}})
        );

        let update_printer = FleetCommand::UpdatePrinterStatus {
            printer_id: PrinterId::from_sequence(1),
            status: PrinterStatus::Error,
            job_id: None,
        };
        assert_eq!(
            to_json(&update_printer),
            json!({"version": 1, "command": {"type": "update_printer_status", "printer_id": "printer-1", "status": "error"}})
        );
    }

    #[test]
    fn decode_what_we_encode() {
        let command = FleetCommand::UpdatePrinterStatus {
            printer_id: PrinterId::from_sequence(2),
            status: PrinterStatus::Printing,
            job_id: Some(JobId::from_sequence(9)),
        };

        let decoded = FleetCommand::decode(&command.encode().unwrap()).unwrap();
        assert_eq!(decoded, command);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let bytes = br#"{"version":1,"trace":"x","command":{"type":"update_job_status","job_id":"job-1","status":"printing","priority":3}}"#;

        let decoded = FleetCommand::decode(bytes).unwrap();
        assert_eq!(
            decoded,
            FleetCommand::UpdateJobStatus {
                job_id: JobId::from_sequence(1),
                status: JobStatus::Printing,
            }
        );
    }

    fn decode_err(bytes: &[u8]) -> CommandDecodeError {
        FleetCommand::decode(bytes).expect_err("decode should fail")
    }

    #[test]
    fn decode_failures_are_classified() {
        assert!(matches!(decode_err(b"\x00\x01garbage"), CommandDecodeError::Malformed(_)));
        assert!(matches!(decode_err(br#"{"version":1}"#), CommandDecodeError::Malformed(_)));
        assert!(matches!(
            decode_err(br#"{"version":2,"command":{"type":"submit_job"}}"#),
            CommandDecodeError::UnsupportedVersion(2)
        ));
        assert!(matches!(
            decode_err(br#"{"version":0,"command":{"type":"submit_job"}}"#),
            CommandDecodeError::UnsupportedVersion(0)
        ));
        assert!(matches!(
            decode_err(br#"{"version":1,"command":{"job_id":"job-1"}}"#),
            CommandDecodeError::MissingType
        ));
        assert!(matches!(
            decode_err(br#"{"version":1,"command":{"type":"delete_printer","printer_id":"printer-1"}}"#),
            CommandDecodeError::UnknownType(t) if t == "delete_printer"
        ));
        assert!(matches!(
            decode_err(br#"{"version":1,"command":{"type":"update_job_status","job_id":"job-1","status":"paused"}}"#),
            CommandDecodeError::InvalidFields { kind, .. } if kind == "update_job_status"
        ));
    }
}
