use std::convert::TryFrom;
use tokio::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct FleetOptions {
    /// How long a client request waits for its command to commit.
    pub commit_timeout: Option<Duration>,
    /// Committed entries between two automatic snapshots.
    pub snapshot_threshold: Option<u64>,
    /// Capacity of the consensus engine's request queue.
    pub mailbox_size: Option<usize>,
}

#[derive(Debug)]
pub(super) struct FleetOptionsValidated {
    pub commit_timeout: Duration,
    pub snapshot_threshold: u64,
    pub mailbox_size: usize,
}

impl FleetOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.commit_timeout == Duration::from_secs(0) {
            return Err("Commit timeout must be greater than zero");
        }
        if self.snapshot_threshold == 0 {
            return Err("Snapshot threshold must be at least one entry");
        }
        if self.mailbox_size == 0 {
            return Err("Mailbox size must be at least one");
        }

        Ok(())
    }
}

impl TryFrom<FleetOptions> for FleetOptionsValidated {
    type Error = &'static str;

    fn try_from(options: FleetOptions) -> Result<Self, Self::Error> {
        let values = FleetOptionsValidated {
            commit_timeout: options.commit_timeout.unwrap_or(Duration::from_secs(5)),
            snapshot_threshold: options.snapshot_threshold.unwrap_or(1024),
            mailbox_size: options.mailbox_size.unwrap_or(64),
        };

        values.validate()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FleetOptionsValidated::try_from(FleetOptions::default()).unwrap();

        assert_eq!(options.commit_timeout, Duration::from_secs(5));
        assert_eq!(options.snapshot_threshold, 1024);
        assert_eq!(options.mailbox_size, 64);
    }

    #[test]
    fn zeroes_are_illegal() {
        let zero_timeout = FleetOptions {
            commit_timeout: Some(Duration::from_millis(0)),
            ..FleetOptions::default()
        };
        let zero_threshold = FleetOptions {
            snapshot_threshold: Some(0),
            ..FleetOptions::default()
        };
        let zero_mailbox = FleetOptions {
            mailbox_size: Some(0),
            ..FleetOptions::default()
        };

        assert!(FleetOptionsValidated::try_from(zero_timeout).is_err());
        assert!(FleetOptionsValidated::try_from(zero_threshold).is_err());
        assert!(FleetOptionsValidated::try_from(zero_mailbox).is_err());
    }
}
