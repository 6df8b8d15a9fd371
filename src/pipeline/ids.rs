use crate::model::{JobId, PrinterId};

/// Hands out ids for new entities on the leader.
///
/// An id is above both the highest sequence the store has applied and every id this allocator
/// already handed out, so two concurrent requests never propose the same id, and an id whose
/// submission timed out is never reused. Returns `None` once the sequence space is used up.
#[derive(Debug, Default)]
pub(super) struct IdAllocator {
    last_printer: u64,
    last_job: u64,
}

impl IdAllocator {
    pub(super) fn next_printer_id(&mut self, highest_applied: u64) -> Option<PrinterId> {
        next_sequence(&mut self.last_printer, highest_applied).map(PrinterId::from_sequence)
    }

    pub(super) fn next_job_id(&mut self, highest_applied: u64) -> Option<JobId> {
        next_sequence(&mut self.last_job, highest_applied).map(JobId::from_sequence)
    }
}

fn next_sequence(last: &mut u64, highest_applied: u64) -> Option<u64> {
    let next = (*last).max(highest_applied).checked_add(1)?;
    *last = next;
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_reuses_or_goes_below_the_store() {
        let mut ids = IdAllocator::default();

        assert_eq!(ids.next_printer_id(0), Some(PrinterId::from_sequence(1)));
        assert_eq!(ids.next_printer_id(0), Some(PrinterId::from_sequence(2)));
        assert_eq!(ids.next_printer_id(10), Some(PrinterId::from_sequence(11)));
        assert_eq!(ids.next_printer_id(3), Some(PrinterId::from_sequence(12)));

        assert_eq!(ids.next_job_id(4), Some(JobId::from_sequence(5)));
    }

    #[test]
    fn exhausted_sequence_space() {
        let mut ids = IdAllocator::default();

        assert_eq!(ids.next_printer_id(u64::MAX - 1), Some(PrinterId::from_sequence(u64::MAX)));
        assert_eq!(ids.next_printer_id(0), None);
        assert_eq!(ids.next_printer_id(u64::MAX), None);

        // Jobs are counted separately.
        assert_eq!(ids.next_job_id(0), Some(JobId::from_sequence(1)));
        assert_eq!(ids.next_job_id(u64::MAX), None);
    }
}
