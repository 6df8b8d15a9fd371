use crate::model::{JobId, PrintJob, Printer, PrinterId};
use crate::state_machine::FleetStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// FleetReader is a read-only handle on the live store of one replica.
///
/// Every read takes the store lock, so it observes the state between two applies and never a store
/// mid-mutation.
#[derive(Clone)]
pub struct FleetReader {
    store: Arc<Mutex<FleetStore>>,
}

impl FleetReader {
    pub(super) fn new(store: Arc<Mutex<FleetStore>>) -> Self {
        FleetReader { store }
    }

    pub fn printer(&self, printer_id: &PrinterId) -> Option<Printer> {
        self.read(|store| store.printer(printer_id).cloned())
    }

    /// All printers, ordered by id.
    pub fn printers(&self) -> Vec<Printer> {
        self.read(|store| store.printers().cloned().collect())
    }

    pub fn job(&self, job_id: &JobId) -> Option<PrintJob> {
        self.read(|store| store.job(job_id).cloned())
    }

    /// All jobs, ordered by id.
    pub fn jobs(&self) -> Vec<PrintJob> {
        self.read(|store| store.jobs().cloned().collect())
    }

    /// A point-in-time copy of the whole store.
    pub fn copy_store(&self) -> FleetStore {
        self.read(FleetStore::clone)
    }

    /// Runs `f` against the store while holding the store lock. Keep `f` short; applies wait on it.
    pub fn read<T>(&self, f: impl FnOnce(&FleetStore) -> T) -> T {
        f(&lock_store(&self.store))
    }
}

// Apply validates before it writes, so even a poisoned lock guards a consistent store.
pub(super) fn lock_store(store: &Mutex<FleetStore>) -> MutexGuard<'_, FleetStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
