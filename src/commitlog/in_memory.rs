use crate::commitlog::{Entry, Index, Log};
use std::collections::VecDeque;
use std::convert::TryFrom;
use std::io;
use std::marker::PhantomData;

// Durability is the consensus engine's concern, not ours. This log is the ordering point of the
// in-process engine and lives only as long as the process.
pub struct InMemoryLog<E: Entry> {
    // We don't *need* to convert these to bytes. We could just hold the original entry in memory,
    // but we want to exercise the conversion logic.
    log: VecDeque<Vec<u8>>,
    // Index of `log[0]`.
    first_index: Index,
    _pd: PhantomData<E>,
}

impl<E: Entry> InMemoryLog<E> {
    pub fn create() -> Result<Self, io::Error> {
        Ok(Self::starting_at(Index::start_index()))
    }

    /// An empty log whose first appended entry gets `first_index`. Used when the prefix before it
    /// lives only in a snapshot.
    pub fn starting_at(first_index: Index) -> Self {
        InMemoryLog {
            log: VecDeque::new(),
            first_index,
            _pd: PhantomData::default(),
        }
    }

    fn vec_index(&self, index: Index) -> Option<usize> {
        index
            .as_u64()
            .checked_sub(self.first_index.as_u64())
            .map(|offset| offset as usize)
    }
}

impl<E: Entry> Log<E> for InMemoryLog<E> {
    fn append(&mut self, entry: E) -> Result<Index, io::Error> {
        let appended_index = self.next_index();
        self.log.push_back(entry.into());

        Ok(appended_index)
    }

    fn read(&self, index: Index) -> Result<Option<E>, io::Error> {
        match self.vec_index(index).and_then(|i| self.log.get(i)) {
            Some(bytes) => E::try_from(bytes.clone()).map(Some),
            None => Ok(None),
        }
    }

    fn compact_through(&mut self, index: Index) {
        while self.first_index <= index && !self.log.is_empty() {
            self.log.pop_front();
            self.first_index = self.first_index.plus(1);
        }
        // Compacting past the end leaves an empty log that continues after `index`.
        if self.first_index <= index {
            self.first_index = index.plus(1);
        }
    }

    fn first_index(&self) -> Index {
        self.first_index
    }

    fn next_index(&self) -> Index {
        self.first_index.plus(self.log.len() as u64)
    }
}
