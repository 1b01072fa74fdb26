use std::sync::{Arc, PoisonError, RwLock};

use super::Ledger;

/// A [`Ledger`] that can be handed to several threads.
///
/// Mutations take the write lock, so at most one writer touches any region
/// at a time; readers work on a consistent snapshot under the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` with exclusive access. Poisoning is ignored: ledger
    /// operations never leave a record half-written.
    pub fn write<T>(&self, f: impl FnOnce(&mut Ledger) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> Ledger {
        self.read(Ledger::clone)
    }
}
