//! Scoped ownership of one session's dataset
//!
//! A `DatasetLease` opens a dataset when created and drops it exactly once:
//! either through an explicit `release()` or, on early returns and panics,
//! through its `Drop` implementation.

use crate::state::SessionId;
use crate::storage::traits::{DatasetHandle, DatasetStore, StorageError, StorageResult};
use crate::storage::PageResult;
use std::sync::{Arc, Mutex, MutexGuard};

/// A session's claim on its dataset
pub struct DatasetLease<S: DatasetStore> {
    store: Arc<Mutex<S>>,
    handle: Option<DatasetHandle>,
}

impl<S: DatasetStore> DatasetLease<S> {
    /// Opens the dataset for `session_id`
    pub fn open(store: Arc<Mutex<S>>, session_id: SessionId) -> StorageResult<Self> {
        let handle = lock(&store)?.open_dataset(session_id)?;
        tracing::debug!("Opened dataset {}", handle.name);
        Ok(Self {
            store,
            handle: Some(handle),
        })
    }

    /// Returns the handle, or an error once released
    pub fn handle(&self) -> StorageResult<&DatasetHandle> {
        self.handle.as_ref().ok_or(StorageError::DatasetReleased)
    }

    /// Appends one page result
    pub fn append(&self, page: &PageResult) -> StorageResult<()> {
        let handle = self.handle()?;
        lock(&self.store)?.append(handle, page)
    }

    /// Reads every page result in append order
    pub fn read_all(&self) -> StorageResult<Vec<PageResult>> {
        let handle = self.handle()?;
        lock(&self.store)?.read_all(handle)
    }

    /// Drops the dataset, consuming the lease
    ///
    /// A poisoned store lock is recovered rather than reported. If the store
    /// refuses the drop, the handle stays with the lease so `Drop` retries.
    pub fn release(mut self) -> StorageResult<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let result = recover(&self.store).drop_dataset(&handle);
        match result {
            Ok(()) => {
                tracing::debug!("Dropped dataset {}", handle.name);
                Ok(())
            }
            Err(e) => {
                self.handle = Some(handle);
                Err(e)
            }
        }
    }
}

impl<S: DatasetStore> Drop for DatasetLease<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            match recover(&self.store).drop_dataset(&handle) {
                Ok(()) => tracing::debug!("Dropped dataset {} on unwind", handle.name),
                Err(e) => tracing::warn!("Failed to drop dataset {}: {}", handle.name, e),
            }
        }
    }
}

fn lock<S>(store: &Mutex<S>) -> StorageResult<MutexGuard<'_, S>> {
    store
        .lock()
        .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))
}

fn recover<S>(store: &Mutex<S>) -> MutexGuard<'_, S> {
    match store.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
