//! Per-owner guard against overlapping year operations.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use taxbook_core::year::YearError;
use taxbook_shared::types::OwnerId;
use tracing::warn;

/// Tracks which owners have a migration, closure or unlock in flight.
///
/// Cloning shares the same set of running operations.
#[derive(Debug, Clone, Default)]
pub struct OperationGuard {
    running: Arc<DashMap<OwnerId, &'static str>>,
}

/// Held while an operation runs; releases the owner on drop.
#[derive(Debug)]
pub struct OperationPermit {
    running: Arc<DashMap<OwnerId, &'static str>>,
    owner_id: OwnerId,
}

impl OperationGuard {
    /// Creates an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `owner_id` for `operation`, failing if another operation runs.
    pub fn acquire(
        &self,
        owner_id: &OwnerId,
        operation: &'static str,
    ) -> Result<OperationPermit, YearError> {
        match self.running.entry(owner_id.clone()) {
            Entry::Occupied(current) => {
                warn!(
                    owner_id = %owner_id,
                    running = *current.get(),
                    rejected = operation,
                    "Year operation already in progress"
                );
                Err(YearError::OperationInProgress(owner_id.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(operation);
                Ok(OperationPermit {
                    running: Arc::clone(&self.running),
                    owner_id: owner_id.clone(),
                })
            }
        }
    }

    /// True when an operation is running for `owner_id`.
    #[must_use]
    pub fn is_busy(&self, owner_id: &OwnerId) -> bool {
        self.running.contains_key(owner_id)
    }
}

impl Drop for OperationPermit {
    fn drop(&mut self) {
        self.running.remove(&self.owner_id);
    }
}
