//! Single-flight gate: at most one update cycle in progress.
//!
//! One permit, acquired without waiting. Overlapping triggers fail to acquire and are
//! dropped rather than queued. The permit goes back when [`FlightPermit`] is dropped,
//! so release happens on success, error and unwinding alike.
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Clone, Debug)]
pub struct SingleFlight {
    sem: Arc<Semaphore>,
}

/// Proof of holding the gate. Dropping it releases the gate.
#[derive(Debug)]
pub struct FlightPermit {
    _permit: OwnedSemaphorePermit,
}

impl SingleFlight {
    /// A fresh gate holding its single permit.
    pub fn new() -> Self {
        Self {
            sem: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the permit if it is free; never waits.
    pub fn try_acquire(&self) -> Option<FlightPermit> {
        Arc::clone(&self.sem)
            .try_acquire_owned()
            .ok()
            .map(|permit| FlightPermit { _permit: permit })
    }

    /// `true` when no cycle holds the gate.
    pub fn is_idle(&self) -> bool {
        self.sem.available_permits() == 1
    }

    /// Wait, without a deadline, until the running cycle (if any) releases the gate.
    pub async fn wait_idle(&self) {
        // The semaphore is never closed, so `acquire` only returns once a permit is free.
        if let Ok(permit) = self.sem.acquire().await {
            drop(permit);
        }
    }

    /// Wait like [`Self::wait_idle`], then keep the permit forever.
    ///
    /// Used on shutdown: once drained, no further cycle can start.
    pub async fn drain(&self) {
        if let Ok(permit) = self.sem.acquire().await {
            permit.forget();
        }
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}
