//! Admission control for pipeline invocations.

use crate::error::PipelineError;
use log::debug;
use mnemo_protocol::UserId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Non-blocking admission gate bounding concurrent pipeline runs.
///
/// A request is rejected with `Busy` rather than queued when either the
/// global concurrency limit is reached or a pipeline is already in flight
/// for the same user.
#[derive(Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    in_flight: Arc<Mutex<HashSet<UserId>>>,
}

impl AdmissionGate {
    /// Create a gate admitting up to `max_concurrent` runs (minimum 1).
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Try to admit a run for `user_id`, failing fast with `Busy`.
    pub fn try_admit(&self, user_id: UserId) -> Result<AdmissionPermit, PipelineError> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(user_id) {
            debug!("rejected concurrent request (user_id={})", user_id);
            return Err(PipelineError::Busy);
        }
        match self.permits.clone().try_acquire_owned() {
            Ok(permit) => Ok(AdmissionPermit {
                _permit: permit,
                user_id,
                in_flight: self.in_flight.clone(),
            }),
            Err(_) => {
                in_flight.remove(&user_id);
                debug!("rejected request at concurrency limit (user_id={})", user_id);
                Err(PipelineError::Busy)
            }
        }
    }
}

/// Permit held for the duration of one pipeline run.
///
/// Dropping the permit releases both the global slot and the per-user
/// in-flight marker, on success and on error alike.
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
    user_id: UserId,
    in_flight: Arc<Mutex<HashSet<UserId>>>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::AdmissionGate;
    use crate::error::PipelineError;

    #[test]
    fn same_user_is_rejected_while_in_flight() {
        let gate = AdmissionGate::new(4);
        let permit = gate.try_admit(1).expect("admit");
        assert!(matches!(gate.try_admit(1), Err(PipelineError::Busy)));
        drop(permit);
        gate.try_admit(1).expect("admit after release");
    }

    #[test]
    fn distinct_users_share_the_global_limit() {
        let gate = AdmissionGate::new(2);
        let _a = gate.try_admit(1).expect("admit");
        let _b = gate.try_admit(2).expect("admit");
        assert!(matches!(gate.try_admit(3), Err(PipelineError::Busy)));
    }

    #[test]
    fn single_permit_serializes_all_users() {
        let gate = AdmissionGate::new(1);
        let permit = gate.try_admit(1).expect("admit");
        assert!(matches!(gate.try_admit(2), Err(PipelineError::Busy)));
        drop(permit);
        gate.try_admit(2).expect("admit after release");
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let gate = AdmissionGate::new(0);
        let _permit = gate.try_admit(1).expect("admit");
    }
}
