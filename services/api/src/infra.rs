use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use jtutors::marketplace::hires::{Hire, HireId, HireRepository, Withdrawal, WithdrawalId};
use jtutors::marketplace::profile::{
    ProfileChangePublisher, ProfileChangedEvent, ProfileRepository, PublishError, RepositoryError,
    TutorId, TutorProfileRecord,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<TutorId, TutorProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, record: TutorProfileRecord) -> Result<TutorProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.tutor_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.tutor_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: TutorProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.tutor_id) {
            guard.insert(record.tutor_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &TutorId) -> Result<Option<TutorProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// In-process stand-in for the frontend's same-tab "profile changed" event;
/// retained events let the demo and tests observe the broadcast.
#[derive(Default, Clone)]
pub(crate) struct InMemoryChangeBroadcast {
    events: Arc<Mutex<Vec<ProfileChangedEvent>>>,
}

impl ProfileChangePublisher for InMemoryChangeBroadcast {
    fn publish(&self, event: ProfileChangedEvent) -> Result<(), PublishError> {
        let mut guard = self.events.lock().expect("broadcast mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

impl InMemoryChangeBroadcast {
    pub(crate) fn events(&self) -> Vec<ProfileChangedEvent> {
        self.events.lock().expect("broadcast mutex poisoned").clone()
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryHireRepository {
    hires: Arc<Mutex<HashMap<HireId, Hire>>>,
    withdrawals: Arc<Mutex<HashMap<WithdrawalId, Withdrawal>>>,
}

impl HireRepository for InMemoryHireRepository {
    fn insert_hire(&self, hire: Hire) -> Result<Hire, RepositoryError> {
        let mut guard = self.hires.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&hire.hire_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(hire.hire_id.clone(), hire.clone());
        Ok(hire)
    }

    fn update_hire(&self, hire: Hire) -> Result<(), RepositoryError> {
        let mut guard = self.hires.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&hire.hire_id) {
            guard.insert(hire.hire_id.clone(), hire);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_hire(&self, id: &HireId) -> Result<Option<Hire>, RepositoryError> {
        let guard = self.hires.lock().expect("ledger mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn hires_for(&self, tutor: &TutorId) -> Result<Vec<Hire>, RepositoryError> {
        let guard = self.hires.lock().expect("ledger mutex poisoned");
        Ok(guard
            .values()
            .filter(|hire| &hire.tutor_id == tutor)
            .cloned()
            .collect())
    }

    fn insert_withdrawal(&self, withdrawal: Withdrawal) -> Result<Withdrawal, RepositoryError> {
        let mut guard = self.withdrawals.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&withdrawal.withdrawal_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(withdrawal.withdrawal_id.clone(), withdrawal.clone());
        Ok(withdrawal)
    }

    fn update_withdrawal(&self, withdrawal: Withdrawal) -> Result<(), RepositoryError> {
        let mut guard = self.withdrawals.lock().expect("ledger mutex poisoned");
        if guard.contains_key(&withdrawal.withdrawal_id) {
            guard.insert(withdrawal.withdrawal_id.clone(), withdrawal);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_withdrawal(&self, id: &WithdrawalId) -> Result<Option<Withdrawal>, RepositoryError> {
        let guard = self.withdrawals.lock().expect("ledger mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn withdrawals_for(&self, tutor: &TutorId) -> Result<Vec<Withdrawal>, RepositoryError> {
        let guard = self.withdrawals.lock().expect("ledger mutex poisoned");
        Ok(guard
            .values()
            .filter(|withdrawal| &withdrawal.tutor_id == tutor)
            .cloned()
            .collect())
    }
}
