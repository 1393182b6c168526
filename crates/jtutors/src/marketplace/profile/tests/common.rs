use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};

use crate::marketplace::profile::domain::{
    AvailabilityDraft, BackgroundCheckSubmission, DayOfWeek, EducationDraft, ExperienceDraft,
    PayoutChannel, PayoutMethod, PersonalInfo, ProfilePhoto, TutorId, TutorProfileRecord,
};
use crate::marketplace::profile::repository::{
    ProfileChangePublisher, ProfileChangedEvent, ProfileRepository, PublishError, RepositoryError,
};
use crate::marketplace::profile::service::TutorProfileService;

pub(super) fn tutor_id() -> TutorId {
    TutorId("tutor-1".to_string())
}

pub(super) fn personal_info() -> PersonalInfo {
    PersonalInfo {
        display_name: "Ada Moreno".to_string(),
        tagline: "Algebra without tears".to_string(),
        hourly_fee_cents: 4500,
        location: "Des Moines, IA".to_string(),
        languages: vec!["English".to_string(), "Spanish".to_string()],
        grade_levels: vec!["6-8".to_string(), "9-12".to_string()],
    }
}

pub(super) fn experience_draft() -> ExperienceDraft {
    ExperienceDraft {
        title: "Math Teacher".to_string(),
        organization: "Lincoln High School".to_string(),
        started: NaiveDate::from_ymd_opt(2019, 8, 15).expect("valid date"),
        ended: Some(NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")),
        description: "Algebra I/II and AP Calculus".to_string(),
    }
}

pub(super) fn education_draft() -> EducationDraft {
    EducationDraft {
        institution: "Iowa State University".to_string(),
        degree: "BSc Mathematics".to_string(),
        started: NaiveDate::from_ymd_opt(2014, 8, 20).expect("valid date"),
        ended: Some(NaiveDate::from_ymd_opt(2018, 5, 12).expect("valid date")),
        description: String::new(),
    }
}

pub(super) fn availability_draft() -> AvailabilityDraft {
    AvailabilityDraft {
        day: DayOfWeek::Tuesday,
        starts_at: NaiveTime::from_hms_opt(16, 0, 0).expect("valid time"),
        ends_at: NaiveTime::from_hms_opt(19, 0, 0).expect("valid time"),
        session_minutes: 60,
    }
}

pub(super) fn payout_method() -> PayoutMethod {
    PayoutMethod {
        channel: PayoutChannel::BankAccount,
        account_label: "Checking ****4821".to_string(),
        external_account_id: "acct_1abc".to_string(),
    }
}

pub(super) fn background_submission() -> BackgroundCheckSubmission {
    BackgroundCheckSubmission {
        provider_reference: "chk_789".to_string(),
        submitted_on: NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
    }
}

pub(super) fn profile_photo() -> ProfilePhoto {
    ProfilePhoto {
        storage_key: "s3://jtutors/photos/tutor-1.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<TutorId, TutorProfileRecord>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &TutorId) -> Option<TutorProfileRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl ProfileRepository for MemoryRepository {
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

#[derive(Default, Clone)]
pub(super) struct MemoryBroadcast {
    events: Arc<Mutex<Vec<ProfileChangedEvent>>>,
}

impl MemoryBroadcast {
    pub(super) fn events(&self) -> Vec<ProfileChangedEvent> {
        self.events.lock().expect("broadcast mutex poisoned").clone()
    }
}

impl ProfileChangePublisher for MemoryBroadcast {
    fn publish(&self, event: ProfileChangedEvent) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("broadcast mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct DeadBroadcast;

impl ProfileChangePublisher for DeadBroadcast {
    fn publish(&self, _event: ProfileChangedEvent) -> Result<(), PublishError> {
        Err(PublishError::Channel("listeners gone".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn insert(&self, _record: TutorProfileRecord) -> Result<TutorProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: TutorProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &TutorId) -> Result<Option<TutorProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    TutorProfileService<MemoryRepository, MemoryBroadcast>,
    Arc<MemoryRepository>,
    Arc<MemoryBroadcast>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let broadcast = Arc::new(MemoryBroadcast::default());
    let service = TutorProfileService::new(repository.clone(), broadcast.clone());
    (service, repository, broadcast)
}

/// Service with a `tutor-1` profile shell already registered.
pub(super) fn registered_service() -> (
    TutorProfileService<MemoryRepository, MemoryBroadcast>,
    Arc<MemoryRepository>,
    Arc<MemoryBroadcast>,
) {
    let (service, repository, broadcast) = build_service();
    service.register(tutor_id()).expect("registration succeeds");
    (service, repository, broadcast)
}
