use serde::{Deserialize, Serialize};

use super::completion::{CompletionSnapshot, ProfileSection, SectionStatusView};
use super::domain::{
    AvailabilityBlock, BackgroundCheck, EducationEntry, ExperienceEntry, PayoutMethod,
    PersonalInfo, ProfilePhoto, SubjectId, TutorId, TutorProfileRecord,
};

/// Storage abstraction so the profile service can be exercised in isolation.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, record: TutorProfileRecord) -> Result<TutorProfileRecord, RepositoryError>;
    fn update(&self, record: TutorProfileRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TutorId) -> Result<Option<TutorProfileRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Broadcast payload announcing that one profile section changed. The Rust
/// rendition of the frontend's same-tab "profile changed" event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChangedEvent {
    pub tutor_id: TutorId,
    pub section: ProfileSection,
    pub profile_completion: u8,
}

/// Best-effort fan-out hook. Delivery is unacknowledged; missed events are
/// not replayed, and subscribers are expected to re-fetch the completion
/// endpoint on receipt.
pub trait ProfileChangePublisher: Send + Sync {
    fn publish(&self, event: ProfileChangedEvent) -> Result<(), PublishError>;
}

/// Broadcast dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("broadcast channel unavailable: {0}")]
    Channel(String),
}

/// Full profile view returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub tutor_id: TutorId,
    pub personal: Option<PersonalInfo>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub subjects: Vec<SubjectId>,
    pub availability: Vec<AvailabilityBlock>,
    pub payout: Option<PayoutMethod>,
    pub background_check: Option<BackgroundCheck>,
    pub photo: Option<ProfilePhoto>,
    pub profile_completion: u8,
    pub sections: Vec<SectionStatusView>,
}

impl ProfileView {
    pub fn of(record: &TutorProfileRecord) -> Self {
        let snapshot = CompletionSnapshot::of(record);
        Self {
            tutor_id: record.tutor_id.clone(),
            personal: record.personal.clone(),
            experience: record.experience.clone(),
            education: record.education.clone(),
            subjects: record.subjects.iter().cloned().collect(),
            availability: record.availability.clone(),
            payout: record.payout.clone(),
            background_check: record.background_check.clone(),
            photo: record.photo.clone(),
            profile_completion: snapshot.profile_completion,
            sections: snapshot.sections,
        }
    }
}
