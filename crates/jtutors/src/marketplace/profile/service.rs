use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::completion::{CompletionSnapshot, ProfileSection, SectionStatusView};
use super::domain::{
    AvailabilityDraft, BackgroundCheck, BackgroundCheckDecision, BackgroundCheckStatus,
    BackgroundCheckSubmission, EducationDraft, EntryId, ExperienceDraft, PayoutMethod,
    PersonalInfo, ProfilePhoto, ReviewDecision, SubjectId, TutorId, TutorProfileRecord,
};
use super::repository::{
    ProfileChangePublisher, ProfileChangedEvent, ProfileRepository, ProfileView, RepositoryError,
};
use super::validation::{
    validate_availability, validate_background_check, validate_education, validate_experience,
    validate_payout, validate_personal, validate_photo, ValidationError,
};

/// Service composing the repository, the validation rules, and the
/// change broadcast. Every mutator recomputes the cached completion column
/// before returning it to the caller.
pub struct TutorProfileService<R, P> {
    repository: Arc<R>,
    broadcast: Arc<P>,
}

static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_entry_id(prefix: &str) -> EntryId {
    let id = ENTRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EntryId(format!("{prefix}-{id:06}"))
}

/// Response shape shared by every section mutator, carrying the new
/// completion percentage the frontend progress bar consumes.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub tutor_id: TutorId,
    pub section: ProfileSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<EntryId>,
    pub profile_completion: u8,
    pub sections: Vec<SectionStatusView>,
}

impl<R, P> TutorProfileService<R, P>
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    pub fn new(repository: Arc<R>, broadcast: Arc<P>) -> Self {
        Self {
            repository,
            broadcast,
        }
    }

    /// Create an empty profile shell for a new tutor account.
    pub fn register(&self, tutor_id: TutorId) -> Result<ProfileView, ProfileServiceError> {
        let record = self.repository.insert(TutorProfileRecord::empty(tutor_id))?;
        Ok(ProfileView::of(&record))
    }

    pub fn profile(&self, tutor_id: &TutorId) -> Result<ProfileView, ProfileServiceError> {
        let record = self.fetch(tutor_id)?;
        Ok(ProfileView::of(&record))
    }

    /// Dedicated completion read, recomputed from section presence on every
    /// call so repeated reads over unchanged data agree with the cache.
    pub fn completion(&self, tutor_id: &TutorId) -> Result<CompletionSnapshot, ProfileServiceError> {
        let record = self.fetch(tutor_id)?;
        Ok(CompletionSnapshot::of(&record))
    }

    pub fn upsert_personal(
        &self,
        tutor_id: &TutorId,
        info: PersonalInfo,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_personal(&info)?;
        let mut record = self.fetch(tutor_id)?;
        record.personal = Some(info);
        self.commit(record, ProfileSection::PersonalInfo, None)
    }

    pub fn add_experience(
        &self,
        tutor_id: &TutorId,
        draft: ExperienceDraft,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_experience(&draft)?;
        let mut record = self.fetch(tutor_id)?;
        let entry_id = next_entry_id("exp");
        record.experience.push(draft.into_entry(entry_id.clone()));
        self.commit(record, ProfileSection::Experience, Some(entry_id))
    }

    pub fn update_experience(
        &self,
        tutor_id: &TutorId,
        entry_id: &EntryId,
        draft: ExperienceDraft,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_experience(&draft)?;
        let mut record = self.fetch(tutor_id)?;
        let entry = record
            .experience
            .iter_mut()
            .find(|entry| &entry.entry_id == entry_id)
            .ok_or(RepositoryError::NotFound)?;
        *entry = draft.into_entry(entry_id.clone());
        self.commit(record, ProfileSection::Experience, Some(entry_id.clone()))
    }

    pub fn delete_experience(
        &self,
        tutor_id: &TutorId,
        entry_id: &EntryId,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let mut record = self.fetch(tutor_id)?;
        let before = record.experience.len();
        record.experience.retain(|entry| &entry.entry_id != entry_id);
        if record.experience.len() == before {
            return Err(RepositoryError::NotFound.into());
        }
        self.commit(record, ProfileSection::Experience, None)
    }

    pub fn add_education(
        &self,
        tutor_id: &TutorId,
        draft: EducationDraft,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_education(&draft)?;
        let mut record = self.fetch(tutor_id)?;
        let entry_id = next_entry_id("edu");
        record.education.push(draft.into_entry(entry_id.clone()));
        self.commit(record, ProfileSection::Education, Some(entry_id))
    }

    pub fn update_education(
        &self,
        tutor_id: &TutorId,
        entry_id: &EntryId,
        draft: EducationDraft,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_education(&draft)?;
        let mut record = self.fetch(tutor_id)?;
        let entry = record
            .education
            .iter_mut()
            .find(|entry| &entry.entry_id == entry_id)
            .ok_or(RepositoryError::NotFound)?;
        *entry = draft.into_entry(entry_id.clone());
        self.commit(record, ProfileSection::Education, Some(entry_id.clone()))
    }

    pub fn delete_education(
        &self,
        tutor_id: &TutorId,
        entry_id: &EntryId,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let mut record = self.fetch(tutor_id)?;
        let before = record.education.len();
        record.education.retain(|entry| &entry.entry_id != entry_id);
        if record.education.len() == before {
            return Err(RepositoryError::NotFound.into());
        }
        self.commit(record, ProfileSection::Education, None)
    }

    /// Toggle-on half of the subject picker; each (tutor, subject) pair is
    /// unique, so re-adding is a conflict rather than a silent no-op.
    pub fn add_subject(
        &self,
        tutor_id: &TutorId,
        subject: SubjectId,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let mut record = self.fetch(tutor_id)?;
        if !record.subjects.insert(subject) {
            return Err(ProfileServiceError::SubjectAlreadySelected);
        }
        self.commit(record, ProfileSection::Subjects, None)
    }

    pub fn remove_subject(
        &self,
        tutor_id: &TutorId,
        subject: &SubjectId,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let mut record = self.fetch(tutor_id)?;
        if !record.subjects.remove(subject) {
            return Err(ProfileServiceError::SubjectNotSelected);
        }
        self.commit(record, ProfileSection::Subjects, None)
    }

    pub fn add_availability(
        &self,
        tutor_id: &TutorId,
        draft: AvailabilityDraft,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_availability(&draft)?;
        let mut record = self.fetch(tutor_id)?;
        let entry_id = next_entry_id("avail");
        record.availability.push(draft.into_block(entry_id.clone()));
        self.commit(record, ProfileSection::Availability, Some(entry_id))
    }

    pub fn delete_availability(
        &self,
        tutor_id: &TutorId,
        entry_id: &EntryId,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let mut record = self.fetch(tutor_id)?;
        let before = record.availability.len();
        record
            .availability
            .retain(|block| &block.entry_id != entry_id);
        if record.availability.len() == before {
            return Err(RepositoryError::NotFound.into());
        }
        self.commit(record, ProfileSection::Availability, None)
    }

    pub fn set_payout(
        &self,
        tutor_id: &TutorId,
        method: PayoutMethod,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_payout(&method)?;
        let mut record = self.fetch(tutor_id)?;
        record.payout = Some(method);
        self.commit(record, ProfileSection::PayoutMethod, None)
    }

    /// First and only tutor-side screening step; the record enters `Pending`
    /// and stays there until an admin decision.
    pub fn submit_background_check(
        &self,
        tutor_id: &TutorId,
        submission: BackgroundCheckSubmission,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_background_check(&submission)?;
        let mut record = self.fetch(tutor_id)?;
        if record.background_check.is_some() {
            return Err(ProfileServiceError::BackgroundCheckAlreadySubmitted);
        }
        record.background_check = Some(BackgroundCheck {
            status: BackgroundCheckStatus::Pending,
            provider_reference: submission.provider_reference,
            submitted_on: submission.submitted_on,
            decided_on: None,
        });
        self.commit(record, ProfileSection::BackgroundCheck, None)
    }

    /// Admin verdict on a pending submission. Completion is unaffected by
    /// the verdict itself; the section counted from submission.
    pub fn review_background_check(
        &self,
        tutor_id: &TutorId,
        decision: BackgroundCheckDecision,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let mut record = self.fetch(tutor_id)?;
        let check = record
            .background_check
            .as_mut()
            .ok_or(RepositoryError::NotFound)?;
        if check.status != BackgroundCheckStatus::Pending {
            return Err(ProfileServiceError::BackgroundCheckAlreadyDecided);
        }
        check.status = match decision.decision {
            ReviewDecision::Approve => BackgroundCheckStatus::Approved,
            ReviewDecision::Reject => BackgroundCheckStatus::Rejected,
        };
        check.decided_on = Some(decision.decided_on);
        self.commit(record, ProfileSection::BackgroundCheck, None)
    }

    pub fn set_photo(
        &self,
        tutor_id: &TutorId,
        photo: ProfilePhoto,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        validate_photo(&photo)?;
        let mut record = self.fetch(tutor_id)?;
        record.photo = Some(photo);
        self.commit(record, ProfileSection::ProfilePhoto, None)
    }

    fn fetch(&self, tutor_id: &TutorId) -> Result<TutorProfileRecord, ProfileServiceError> {
        let record = self
            .repository
            .fetch(tutor_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Persist the mutated record with a fresh completion cache, then fire
    /// the change broadcast. The broadcast is best effort: a failed publish
    /// is logged and never rolls back or fails the mutation.
    fn commit(
        &self,
        mut record: TutorProfileRecord,
        section: ProfileSection,
        entry_id: Option<EntryId>,
    ) -> Result<MutationOutcome, ProfileServiceError> {
        let snapshot = CompletionSnapshot::of(&record);
        record.profile_completion = snapshot.profile_completion;
        let tutor_id = record.tutor_id.clone();
        self.repository.update(record)?;

        let event = ProfileChangedEvent {
            tutor_id: tutor_id.clone(),
            section,
            profile_completion: snapshot.profile_completion,
        };
        if let Err(err) = self.broadcast.publish(event) {
            warn!(tutor = %tutor_id.0, error = %err, "profile change broadcast dropped");
        }

        Ok(MutationOutcome {
            tutor_id,
            section,
            entry_id,
            profile_completion: snapshot.profile_completion,
            sections: snapshot.sections,
        })
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("subject already selected")]
    SubjectAlreadySelected,
    #[error("subject not selected")]
    SubjectNotSelected,
    #[error("background check already submitted")]
    BackgroundCheckAlreadySubmitted,
    #[error("background check already decided")]
    BackgroundCheckAlreadyDecided,
}
