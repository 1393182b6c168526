//! Tutor profile sections, completion scoring, and the mutation service.
//!
//! Eight sections feed a derived completion percentage. Each mutator writes
//! one section through the repository, recomputes the percentage, and fires a
//! best-effort change broadcast so open pages can re-fetch their progress
//! bars.

pub mod completion;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use completion::{
    completion_percentage, CompletionSnapshot, ProfileSection, SectionChecklist, SectionStatusView,
};
pub use domain::{
    AvailabilityBlock, AvailabilityDraft, BackgroundCheck, BackgroundCheckDecision,
    BackgroundCheckStatus, BackgroundCheckSubmission, DayOfWeek, EducationDraft, EducationEntry,
    EntryId, ExperienceDraft, ExperienceEntry, PayoutChannel, PayoutMethod, PersonalInfo,
    ProfilePhoto, ReviewDecision, SubjectId, TutorId, TutorProfileRecord,
};
pub use repository::{
    ProfileChangePublisher, ProfileChangedEvent, ProfileRepository, ProfileView, PublishError,
    RepositoryError,
};
pub use router::profile_router;
pub use service::{MutationOutcome, ProfileServiceError, TutorProfileService};
pub use validation::ValidationError;
