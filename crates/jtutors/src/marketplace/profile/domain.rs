use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tutor accounts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TutorId(pub String);

/// Identifier wrapper for catalog subjects a tutor can teach.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

/// Identifier for individually editable entries inside a repeatable section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

/// Day-of-week for recurring availability blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
            Self::Sunday,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

/// Personal details shown at the top of a tutor's public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub display_name: String,
    pub tagline: String,
    pub hourly_fee_cents: u32,
    pub location: String,
    pub languages: Vec<String>,
    pub grade_levels: Vec<String>,
}

/// Free-form employment history entry, ordered by insertion only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub entry_id: EntryId,
    pub title: String,
    pub organization: String,
    pub started: NaiveDate,
    pub ended: Option<NaiveDate>,
    pub description: String,
}

/// Submitted fields for a new or edited experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceDraft {
    pub title: String,
    pub organization: String,
    pub started: NaiveDate,
    #[serde(default)]
    pub ended: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl ExperienceDraft {
    pub(crate) fn into_entry(self, entry_id: EntryId) -> ExperienceEntry {
        ExperienceEntry {
            entry_id,
            title: self.title,
            organization: self.organization,
            started: self.started,
            ended: self.ended,
            description: self.description,
        }
    }
}

/// Free-form schooling history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub entry_id: EntryId,
    pub institution: String,
    pub degree: String,
    pub started: NaiveDate,
    pub ended: Option<NaiveDate>,
    pub description: String,
}

/// Submitted fields for a new or edited education entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationDraft {
    pub institution: String,
    pub degree: String,
    pub started: NaiveDate,
    #[serde(default)]
    pub ended: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
}

impl EducationDraft {
    pub(crate) fn into_entry(self, entry_id: EntryId) -> EducationEntry {
        EducationEntry {
            entry_id,
            institution: self.institution,
            degree: self.degree,
            started: self.started,
            ended: self.ended,
            description: self.description,
        }
    }
}

/// Weekly recurring teaching window. Overlap between blocks is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub entry_id: EntryId,
    pub day: DayOfWeek,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub session_minutes: u16,
}

/// Submitted fields for a new availability block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityDraft {
    pub day: DayOfWeek,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub session_minutes: u16,
}

impl AvailabilityDraft {
    pub(crate) fn into_block(self, entry_id: EntryId) -> AvailabilityBlock {
        AvailabilityBlock {
            entry_id,
            day: self.day,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            session_minutes: self.session_minutes,
        }
    }
}

/// Where marketplace earnings are paid out. Provider API calls live elsewhere;
/// this records only the tutor's chosen destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutMethod {
    pub channel: PayoutChannel,
    pub account_label: String,
    pub external_account_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutChannel {
    BankAccount,
    DebitCard,
}

impl PayoutChannel {
    pub const fn label(self) -> &'static str {
        match self {
            PayoutChannel::BankAccount => "Bank Account",
            PayoutChannel::DebitCard => "Debit Card",
        }
    }
}

/// One-to-one background screening record. Created once by tutor submission;
/// only an admin decision moves it out of `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundCheck {
    pub status: BackgroundCheckStatus,
    pub provider_reference: String,
    pub submitted_on: NaiveDate,
    pub decided_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundCheckStatus {
    Pending,
    Approved,
    Rejected,
}

impl BackgroundCheckStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BackgroundCheckStatus::Pending => "pending",
            BackgroundCheckStatus::Approved => "approved",
            BackgroundCheckStatus::Rejected => "rejected",
        }
    }
}

/// Payload for the initial screening submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundCheckSubmission {
    pub provider_reference: String,
    pub submitted_on: NaiveDate,
}

/// Admin verdict on a pending background check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundCheckDecision {
    pub decision: ReviewDecision,
    pub decided_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Uploaded profile picture metadata; the binary lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePhoto {
    pub storage_key: String,
    pub content_type: String,
}

/// One record per tutor account, holding every profile section plus the
/// cached completion column. The cache is derived; the section contents are
/// the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorProfileRecord {
    pub tutor_id: TutorId,
    pub personal: Option<PersonalInfo>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub subjects: BTreeSet<SubjectId>,
    pub availability: Vec<AvailabilityBlock>,
    pub payout: Option<PayoutMethod>,
    pub background_check: Option<BackgroundCheck>,
    pub photo: Option<ProfilePhoto>,
    pub profile_completion: u8,
}

impl TutorProfileRecord {
    pub fn empty(tutor_id: TutorId) -> Self {
        Self {
            tutor_id,
            personal: None,
            experience: Vec::new(),
            education: Vec::new(),
            subjects: BTreeSet::new(),
            availability: Vec::new(),
            payout: None,
            background_check: None,
            photo: None,
            profile_completion: 0,
        }
    }
}
