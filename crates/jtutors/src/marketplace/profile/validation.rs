use chrono::NaiveDate;

use super::domain::{
    AvailabilityDraft, BackgroundCheckSubmission, EducationDraft, ExperienceDraft, PayoutMethod,
    PersonalInfo, ProfilePhoto,
};

const MIN_SESSION_MINUTES: u16 = 15;
const MAX_SESSION_MINUTES: u16 = 240;

/// Server-side checks mirroring the forms' required-field rules.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("hourly fee must be greater than zero")]
    ZeroFee,
    #[error("end date {ended} precedes start date {started}")]
    EndBeforeStart {
        started: NaiveDate,
        ended: NaiveDate,
    },
    #[error("availability block must end after it starts")]
    EmptyTimeRange,
    #[error(
        "session length must be between {} and {} minutes",
        MIN_SESSION_MINUTES,
        MAX_SESSION_MINUTES
    )]
    SessionLengthOutOfRange,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(())
    }
}

fn require_ordered_dates(
    started: NaiveDate,
    ended: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match ended {
        Some(ended) if ended < started => Err(ValidationError::EndBeforeStart { started, ended }),
        _ => Ok(()),
    }
}

pub fn validate_personal(info: &PersonalInfo) -> Result<(), ValidationError> {
    require("display_name", &info.display_name)?;
    require("location", &info.location)?;
    if info.hourly_fee_cents == 0 {
        return Err(ValidationError::ZeroFee);
    }
    Ok(())
}

pub fn validate_experience(draft: &ExperienceDraft) -> Result<(), ValidationError> {
    require("title", &draft.title)?;
    require("organization", &draft.organization)?;
    require_ordered_dates(draft.started, draft.ended)
}

pub fn validate_education(draft: &EducationDraft) -> Result<(), ValidationError> {
    require("institution", &draft.institution)?;
    require("degree", &draft.degree)?;
    require_ordered_dates(draft.started, draft.ended)
}

pub fn validate_availability(draft: &AvailabilityDraft) -> Result<(), ValidationError> {
    if draft.ends_at <= draft.starts_at {
        return Err(ValidationError::EmptyTimeRange);
    }
    if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&draft.session_minutes) {
        return Err(ValidationError::SessionLengthOutOfRange);
    }
    Ok(())
}

pub fn validate_payout(method: &PayoutMethod) -> Result<(), ValidationError> {
    require("account_label", &method.account_label)?;
    require("external_account_id", &method.external_account_id)
}

pub fn validate_background_check(
    submission: &BackgroundCheckSubmission,
) -> Result<(), ValidationError> {
    require("provider_reference", &submission.provider_reference)
}

pub fn validate_photo(photo: &ProfilePhoto) -> Result<(), ValidationError> {
    require("storage_key", &photo.storage_key)?;
    require("content_type", &photo.content_type)
}
