use serde::{Deserialize, Serialize};

use super::domain::TutorProfileRecord;

/// The eight profile sections that count toward completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    PersonalInfo,
    Experience,
    Education,
    Subjects,
    Availability,
    PayoutMethod,
    BackgroundCheck,
    ProfilePhoto,
}

impl ProfileSection {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::PersonalInfo,
            Self::Experience,
            Self::Education,
            Self::Subjects,
            Self::Availability,
            Self::PayoutMethod,
            Self::BackgroundCheck,
            Self::ProfilePhoto,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Information",
            Self::Experience => "Experience",
            Self::Education => "Education",
            Self::Subjects => "Subjects",
            Self::Availability => "Availability",
            Self::PayoutMethod => "Payout Method",
            Self::BackgroundCheck => "Background Check",
            Self::ProfilePhoto => "Profile Photo",
        }
    }
}

/// Presence flags for the eight sections. A section is either present or it
/// is not; one experience entry counts the same as five.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionChecklist {
    present: [bool; 8],
}

impl SectionChecklist {
    /// Derive the checklist from a profile record. Presence means a filled
    /// optional field or a non-empty collection; a background check counts
    /// from submission onward regardless of the admin verdict.
    pub fn of(record: &TutorProfileRecord) -> Self {
        let mut checklist = Self::default();
        checklist.set(ProfileSection::PersonalInfo, record.personal.is_some());
        checklist.set(ProfileSection::Experience, !record.experience.is_empty());
        checklist.set(ProfileSection::Education, !record.education.is_empty());
        checklist.set(ProfileSection::Subjects, !record.subjects.is_empty());
        checklist.set(ProfileSection::Availability, !record.availability.is_empty());
        checklist.set(ProfileSection::PayoutMethod, record.payout.is_some());
        checklist.set(
            ProfileSection::BackgroundCheck,
            record.background_check.is_some(),
        );
        checklist.set(ProfileSection::ProfilePhoto, record.photo.is_some());
        checklist
    }

    pub fn set(&mut self, section: ProfileSection, present: bool) {
        self.present[section as usize] = present;
    }

    pub fn contains(&self, section: ProfileSection) -> bool {
        self.present[section as usize]
    }

    pub fn completed_count(&self) -> usize {
        self.present.iter().filter(|present| **present).count()
    }
}

/// Weighted sum over section presence. Truncating division reproduces the
/// product's advertised step values: 0, 12, 25, 37, 50, 62, 75, 87, 100.
pub fn completion_percentage(checklist: &SectionChecklist) -> u8 {
    let total = ProfileSection::ordered().len();
    ((checklist.completed_count() * 100) / total) as u8
}

/// Per-section status row surfaced alongside the percentage.
#[derive(Debug, Clone, Serialize)]
pub struct SectionStatusView {
    pub section: ProfileSection,
    pub section_label: &'static str,
    pub complete: bool,
}

/// The derived percentage plus its per-section breakdown, in the shape the
/// progress-bar frontend consumes.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionSnapshot {
    pub tutor_id: super::domain::TutorId,
    pub profile_completion: u8,
    pub sections: Vec<SectionStatusView>,
}

impl CompletionSnapshot {
    pub fn of(record: &TutorProfileRecord) -> Self {
        let checklist = SectionChecklist::of(record);
        let sections = ProfileSection::ordered()
            .into_iter()
            .map(|section| SectionStatusView {
                section,
                section_label: section.label(),
                complete: checklist.contains(section),
            })
            .collect();

        Self {
            tutor_id: record.tutor_id.clone(),
            profile_completion: completion_percentage(&checklist),
            sections,
        }
    }
}
