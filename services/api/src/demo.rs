use crate::infra::{InMemoryChangeBroadcast, InMemoryHireRepository, InMemoryProfileRepository};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use jtutors::error::AppError;
use jtutors::marketplace::hires::{HireDraft, HireLedgerService, HireStatus};
use jtutors::marketplace::profile::{
    AvailabilityDraft, BackgroundCheckDecision, BackgroundCheckSubmission, DayOfWeek,
    EducationDraft, ExperienceDraft, MutationOutcome, PayoutChannel, PayoutMethod, PersonalInfo,
    ProfilePhoto, ReviewDecision, SubjectId, TutorId, TutorProfileService,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Tutor identifier used for the walkthrough.
    #[arg(long, default_value = "tutor-demo")]
    pub(crate) tutor_id: String,
    /// Skip the hire and withdrawal portion of the demo.
    #[arg(long)]
    pub(crate) skip_ledger: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        tutor_id,
        skip_ledger,
    } = args;

    let today = Local::now().date_naive();
    let tutor_id = TutorId(tutor_id);

    println!("Tutor onboarding demo");

    let broadcast = Arc::new(InMemoryChangeBroadcast::default());
    let profiles = Arc::new(TutorProfileService::new(
        Arc::new(InMemoryProfileRepository::default()),
        broadcast.clone(),
    ));

    let view = profiles.register(tutor_id.clone())?;
    println!(
        "- Registered {} -> profile {}% complete",
        view.tutor_id.0, view.profile_completion
    );

    let steps: Vec<MutationOutcome> = vec![
        profiles.upsert_personal(&tutor_id, demo_personal())?,
        profiles.add_experience(&tutor_id, demo_experience(today))?,
        profiles.add_education(&tutor_id, demo_education(today))?,
        profiles.add_subject(&tutor_id, SubjectId("math-algebra".to_string()))?,
        profiles.add_availability(&tutor_id, demo_availability())?,
        profiles.set_payout(&tutor_id, demo_payout())?,
        profiles.submit_background_check(
            &tutor_id,
            BackgroundCheckSubmission {
                provider_reference: "chk-20410".to_string(),
                submitted_on: today,
            },
        )?,
        profiles.set_photo(
            &tutor_id,
            ProfilePhoto {
                storage_key: "photos/tutor-demo.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
            },
        )?,
    ];

    for outcome in &steps {
        println!(
            "- {} filled -> {}% complete",
            outcome.section.label(),
            outcome.profile_completion
        );
    }

    let approved = profiles.review_background_check(
        &tutor_id,
        BackgroundCheckDecision {
            decision: ReviewDecision::Approve,
            decided_on: today,
        },
    )?;
    println!(
        "- Background check approved -> {}% complete",
        approved.profile_completion
    );

    println!("\nSection checklist");
    let snapshot = profiles.completion(&tutor_id)?;
    for section in &snapshot.sections {
        let mark = if section.complete { "x" } else { " " };
        println!("  [{}] {}", mark, section.section_label);
    }

    println!("\nBroadcast events observed by the frontend stand-in");
    for event in broadcast.events() {
        println!(
            "  - {} changed, completion now {}%",
            event.section.label(),
            event.profile_completion
        );
    }

    if skip_ledger {
        return Ok(());
    }

    println!("\nHire and payout demo");
    let ledger = Arc::new(HireLedgerService::new(Arc::new(
        InMemoryHireRepository::default(),
    )));

    let hire = ledger.request_hire(HireDraft {
        tutor_id: tutor_id.clone(),
        student_id: "student-17".to_string(),
        scheduled_for: today,
        starts_at: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        duration_minutes: 90,
        hourly_fee_cents: demo_personal().hourly_fee_cents,
    })?;
    println!(
        "- Hire {} requested ({} minutes at {} cents/hour)",
        hire.hire_id.0, hire.duration_minutes, hire.hourly_fee_cents
    );

    let hire = ledger.transition_hire(&hire.hire_id, HireStatus::Confirmed)?;
    let hire = ledger.transition_hire(&hire.hire_id, HireStatus::Completed)?;
    println!(
        "- Hire {} completed -> earned {} cents",
        hire.hire_id.0,
        hire.earnings_cents()
    );

    let balance = ledger.balance(&tutor_id)?;
    println!(
        "- Balance: earned {} | reserved {} | available {}",
        balance.earned_cents, balance.reserved_cents, balance.available_cents
    );

    let withdrawal = ledger.request_withdrawal(tutor_id.clone(), balance.available_cents / 2)?;
    println!(
        "- Withdrawal {} requested for {} cents",
        withdrawal.withdrawal_id.0, withdrawal.amount_cents
    );

    let withdrawal = ledger.review_withdrawal(&withdrawal.withdrawal_id, ReviewDecision::Approve)?;
    println!(
        "- Withdrawal {} decided -> {}",
        withdrawal.withdrawal_id.0,
        withdrawal.status.label()
    );

    let balance = ledger.balance(&tutor_id)?;
    println!(
        "- Balance after payout hold: earned {} | reserved {} | available {}",
        balance.earned_cents, balance.reserved_cents, balance.available_cents
    );

    Ok(())
}

fn demo_personal() -> PersonalInfo {
    PersonalInfo {
        display_name: "Maya Castillo".to_string(),
        tagline: "Algebra made friendly".to_string(),
        hourly_fee_cents: 4500,
        location: "Austin, TX".to_string(),
        languages: vec!["English".to_string(), "Spanish".to_string()],
        grade_levels: vec!["Middle school".to_string(), "High school".to_string()],
    }
}

fn demo_experience(today: NaiveDate) -> ExperienceDraft {
    ExperienceDraft {
        title: "Math Teacher".to_string(),
        organization: "Lakeview Middle School".to_string(),
        started: today - chrono::Duration::days(365 * 4),
        ended: Some(today - chrono::Duration::days(30)),
        description: "Taught pre-algebra and algebra I to grades 6-8.".to_string(),
    }
}

fn demo_education(today: NaiveDate) -> EducationDraft {
    EducationDraft {
        institution: "University of Texas".to_string(),
        degree: "BS Mathematics".to_string(),
        started: today - chrono::Duration::days(365 * 10),
        ended: Some(today - chrono::Duration::days(365 * 6)),
        description: "Minor in education.".to_string(),
    }
}

fn demo_availability() -> AvailabilityDraft {
    AvailabilityDraft {
        day: DayOfWeek::Tuesday,
        starts_at: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        ends_at: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
        session_minutes: 60,
    }
}

fn demo_payout() -> PayoutMethod {
    PayoutMethod {
        channel: PayoutChannel::BankAccount,
        account_label: "Checking ****4412".to_string(),
        external_account_id: "acct-demo-4412".to_string(),
    }
}
