//! Hire bookings, withdrawal requests, and the tutor balance ledger.
//!
//! Both lifecycles are plain enum state machines: hires move
//! `Requested -> Confirmed -> Completed` (with `Cancelled` reachable before
//! completion), withdrawals move `Pending -> Approved | Rejected` by admin
//! decision only. Terminal states reject every further transition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::profile::{RepositoryError, ReviewDecision, TutorId};

/// Identifier wrapper for scheduled hires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HireId(pub String);

/// Identifier wrapper for payout withdrawal requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawalId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HireStatus {
    Requested,
    Confirmed,
    Completed,
    Cancelled,
}

impl HireStatus {
    pub const fn label(self) -> &'static str {
        match self {
            HireStatus::Requested => "requested",
            HireStatus::Confirmed => "confirmed",
            HireStatus::Completed => "completed",
            HireStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, HireStatus::Completed | HireStatus::Cancelled)
    }

    const fn can_transition_to(self, next: HireStatus) -> bool {
        matches!(
            (self, next),
            (HireStatus::Requested, HireStatus::Confirmed)
                | (HireStatus::Requested, HireStatus::Cancelled)
                | (HireStatus::Confirmed, HireStatus::Completed)
                | (HireStatus::Confirmed, HireStatus::Cancelled)
        )
    }
}

/// A student booking against a tutor's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hire {
    pub hire_id: HireId,
    pub tutor_id: TutorId,
    pub student_id: String,
    pub scheduled_for: NaiveDate,
    pub starts_at: NaiveTime,
    pub duration_minutes: u16,
    pub hourly_fee_cents: u32,
    pub status: HireStatus,
}

impl Hire {
    /// Earnings credited to the tutor once the session completes.
    pub fn earnings_cents(&self) -> u64 {
        u64::from(self.hourly_fee_cents) * u64::from(self.duration_minutes) / 60
    }

    pub fn transition(&mut self, next: HireStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::InvalidHireTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Submitted fields for a new hire request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HireDraft {
    pub tutor_id: TutorId,
    pub student_id: String,
    pub scheduled_for: NaiveDate,
    pub starts_at: NaiveTime,
    pub duration_minutes: u16,
    pub hourly_fee_cents: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
        }
    }
}

/// Tutor request to convert platform balance into an external payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub withdrawal_id: WithdrawalId,
    pub tutor_id: TutorId,
    pub amount_cents: u64,
    pub status: WithdrawalStatus,
}

impl Withdrawal {
    pub fn decide(&mut self, decision: ReviewDecision) -> Result<(), LedgerError> {
        if self.status != WithdrawalStatus::Pending {
            return Err(LedgerError::WithdrawalAlreadyDecided);
        }
        self.status = match decision {
            ReviewDecision::Approve => WithdrawalStatus::Approved,
            ReviewDecision::Reject => WithdrawalStatus::Rejected,
        };
        Ok(())
    }
}

/// Storage abstraction over hires and withdrawals.
pub trait HireRepository: Send + Sync {
    fn insert_hire(&self, hire: Hire) -> Result<Hire, RepositoryError>;
    fn update_hire(&self, hire: Hire) -> Result<(), RepositoryError>;
    fn fetch_hire(&self, id: &HireId) -> Result<Option<Hire>, RepositoryError>;
    fn hires_for(&self, tutor: &TutorId) -> Result<Vec<Hire>, RepositoryError>;

    fn insert_withdrawal(&self, withdrawal: Withdrawal) -> Result<Withdrawal, RepositoryError>;
    fn update_withdrawal(&self, withdrawal: Withdrawal) -> Result<(), RepositoryError>;
    fn fetch_withdrawal(&self, id: &WithdrawalId)
        -> Result<Option<Withdrawal>, RepositoryError>;
    fn withdrawals_for(&self, tutor: &TutorId) -> Result<Vec<Withdrawal>, RepositoryError>;
}

/// Balance view: completed-session earnings minus reserved withdrawals.
/// Pending requests count as reserved so a tutor cannot double-spend while
/// an admin decision is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceView {
    pub tutor_id: TutorId,
    pub earned_cents: u64,
    pub reserved_cents: u64,
    pub available_cents: u64,
}

static HIRE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static WITHDRAWAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_hire_id() -> HireId {
    let id = HIRE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    HireId(format!("hire-{id:06}"))
}

fn next_withdrawal_id() -> WithdrawalId {
    let id = WITHDRAWAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    WithdrawalId(format!("wd-{id:06}"))
}

/// Service applying the transition rules and balance arithmetic.
pub struct HireLedgerService<R> {
    repository: Arc<R>,
}

impl<R> HireLedgerService<R>
where
    R: HireRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn request_hire(&self, draft: HireDraft) -> Result<Hire, LedgerError> {
        if draft.duration_minutes == 0 {
            return Err(LedgerError::EmptySession);
        }
        let hire = Hire {
            hire_id: next_hire_id(),
            tutor_id: draft.tutor_id,
            student_id: draft.student_id,
            scheduled_for: draft.scheduled_for,
            starts_at: draft.starts_at,
            duration_minutes: draft.duration_minutes,
            hourly_fee_cents: draft.hourly_fee_cents,
            status: HireStatus::Requested,
        };
        let stored = self.repository.insert_hire(hire)?;
        Ok(stored)
    }

    pub fn hire(&self, hire_id: &HireId) -> Result<Hire, LedgerError> {
        let hire = self
            .repository
            .fetch_hire(hire_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(hire)
    }

    pub fn transition_hire(&self, hire_id: &HireId, next: HireStatus) -> Result<Hire, LedgerError> {
        let mut hire = self.hire(hire_id)?;
        hire.transition(next)?;
        self.repository.update_hire(hire.clone())?;
        Ok(hire)
    }

    /// Create a withdrawal if the tutor's available balance covers it.
    pub fn request_withdrawal(
        &self,
        tutor_id: TutorId,
        amount_cents: u64,
    ) -> Result<Withdrawal, LedgerError> {
        if amount_cents == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let balance = self.balance(&tutor_id)?;
        if amount_cents > balance.available_cents {
            return Err(LedgerError::InsufficientBalance {
                requested: amount_cents,
                available: balance.available_cents,
            });
        }

        let withdrawal = Withdrawal {
            withdrawal_id: next_withdrawal_id(),
            tutor_id,
            amount_cents,
            status: WithdrawalStatus::Pending,
        };
        let stored = self.repository.insert_withdrawal(withdrawal)?;
        Ok(stored)
    }

    pub fn review_withdrawal(
        &self,
        withdrawal_id: &WithdrawalId,
        decision: ReviewDecision,
    ) -> Result<Withdrawal, LedgerError> {
        let mut withdrawal = self
            .repository
            .fetch_withdrawal(withdrawal_id)?
            .ok_or(RepositoryError::NotFound)?;
        withdrawal.decide(decision)?;
        self.repository.update_withdrawal(withdrawal.clone())?;
        Ok(withdrawal)
    }

    pub fn balance(&self, tutor_id: &TutorId) -> Result<BalanceView, LedgerError> {
        let earned_cents: u64 = self
            .repository
            .hires_for(tutor_id)?
            .iter()
            .filter(|hire| hire.status == HireStatus::Completed)
            .map(Hire::earnings_cents)
            .sum();

        let reserved_cents: u64 = self
            .repository
            .withdrawals_for(tutor_id)?
            .iter()
            .filter(|withdrawal| {
                matches!(
                    withdrawal.status,
                    WithdrawalStatus::Pending | WithdrawalStatus::Approved
                )
            })
            .map(|withdrawal| withdrawal.amount_cents)
            .sum();

        Ok(BalanceView {
            tutor_id: tutor_id.clone(),
            earned_cents,
            reserved_cents,
            available_cents: earned_cents.saturating_sub(reserved_cents),
        })
    }
}

/// Error raised by the ledger service.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("hire cannot move from {} to {}", .from.label(), .to.label())]
    InvalidHireTransition { from: HireStatus, to: HireStatus },
    #[error("withdrawal already decided")]
    WithdrawalAlreadyDecided,
    #[error("withdrawal of {requested} exceeds available balance {available}")]
    InsufficientBalance { requested: u64, available: u64 },
    #[error("withdrawal amount must be greater than zero")]
    ZeroAmount,
    #[error("hire duration must be greater than zero")]
    EmptySession,
}

fn ledger_error_response(error: LedgerError) -> Response {
    let status = match &error {
        LedgerError::Repository(RepositoryError::Conflict)
        | LedgerError::InvalidHireTransition { .. }
        | LedgerError::WithdrawalAlreadyDecided => StatusCode::CONFLICT,
        LedgerError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        LedgerError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        LedgerError::InsufficientBalance { .. }
        | LedgerError::ZeroAmount
        | LedgerError::EmptySession => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

/// Router builder exposing hires, withdrawals, and the balance view.
pub fn hire_router<R>(service: Arc<HireLedgerService<R>>) -> Router
where
    R: HireRepository + 'static,
{
    Router::new()
        .route("/api/v1/hires", post(request_hire_handler::<R>))
        .route("/api/v1/hires/:hire_id", get(hire_handler::<R>))
        .route(
            "/api/v1/hires/:hire_id/status",
            post(transition_hire_handler::<R>),
        )
        .route(
            "/api/v1/withdrawals",
            post(request_withdrawal_handler::<R>),
        )
        .route(
            "/api/v1/withdrawals/:withdrawal_id/decision",
            post(review_withdrawal_handler::<R>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/balance",
            get(balance_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct HireTransitionRequest {
    pub(crate) status: HireStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawalRequest {
    pub(crate) tutor_id: String,
    pub(crate) amount_cents: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawalDecisionRequest {
    pub(crate) decision: ReviewDecision,
}

pub(crate) async fn request_hire_handler<R>(
    State(service): State<Arc<HireLedgerService<R>>>,
    axum::Json(draft): axum::Json<HireDraft>,
) -> Response
where
    R: HireRepository + 'static,
{
    match service.request_hire(draft) {
        Ok(hire) => (StatusCode::CREATED, axum::Json(hire)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

pub(crate) async fn hire_handler<R>(
    State(service): State<Arc<HireLedgerService<R>>>,
    Path(hire_id): Path<String>,
) -> Response
where
    R: HireRepository + 'static,
{
    match service.hire(&HireId(hire_id)) {
        Ok(hire) => (StatusCode::OK, axum::Json(hire)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

pub(crate) async fn transition_hire_handler<R>(
    State(service): State<Arc<HireLedgerService<R>>>,
    Path(hire_id): Path<String>,
    axum::Json(request): axum::Json<HireTransitionRequest>,
) -> Response
where
    R: HireRepository + 'static,
{
    match service.transition_hire(&HireId(hire_id), request.status) {
        Ok(hire) => (StatusCode::OK, axum::Json(hire)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

pub(crate) async fn request_withdrawal_handler<R>(
    State(service): State<Arc<HireLedgerService<R>>>,
    axum::Json(request): axum::Json<WithdrawalRequest>,
) -> Response
where
    R: HireRepository + 'static,
{
    match service.request_withdrawal(TutorId(request.tutor_id), request.amount_cents) {
        Ok(withdrawal) => (StatusCode::CREATED, axum::Json(withdrawal)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

pub(crate) async fn review_withdrawal_handler<R>(
    State(service): State<Arc<HireLedgerService<R>>>,
    Path(withdrawal_id): Path<String>,
    axum::Json(request): axum::Json<WithdrawalDecisionRequest>,
) -> Response
where
    R: HireRepository + 'static,
{
    match service.review_withdrawal(&WithdrawalId(withdrawal_id), request.decision) {
        Ok(withdrawal) => (StatusCode::OK, axum::Json(withdrawal)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

pub(crate) async fn balance_handler<R>(
    State(service): State<Arc<HireLedgerService<R>>>,
    Path(tutor_id): Path<String>,
) -> Response
where
    R: HireRepository + 'static,
{
    match service.balance(&TutorId(tutor_id)) {
        Ok(balance) => (StatusCode::OK, axum::Json(balance)).into_response(),
        Err(error) => ledger_error_response(error),
    }
}
