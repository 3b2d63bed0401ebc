//! Activity entity and its lifecycle state machine.
//!
//! The state machine is the heart of the system:
//!
//! ```text
//! DRAFTING -> PENDING_REVIEW -> PUBLISHED -> ENDED
//!                 |                |
//!                 v                v
//!           NEEDS_REVISION     CANCELLED
//! ```
//!
//! Transitions live on the entity itself; the workflow service is responsible
//! for loading, authorizing, persisting, and notifying around them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::errors::{AppError, AppResult};

/// Activity lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    /// Initial editable state, not visible publicly
    Drafting,
    /// Submitted, awaiting administrator decision
    PendingReview,
    /// Approved and publicly visible
    Published,
    /// Rejected by the administrator, editable again, carries a reason
    NeedsRevision,
    /// Terminal: end time has passed
    Ended,
    /// Terminal: manually withdrawn
    Cancelled,
}

impl ActivityStatus {
    /// Check if an activity in this status can be edited
    pub fn is_editable(&self) -> bool {
        matches!(self, ActivityStatus::Drafting | ActivityStatus::NeedsRevision)
    }

    /// Check if an activity in this status is visible to the public
    pub fn is_public_visible(&self) -> bool {
        matches!(self, ActivityStatus::Published | ActivityStatus::Ended)
    }

    /// Check if an activity in this status can be approved
    pub fn can_be_approved(&self) -> bool {
        matches!(self, ActivityStatus::PendingReview)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Drafting => "DRAFTING",
            ActivityStatus::PendingReview => "PENDING_REVIEW",
            ActivityStatus::Published => "PUBLISHED",
            ActivityStatus::NeedsRevision => "NEEDS_REVISION",
            ActivityStatus::Ended => "ENDED",
            ActivityStatus::Cancelled => "CANCELLED",
        }
    }
}

impl From<&str> for ActivityStatus {
    fn from(s: &str) -> Self {
        match s {
            "PENDING_REVIEW" => ActivityStatus::PendingReview,
            "PUBLISHED" => ActivityStatus::Published,
            "NEEDS_REVISION" => ActivityStatus::NeedsRevision,
            "ENDED" => ActivityStatus::Ended,
            "CANCELLED" => ActivityStatus::Cancelled,
            _ => ActivityStatus::Drafting,
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the creating manager, loaded alongside the activity.
///
/// The creator never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Activity domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Assigned by the store on creation; 0 until persisted
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_participants: i32,
    pub cost: Decimal,
    pub qualifications: Option<String>,
    pub image_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ActivityStatus,
    /// Set only while status is NeedsRevision
    pub rejection_reason: Option<String>,
    pub creator: Creator,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Build a new draft from validated fields. The id stays 0 until the
    /// store assigns one.
    pub fn new_draft(draft: ActivityDraft, creator: Creator) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            location: draft.location,
            max_participants: draft.max_participants,
            cost: draft.cost,
            qualifications: draft.qualifications,
            image_url: draft.image_url,
            start_time: draft.start_time,
            end_time: draft.end_time,
            status: ActivityStatus::Drafting,
            rejection_reason: None,
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    /// End time must be strictly after start time
    pub fn dates_are_ordered(&self) -> bool {
        self.end_time > self.start_time
    }

    /// Start time has already passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.start_time
    }

    /// End time has already passed
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }

    /// Check if the activity can currently be edited
    pub fn can_be_edited(&self) -> bool {
        self.status.is_editable()
    }

    /// Submit for review: Drafting/NeedsRevision -> PendingReview.
    ///
    /// Clears any previous rejection reason.
    pub fn submit_for_review(&mut self) -> AppResult<()> {
        if !self.status.is_editable() {
            return Err(AppError::invalid_state(format!(
                "only drafting or needs-revision activities can be submitted, current status is {}",
                self.status
            )));
        }
        if !self.dates_are_ordered() {
            return Err(AppError::validation("end time must be after start time"));
        }
        self.status = ActivityStatus::PendingReview;
        self.rejection_reason = None;
        self.touch();
        Ok(())
    }

    /// Approve: PendingReview -> Published.
    ///
    /// Fails once the start time has passed.
    pub fn approve(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.can_be_approved() || self.is_expired(now) {
            return Err(AppError::invalid_state(format!(
                "activity cannot be approved (status {}, expired: {})",
                self.status,
                self.is_expired(now)
            )));
        }
        self.status = ActivityStatus::Published;
        self.rejection_reason = None;
        self.touch();
        Ok(())
    }

    /// Reject: PendingReview -> NeedsRevision, recording a non-blank reason.
    pub fn reject(&mut self, reason: &str) -> AppResult<()> {
        if self.status != ActivityStatus::PendingReview {
            return Err(AppError::invalid_state(format!(
                "only pending-review activities can be rejected, current status is {}",
                self.status
            )));
        }
        if reason.trim().is_empty() {
            return Err(AppError::validation("a rejection reason is required"));
        }
        self.status = ActivityStatus::NeedsRevision;
        self.rejection_reason = Some(reason.to_string());
        self.touch();
        Ok(())
    }

    /// Sweep transition: Published -> Ended once the end time has passed.
    ///
    /// Returns whether a transition happened; anything else is a no-op so the
    /// sweep stays idempotent.
    pub fn mark_as_ended(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == ActivityStatus::Published && self.has_ended(now) {
            self.status = ActivityStatus::Ended;
            self.touch();
            return true;
        }
        false
    }

    /// Cancel from any non-terminal-by-time state.
    pub fn cancel(&mut self) -> AppResult<()> {
        if self.status == ActivityStatus::Ended {
            return Err(AppError::invalid_state("an ended activity cannot be cancelled"));
        }
        self.status = ActivityStatus::Cancelled;
        self.touch();
        Ok(())
    }

    /// A change to a published activity is "major" when it touches what was
    /// approved: title, schedule, location, or capacity.
    pub fn is_major_change(&self, changes: &ActivityChanges) -> bool {
        self.title != changes.title
            || self.start_time != changes.start_time
            || self.end_time != changes.end_time
            || self.location != changes.location
            || self.max_participants != changes.max_participants
    }

    /// Overwrite descriptive and temporal fields from an update.
    pub fn apply_changes(&mut self, changes: ActivityChanges) {
        self.title = changes.title;
        self.description = changes.description;
        self.category = changes.category;
        self.location = changes.location;
        self.max_participants = changes.max_participants;
        self.cost = changes.cost;
        self.qualifications = changes.qualifications;
        self.image_url = changes.image_url;
        self.start_time = changes.start_time;
        self.end_time = changes.end_time;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields for creating a new activity
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_draft_times"))]
pub struct ActivityDraft {
    #[validate(length(min = 3, max = 200, message = "title must be 3-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 300, message = "location must be 1-300 characters"))]
    pub location: String,
    #[validate(range(min = 1, max = 1000, message = "participant cap must be 1-1000"))]
    pub max_participants: i32,
    #[validate(custom(function = "validate_cost"))]
    pub cost: Decimal,
    pub qualifications: Option<String>,
    pub image_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Fields for updating an existing activity. All fields are overwritten,
/// matching the edit form the boundary submits.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_change_times"))]
pub struct ActivityChanges {
    #[validate(length(min = 3, max = 200, message = "title must be 3-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 300, message = "location must be 1-300 characters"))]
    pub location: String,
    #[validate(range(min = 1, max = 1000, message = "participant cap must be 1-1000"))]
    pub max_participants: i32,
    #[validate(custom(function = "validate_cost"))]
    pub cost: Decimal,
    pub qualifications: Option<String>,
    pub image_url: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Administrator audit decision
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditDecision {
    Approve,
    Reject { reason: String },
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() {
        return Err(validation_error("cost", "cost cannot be negative"));
    }
    Ok(())
}

fn validate_draft_times(draft: &ActivityDraft) -> Result<(), ValidationError> {
    if draft.start_time <= Utc::now() {
        return Err(validation_error("start_time", "start time must be in the future"));
    }
    if draft.end_time <= draft.start_time {
        return Err(validation_error("end_time", "end time must be after start time"));
    }
    Ok(())
}

fn validate_change_times(changes: &ActivityChanges) -> Result<(), ValidationError> {
    if changes.end_time <= changes.start_time {
        return Err(validation_error("end_time", "end time must be after start time"));
    }
    Ok(())
}
