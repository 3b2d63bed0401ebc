//! Activity workflow service - the business logic layer.
//!
//! Orchestrates create/update/delete/submit/audit/cancel around the entity's
//! state machine, enforcing ownership and role guards and firing best-effort
//! notifications. The acting identity is always an explicit parameter; the
//! boundary supplies an already-authenticated user.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    Activity, ActivityChanges, ActivityDraft, ActivityStatus, AuditDecision, Creator, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::ActivityRepository;

use super::notifier::ActivityNotifier;

/// Activity workflow service trait for dependency injection.
#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Create a new activity in Drafting status
    async fn create_activity(&self, draft: ActivityDraft, actor: &User) -> AppResult<Activity>;

    /// Submit a draft or revised activity for review (creator only)
    async fn submit_for_review(&self, id: i64, actor: &User) -> AppResult<Activity>;

    /// Apply an administrator's audit decision. Role enforcement happens at
    /// the boundary; this operation performs no ownership check.
    async fn audit_activity(&self, id: i64, decision: AuditDecision) -> AppResult<Activity>;

    /// Update an activity (creator only). A major change to a published
    /// activity demotes it back to pending review.
    async fn update_activity(
        &self,
        id: i64,
        changes: ActivityChanges,
        actor: &User,
    ) -> AppResult<Activity>;

    /// Permanently delete an activity (creator only, never once published)
    async fn delete_activity(&self, id: i64, actor: &User) -> AppResult<()>;

    /// Cancel an activity (creator only, blocked once ended)
    async fn cancel_activity(&self, id: i64, actor: &User) -> AppResult<Activity>;

    /// Get activity by id
    async fn get_activity(&self, id: i64) -> AppResult<Activity>;

    /// All published activities, newest start time first
    async fn list_published(&self) -> AppResult<Vec<Activity>>;

    /// All activities awaiting review, oldest first
    async fn list_pending_review(&self) -> AppResult<Vec<Activity>>;

    /// Activities created by a manager
    async fn list_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Activity>>;

    /// Activities created by a manager in a given status
    async fn list_by_creator_and_status(
        &self,
        creator_id: Uuid,
        status: ActivityStatus,
    ) -> AppResult<Vec<Activity>>;

    /// Activities in a given status
    async fn list_by_status(&self, status: ActivityStatus) -> AppResult<Vec<Activity>>;

    /// Published activities in a category
    async fn list_published_by_category(&self, category: &str) -> AppResult<Vec<Activity>>;

    /// Case-insensitive keyword search over published activities
    async fn search_published(&self, keyword: &str) -> AppResult<Vec<Activity>>;

    /// Count activities in a given status
    async fn count_by_status(&self, status: ActivityStatus) -> AppResult<u64>;

    /// Sweep published activities whose end time has passed into Ended.
    /// Per-item failures are logged, never abort the batch. Returns the
    /// number of activities swept.
    async fn mark_ended_activities(&self) -> AppResult<usize>;
}

/// Concrete implementation of ActivityService.
pub struct ActivityManager {
    repo: Arc<dyn ActivityRepository>,
    notifier: Arc<dyn ActivityNotifier>,
}

impl ActivityManager {
    /// Create new workflow service instance
    pub fn new(repo: Arc<dyn ActivityRepository>, notifier: Arc<dyn ActivityNotifier>) -> Self {
        Self { repo, notifier }
    }

    /// Ownership guard: only the creator may act, the administrator included.
    fn ensure_owner(activity: &Activity, actor: &User) -> AppResult<()> {
        if activity.creator.id != actor.id {
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityService for ActivityManager {
    async fn create_activity(&self, draft: ActivityDraft, actor: &User) -> AppResult<Activity> {
        if !actor.can_manage_activities() {
            return Err(AppError::Unauthorized);
        }
        draft.validate()?;

        tracing::info!(title = %draft.title, creator = %actor.email, "Creating new activity");

        let activity = Activity::new_draft(
            draft,
            Creator {
                id: actor.id,
                name: actor.name.clone(),
                email: actor.email.clone(),
            },
        );

        let created = self.repo.insert(activity).await?;
        tracing::info!(activity_id = created.id, "Activity created");

        Ok(created)
    }

    async fn submit_for_review(&self, id: i64, actor: &User) -> AppResult<Activity> {
        tracing::info!(activity_id = id, actor = %actor.email, "Submitting activity for review");

        let mut activity = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        Self::ensure_owner(&activity, actor)?;

        activity.submit_for_review()?;
        let saved = self.repo.save(&activity).await?;

        self.notifier.notify_submitted(&saved).await;
        self.notifier.notify_admin_new_submission(&saved).await;

        tracing::info!(activity_id = id, "Activity submitted for review");
        Ok(saved)
    }

    async fn audit_activity(&self, id: i64, decision: AuditDecision) -> AppResult<Activity> {
        tracing::info!(activity_id = id, ?decision, "Auditing activity");

        // Validate the decision before touching any state
        if let AuditDecision::Reject { reason } = &decision {
            if reason.trim().is_empty() {
                return Err(AppError::validation("a rejection reason is required"));
            }
        }

        let mut activity = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        match decision {
            AuditDecision::Approve => {
                activity.approve(Utc::now())?;
                let saved = self.repo.save(&activity).await?;
                self.notifier.notify_approved(&saved).await;
                tracing::info!(activity_id = id, "Activity approved");
                Ok(saved)
            }
            AuditDecision::Reject { reason } => {
                activity.reject(&reason)?;
                let saved = self.repo.save(&activity).await?;
                self.notifier.notify_rejected(&saved, &reason).await;
                tracing::info!(activity_id = id, reason = %reason, "Activity rejected");
                Ok(saved)
            }
        }
    }

    async fn update_activity(
        &self,
        id: i64,
        changes: ActivityChanges,
        actor: &User,
    ) -> AppResult<Activity> {
        tracing::info!(activity_id = id, actor = %actor.email, "Updating activity");

        let mut activity = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        Self::ensure_owner(&activity, actor)?;

        // Published is the one non-editable status updates may touch; a major
        // change then forces re-review.
        if !activity.can_be_edited() && activity.status != ActivityStatus::Published {
            return Err(AppError::invalid_state(format!(
                "activity cannot be edited in status {}",
                activity.status
            )));
        }
        changes.validate()?;

        let major_change =
            activity.status == ActivityStatus::Published && activity.is_major_change(&changes);

        activity.apply_changes(changes);

        if major_change {
            activity.status = ActivityStatus::PendingReview;
            tracing::info!(activity_id = id, "Major change detected, reverting to pending review");
        }

        let saved = self.repo.save(&activity).await?;

        if major_change {
            self.notifier.notify_admin_new_submission(&saved).await;
        }

        tracing::info!(activity_id = id, "Activity updated");
        Ok(saved)
    }

    async fn delete_activity(&self, id: i64, actor: &User) -> AppResult<()> {
        tracing::info!(activity_id = id, actor = %actor.email, "Deleting activity");

        let activity = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        Self::ensure_owner(&activity, actor)?;

        // Published and ended activities must be cancelled, not deleted
        if matches!(activity.status, ActivityStatus::Published | ActivityStatus::Ended) {
            return Err(AppError::invalid_state(
                "published or ended activities cannot be deleted; cancel instead",
            ));
        }

        self.repo.delete(id).await?;
        tracing::info!(activity_id = id, "Activity deleted");
        Ok(())
    }

    async fn cancel_activity(&self, id: i64, actor: &User) -> AppResult<Activity> {
        tracing::info!(activity_id = id, actor = %actor.email, "Cancelling activity");

        let mut activity = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        Self::ensure_owner(&activity, actor)?;

        activity.cancel()?;
        let saved = self.repo.save(&activity).await?;

        tracing::info!(activity_id = id, "Activity cancelled");
        Ok(saved)
    }

    async fn get_activity(&self, id: i64) -> AppResult<Activity> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_published(&self) -> AppResult<Vec<Activity>> {
        self.repo.find_all_published().await
    }

    async fn list_pending_review(&self) -> AppResult<Vec<Activity>> {
        self.repo.find_all_pending_review().await
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Activity>> {
        self.repo.find_by_creator(creator_id).await
    }

    async fn list_by_creator_and_status(
        &self,
        creator_id: Uuid,
        status: ActivityStatus,
    ) -> AppResult<Vec<Activity>> {
        self.repo.find_by_creator_and_status(creator_id, status).await
    }

    async fn list_by_status(&self, status: ActivityStatus) -> AppResult<Vec<Activity>> {
        self.repo.find_by_status(status).await
    }

    async fn list_published_by_category(&self, category: &str) -> AppResult<Vec<Activity>> {
        self.repo
            .find_by_category_and_status(category, ActivityStatus::Published)
            .await
    }

    async fn search_published(&self, keyword: &str) -> AppResult<Vec<Activity>> {
        self.repo.search_published(keyword).await
    }

    async fn count_by_status(&self, status: ActivityStatus) -> AppResult<u64> {
        self.repo.count_by_status(status).await
    }

    async fn mark_ended_activities(&self) -> AppResult<usize> {
        let now = Utc::now();
        let expired = self.repo.find_published_past_end_time(now).await?;

        let mut swept = 0;
        for mut activity in expired {
            if !activity.mark_as_ended(now) {
                continue;
            }
            // Each activity is its own unit of work; one failure must not
            // block sweeping the rest.
            match self.repo.save(&activity).await {
                Ok(_) => {
                    swept += 1;
                    tracing::info!(activity_id = activity.id, "Activity marked as ended");
                }
                Err(e) => {
                    tracing::error!(activity_id = activity.id, "Failed to mark activity as ended: {}", e);
                }
            }
        }

        if swept > 0 {
            tracing::info!(count = swept, "Marked activities as ended");
        }
        Ok(swept)
    }
}
