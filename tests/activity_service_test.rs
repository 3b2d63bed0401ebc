//! Activity workflow service unit tests.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use mockall::predicate::eq;
use rust_decimal::Decimal;
use uuid::Uuid;

use diveclub::domain::{
    Activity, ActivityChanges, ActivityDraft, ActivityStatus, AuditDecision, Creator, User,
    UserRole,
};
use diveclub::errors::AppError;
use diveclub::infra::MockActivityRepository;
use diveclub::services::{ActivityManager, ActivityService, MockActivityNotifier};

fn test_manager() -> User {
    User::new_manager(
        "Wang Xiaoming".to_string(),
        "manager1@diveclub.com".to_string(),
        "hashed".to_string(),
        "0923456789".to_string(),
        "Events Lead".to_string(),
        NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
    )
}

fn other_manager() -> User {
    User::new_manager(
        "Li Meili".to_string(),
        "manager2@diveclub.com".to_string(),
        "hashed".to_string(),
        "0934567890".to_string(),
        "Training Lead".to_string(),
        NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
    )
}

fn creator_of(user: &User) -> Creator {
    Creator {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn test_draft() -> ActivityDraft {
    let start = Utc::now() + Duration::days(30);
    ActivityDraft {
        title: "Open Water Training".to_string(),
        description: "Two days of open water certification dives".to_string(),
        category: "Dive Training".to_string(),
        location: "Kenting, Pingtung".to_string(),
        max_participants: 20,
        cost: Decimal::new(3500, 0),
        qualifications: None,
        image_url: None,
        start_time: start,
        end_time: start + Duration::days(1),
    }
}

fn test_activity(id: i64, creator: Creator, status: ActivityStatus) -> Activity {
    let mut activity = Activity::new_draft(test_draft(), creator);
    activity.id = id;
    activity.status = status;
    if status == ActivityStatus::NeedsRevision {
        activity.rejection_reason = Some("needs more detail".to_string());
    }
    activity
}

fn changes_from(activity: &Activity) -> ActivityChanges {
    ActivityChanges {
        title: activity.title.clone(),
        description: activity.description.clone(),
        category: activity.category.clone(),
        location: activity.location.clone(),
        max_participants: activity.max_participants,
        cost: activity.cost,
        qualifications: activity.qualifications.clone(),
        image_url: activity.image_url.clone(),
        start_time: activity.start_time,
        end_time: activity.end_time,
    }
}

fn service(
    repo: MockActivityRepository,
    notifier: MockActivityNotifier,
) -> ActivityManager {
    ActivityManager::new(Arc::new(repo), Arc::new(notifier))
}

#[tokio::test]
async fn test_create_activity_starts_in_drafting() {
    let actor = test_manager();
    let creator = creator_of(&actor);

    let mut repo = MockActivityRepository::new();
    repo.expect_insert().returning(|mut activity| {
        activity.id = 7;
        Ok(activity)
    });
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let created = service.create_activity(test_draft(), &actor).await.unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.status, ActivityStatus::Drafting);
    assert_eq!(created.creator, creator);
    assert!(created.rejection_reason.is_none());
}

#[tokio::test]
async fn test_create_activity_requires_manager_role() {
    let mut actor = test_manager();
    actor.role = UserRole::Member;

    let repo = MockActivityRepository::new();
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let result = service.create_activity(test_draft(), &actor).await;

    assert!(matches!(result.unwrap_err(), AppError::Unauthorized));
}

#[tokio::test]
async fn test_create_activity_rejects_invalid_draft() {
    let actor = test_manager();
    let mut draft = test_draft();
    draft.title = "ab".to_string();

    let repo = MockActivityRepository::new();
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let result = service.create_activity(draft, &actor).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_submit_for_review_success_notifies_creator_and_admin() {
    let actor = test_manager();
    let activity = test_activity(1, creator_of(&actor), ActivityStatus::Drafting);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .with(eq(1i64))
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_save().returning(|a| Ok(a.clone()));

    let mut notifier = MockActivityNotifier::new();
    notifier
        .expect_notify_submitted()
        .times(1)
        .returning(|_| ());
    notifier
        .expect_notify_admin_new_submission()
        .times(1)
        .returning(|_| ());

    let service = service(repo, notifier);
    let submitted = service.submit_for_review(1, &actor).await.unwrap();

    assert_eq!(submitted.status, ActivityStatus::PendingReview);
    assert!(submitted.rejection_reason.is_none());
}

#[tokio::test]
async fn test_submit_for_review_not_found() {
    let actor = test_manager();

    let mut repo = MockActivityRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let result = service.submit_for_review(99, &actor).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_ownership_enforced_across_operations() {
    let owner = test_manager();
    let intruder = other_manager();

    for status in [
        ActivityStatus::Drafting,
        ActivityStatus::PendingReview,
        ActivityStatus::Published,
    ] {
        let activity = test_activity(1, creator_of(&owner), status);

        let mut repo = MockActivityRepository::new();
        let found = activity.clone();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let notifier = MockActivityNotifier::new();
        let service = service(repo, notifier);

        let submit = service.submit_for_review(1, &intruder).await;
        assert!(matches!(submit.unwrap_err(), AppError::Unauthorized));

        let update = service
            .update_activity(1, changes_from(&activity), &intruder)
            .await;
        assert!(matches!(update.unwrap_err(), AppError::Unauthorized));

        let delete = service.delete_activity(1, &intruder).await;
        assert!(matches!(delete.unwrap_err(), AppError::Unauthorized));

        let cancel = service.cancel_activity(1, &intruder).await;
        assert!(matches!(cancel.unwrap_err(), AppError::Unauthorized));
    }
}

#[tokio::test]
async fn test_audit_reject_blank_reason_fails_before_any_lookup() {
    // No find_by_id expectation: reaching the store would panic the mock
    let repo = MockActivityRepository::new();
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let result = service
        .audit_activity(1, AuditDecision::Reject { reason: "   ".to_string() })
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_audit_approve_publishes_and_notifies() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::PendingReview);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_save().returning(|a| Ok(a.clone()));

    let mut notifier = MockActivityNotifier::new();
    notifier.expect_notify_approved().times(1).returning(|_| ());

    let service = service(repo, notifier);
    let approved = service.audit_activity(1, AuditDecision::Approve).await.unwrap();

    assert_eq!(approved.status, ActivityStatus::Published);
    assert!(approved.rejection_reason.is_none());
}

#[tokio::test]
async fn test_audit_reject_records_reason_and_notifies() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::PendingReview);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_save().returning(|a| Ok(a.clone()));

    let mut notifier = MockActivityNotifier::new();
    notifier
        .expect_notify_rejected()
        .withf(|_, reason| reason == "needs more detail")
        .times(1)
        .returning(|_, _| ());

    let service = service(repo, notifier);
    let rejected = service
        .audit_activity(1, AuditDecision::Reject { reason: "needs more detail".to_string() })
        .await
        .unwrap();

    assert_eq!(rejected.status, ActivityStatus::NeedsRevision);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("needs more detail"));
}

#[tokio::test]
async fn test_audit_approve_non_pending_fails() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Drafting);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let result = service.audit_activity(1, AuditDecision::Approve).await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_update_published_minor_change_stays_published() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Published);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_save().returning(|a| Ok(a.clone()));

    // Minor change: no admin re-notification expected
    let notifier = MockActivityNotifier::new();

    let mut changes = changes_from(&activity);
    changes.qualifications = Some("AOW license required".to_string());

    let service = service(repo, notifier);
    let updated = service.update_activity(1, changes, &owner).await.unwrap();

    assert_eq!(updated.status, ActivityStatus::Published);
    assert_eq!(updated.qualifications.as_deref(), Some("AOW license required"));
}

#[tokio::test]
async fn test_update_published_major_change_demotes_and_renotifies() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Published);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_save().returning(|a| Ok(a.clone()));

    let mut notifier = MockActivityNotifier::new();
    notifier
        .expect_notify_admin_new_submission()
        .times(1)
        .returning(|_| ());

    let mut changes = changes_from(&activity);
    changes.max_participants += 10;

    let service = service(repo, notifier);
    let updated = service.update_activity(1, changes, &owner).await.unwrap();

    assert_eq!(updated.status, ActivityStatus::PendingReview);
}

#[tokio::test]
async fn test_update_rejected_outside_editable_or_published() {
    let owner = test_manager();

    for status in [
        ActivityStatus::PendingReview,
        ActivityStatus::Ended,
        ActivityStatus::Cancelled,
    ] {
        let activity = test_activity(1, creator_of(&owner), status);

        let mut repo = MockActivityRepository::new();
        let found = activity.clone();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let notifier = MockActivityNotifier::new();

        let service = service(repo, notifier);
        let result = service
            .update_activity(1, changes_from(&activity), &owner)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
    }
}

#[tokio::test]
async fn test_delete_published_fails_but_cancel_succeeds() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Published);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_save().returning(|a| Ok(a.clone()));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);

    let delete = service.delete_activity(1, &owner).await;
    assert!(matches!(delete.unwrap_err(), AppError::InvalidState(_)));

    let cancelled = service.cancel_activity(1, &owner).await.unwrap();
    assert_eq!(cancelled.status, ActivityStatus::Cancelled);
}

#[tokio::test]
async fn test_delete_draft_succeeds() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Drafting);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    repo.expect_delete().with(eq(1i64)).times(1).returning(|_| Ok(()));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    service.delete_activity(1, &owner).await.unwrap();
}

#[tokio::test]
async fn test_cancel_ended_fails() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Ended);

    let mut repo = MockActivityRepository::new();
    let found = activity.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let result = service.cancel_activity(1, &owner).await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
}

#[tokio::test]
async fn test_mark_ended_sweeps_expired_published() {
    let owner = test_manager();

    let mut expired = test_activity(1, creator_of(&owner), ActivityStatus::Published);
    expired.start_time = Utc::now() - Duration::days(3);
    expired.end_time = Utc::now() - Duration::days(2);
    let mut also_expired = test_activity(2, creator_of(&owner), ActivityStatus::Published);
    also_expired.start_time = Utc::now() - Duration::days(2);
    also_expired.end_time = Utc::now() - Duration::days(1);

    let mut repo = MockActivityRepository::new();
    let batch = vec![expired, also_expired];
    repo.expect_find_published_past_end_time()
        .returning(move |_| Ok(batch.clone()));
    repo.expect_save()
        .times(2)
        .returning(|a| {
            assert_eq!(a.status, ActivityStatus::Ended);
            Ok(a.clone())
        });
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let swept = service.mark_ended_activities().await.unwrap();

    assert_eq!(swept, 2);
}

#[tokio::test]
async fn test_mark_ended_is_idempotent() {
    // Second pass: the expired activities are already Ended, so the
    // published-past-end query finds nothing and nothing is saved.
    let mut repo = MockActivityRepository::new();
    repo.expect_find_published_past_end_time()
        .returning(|_| Ok(vec![]));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let swept = service.mark_ended_activities().await.unwrap();

    assert_eq!(swept, 0);
}

#[tokio::test]
async fn test_mark_ended_continues_past_save_failures() {
    let owner = test_manager();

    let mut first = test_activity(1, creator_of(&owner), ActivityStatus::Published);
    first.start_time = Utc::now() - Duration::days(3);
    first.end_time = Utc::now() - Duration::days(2);
    let mut second = test_activity(2, creator_of(&owner), ActivityStatus::Published);
    second.start_time = Utc::now() - Duration::days(2);
    second.end_time = Utc::now() - Duration::days(1);

    let mut repo = MockActivityRepository::new();
    let batch = vec![first, second];
    repo.expect_find_published_past_end_time()
        .returning(move |_| Ok(batch.clone()));
    repo.expect_save().times(2).returning(|a| {
        if a.id == 1 {
            Err(AppError::internal("connection dropped"))
        } else {
            Ok(a.clone())
        }
    });
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);
    let swept = service.mark_ended_activities().await.unwrap();

    // The failed save is logged, the rest of the batch still went through
    assert_eq!(swept, 1);
}

#[tokio::test]
async fn test_query_operations_delegate_to_store() {
    let owner = test_manager();
    let owner_id = owner.id;
    let published = test_activity(1, creator_of(&owner), ActivityStatus::Published);

    let mut repo = MockActivityRepository::new();
    let listed = vec![published.clone()];
    let by_creator = listed.clone();
    let searched = listed.clone();
    repo.expect_find_all_published()
        .returning(move || Ok(listed.clone()));
    repo.expect_find_by_creator()
        .with(eq(owner_id))
        .returning(move |_| Ok(by_creator.clone()));
    repo.expect_search_published()
        .withf(|keyword| keyword == "open water")
        .returning(move |_| Ok(searched.clone()));
    repo.expect_count_by_status()
        .with(eq(ActivityStatus::Published))
        .returning(|_| Ok(1));
    let notifier = MockActivityNotifier::new();

    let service = service(repo, notifier);

    assert_eq!(service.list_published().await.unwrap().len(), 1);
    assert_eq!(service.list_by_creator(owner_id).await.unwrap().len(), 1);
    assert_eq!(service.search_published("open water").await.unwrap().len(), 1);
    assert_eq!(service.count_by_status(ActivityStatus::Published).await.unwrap(), 1);
}

#[tokio::test]
async fn test_full_review_cycle() {
    let owner = test_manager();
    let activity = test_activity(1, creator_of(&owner), ActivityStatus::Drafting);

    // Stateful mock: hand back whatever was last saved
    let state = Arc::new(std::sync::Mutex::new(activity));

    let mut repo = MockActivityRepository::new();
    let find_state = state.clone();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(find_state.lock().unwrap().clone())));
    let save_state = state.clone();
    repo.expect_save().returning(move |a| {
        *save_state.lock().unwrap() = a.clone();
        Ok(a.clone())
    });

    let mut notifier = MockActivityNotifier::new();
    notifier.expect_notify_submitted().times(2).returning(|_| ());
    notifier
        .expect_notify_admin_new_submission()
        .times(2)
        .returning(|_| ());
    notifier.expect_notify_rejected().times(1).returning(|_, _| ());
    notifier.expect_notify_approved().times(1).returning(|_| ());

    let service = service(repo, notifier);

    let submitted = service.submit_for_review(1, &owner).await.unwrap();
    assert_eq!(submitted.status, ActivityStatus::PendingReview);

    let rejected = service
        .audit_activity(1, AuditDecision::Reject { reason: "needs more detail".to_string() })
        .await
        .unwrap();
    assert_eq!(rejected.status, ActivityStatus::NeedsRevision);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("needs more detail"));

    let resubmitted = service.submit_for_review(1, &owner).await.unwrap();
    assert_eq!(resubmitted.status, ActivityStatus::PendingReview);
    assert!(resubmitted.rejection_reason.is_none());

    let approved = service.audit_activity(1, AuditDecision::Approve).await.unwrap();
    assert_eq!(approved.status, ActivityStatus::Published);
}
