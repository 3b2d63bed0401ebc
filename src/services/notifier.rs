//! Activity notifications.
//!
//! Dispatch is fire-and-forget relative to the workflow operation: every
//! failure is logged here and swallowed, so a dead mail queue can never fail
//! or roll back a submit/approve/reject.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use crate::config::Config;
use crate::domain::Activity;
use crate::jobs::EmailJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Notification sender consumed by the workflow service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActivityNotifier: Send + Sync {
    /// Tell the creator their activity was submitted for review
    async fn notify_submitted(&self, activity: &Activity);

    /// Tell the creator their activity was approved and published
    async fn notify_approved(&self, activity: &Activity);

    /// Tell the creator their activity was rejected, with the reason
    async fn notify_rejected(&self, activity: &Activity, reason: &str);

    /// Alert the administrator channel that a submission awaits review
    async fn notify_admin_new_submission(&self, activity: &Activity);
}

/// Notifier that formats emails and enqueues them on the job queue.
pub struct EmailNotifier {
    storage: Option<PostgresStorage<EmailJob>>,
    app_name: String,
    admin_email: String,
}

impl EmailNotifier {
    /// Create a notifier backed by the apalis email queue
    pub fn new(storage: PostgresStorage<EmailJob>, config: &Config) -> Self {
        Self {
            storage: Some(storage),
            app_name: config.app_name.clone(),
            admin_email: config.admin_email.clone(),
        }
    }

    /// Create a notifier with no queue; emails are logged and dropped.
    /// Used by one-shot commands that never send mail.
    pub fn disabled(config: &Config) -> Self {
        Self {
            storage: None,
            app_name: config.app_name.clone(),
            admin_email: config.admin_email.clone(),
        }
    }

    async fn enqueue(&self, job: EmailJob) {
        match &self.storage {
            Some(storage) => {
                if let Err(e) = storage.clone().push(job).await {
                    tracing::warn!("Failed to enqueue notification email: {}", e);
                }
            }
            None => {
                tracing::debug!(to = %job.to, subject = %job.subject, "Email queue disabled, dropping notification");
            }
        }
    }

    fn subject(&self, label: &str, activity: &Activity) -> String {
        format!("[{}] {} - {}", self.app_name, label, activity.title)
    }
}

#[async_trait]
impl ActivityNotifier for EmailNotifier {
    async fn notify_submitted(&self, activity: &Activity) {
        let body = format!(
            "Dear {},\n\n\
             Your activity has been submitted for review.\n\n\
             Activity: {}\n\
             Submitted at: {}\n\n\
             The administrator will review it shortly; you will be notified of the result by email.\n\n\
             {} Team",
            activity.creator.name,
            activity.title,
            activity.created_at.format("%Y-%m-%d %H:%M"),
            self.app_name,
        );
        self.enqueue(EmailJob::new(
            activity.creator.email.clone(),
            self.subject("Activity submitted for review", activity),
            body,
        ))
        .await;

        tracing::info!(
            activity_id = activity.id,
            to = %activity.creator.email,
            "Submission notification queued"
        );
    }

    async fn notify_approved(&self, activity: &Activity) {
        let body = format!(
            "Dear {},\n\n\
             Your activity has been approved!\n\n\
             Activity: {}\n\
             Time: {} to {}\n\
             Location: {}\n\n\
             It is now published and members can browse and register.\n\n\
             {} Team",
            activity.creator.name,
            activity.title,
            activity.start_time.format("%Y-%m-%d %H:%M"),
            activity.end_time.format("%Y-%m-%d %H:%M"),
            activity.location,
            self.app_name,
        );
        self.enqueue(EmailJob::new(
            activity.creator.email.clone(),
            self.subject("Activity approved", activity),
            body,
        ))
        .await;

        tracing::info!(
            activity_id = activity.id,
            to = %activity.creator.email,
            "Approval notification queued"
        );
    }

    async fn notify_rejected(&self, activity: &Activity, reason: &str) {
        let body = format!(
            "Dear {},\n\n\
             Your activity needs revision before it can be published.\n\n\
             Activity: {}\n\
             Reason: {}\n\n\
             Please revise it accordingly and submit it for review again.\n\n\
             {} Team",
            activity.creator.name, activity.title, reason, self.app_name,
        );
        self.enqueue(EmailJob::new(
            activity.creator.email.clone(),
            self.subject("Activity needs revision", activity),
            body,
        ))
        .await;

        tracing::info!(
            activity_id = activity.id,
            to = %activity.creator.email,
            "Rejection notification queued"
        );
    }

    async fn notify_admin_new_submission(&self, activity: &Activity) {
        let body = format!(
            "Hello,\n\n\
             A new activity is awaiting review:\n\n\
             Activity: {}\n\
             Created by: {} ({})\n\
             Time: {} to {}\n\
             Location: {}\n\n\
             Please log in to review it.\n\n\
             {}",
            activity.title,
            activity.creator.name,
            activity.creator.email,
            activity.start_time.format("%Y-%m-%d %H:%M"),
            activity.end_time.format("%Y-%m-%d %H:%M"),
            activity.location,
            self.app_name,
        );
        self.enqueue(EmailJob::new(
            self.admin_email.clone(),
            self.subject("New activity awaiting review", activity),
            body,
        ))
        .await;

        tracing::info!(activity_id = activity.id, "Admin notification queued");
    }
}
