//! Sweep command - one sweep pass for cron-style deployments.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{ActivityStore, Database};
use crate::services::{ActivityManager, ActivityService, EmailNotifier};

/// Execute the sweep command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    let repo = Arc::new(ActivityStore::new(db.get_connection()));
    // The sweep transition sends no mail; no queue needed
    let notifier = Arc::new(EmailNotifier::disabled(&config));
    let service = ActivityManager::new(repo, notifier);

    let swept = service.mark_ended_activities().await?;
    println!("Swept {} activity(ies) into ENDED.", swept);

    Ok(())
}
