//! Run command - the sweep scheduler daemon.
//!
//! Connects to the database, wires the workflow service to the email queue,
//! and keeps the scheduler running until ctrl-c.

use std::sync::Arc;

use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{ActivityStore, Database};
use crate::jobs::EmailJob;
use crate::scheduler;
use crate::services::{ActivityManager, ActivityService, EmailNotifier};

/// Execute the run command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;

    // The email queue shares the application database
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    let email_storage: PostgresStorage<EmailJob> = PostgresStorage::new(pool);

    let repo = Arc::new(ActivityStore::new(db.get_connection()));
    let notifier = Arc::new(EmailNotifier::new(email_storage, &config));
    let service: Arc<dyn ActivityService> = Arc::new(ActivityManager::new(repo, notifier));

    tracing::info!("Scheduler daemon started. Press Ctrl+C to stop.");

    tokio::select! {
        _ = scheduler::run(service, config.sweep_interval_secs) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping scheduler...");
        }
    }

    Ok(())
}
