//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    tracing::info!("Running migration command...");

    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations()
                .await
                .map_err(|e| AppError::internal(format!("Migration failed: {}", e)))?;
            println!("Migrations applied.");
        }
        MigrateAction::Down => {
            db.rollback_migration()
                .await
                .map_err(|e| AppError::internal(format!("Rollback failed: {}", e)))?;
            println!("Last migration rolled back.");
        }
        MigrateAction::Status => {
            let statuses = db
                .migration_status()
                .await
                .map_err(|e| AppError::internal(format!("Status query failed: {}", e)))?;

            println!("\n=== Migration Status ===");
            for (name, applied) in statuses {
                let marker = if applied { "applied" } else { "pending" };
                println!("{:<50} {}", name, marker);
            }
            println!("========================\n");
        }
        MigrateAction::Fresh => {
            db.fresh_migrations()
                .await
                .map_err(|e| AppError::internal(format!("Fresh migration failed: {}", e)))?;
            println!("Database reset and migrations re-applied.");
        }
    }

    Ok(())
}
