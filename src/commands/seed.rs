//! Seed command - Populate the database with sample accounts.
//!
//! Idempotent: skips entirely when any manager already exists. Credentials
//! are stored as opaque strings; hashing belongs to the identity boundary.

use chrono::NaiveDate;

use crate::config::Config;
use crate::domain::User;
use crate::errors::AppResult;
use crate::infra::{Database, ManagerRepository, ManagerStore};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let managers = ManagerStore::new(db.get_connection());

    if managers.count().await? > 0 {
        tracing::info!("Database already contains managers, skipping seed.");
        return Ok(());
    }

    tracing::info!("Seeding database with sample accounts...");

    let admin = User::new_admin(
        "Club Admin".to_string(),
        config.admin_email.clone(),
        seed_password("SEED_ADMIN_PASSWORD"),
        "0912345678".to_string(),
        "President".to_string(),
        NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
        "President".to_string(),
    );
    let admin = managers.insert(admin).await?;
    tracing::info!(email = %admin.email, "Created administrator");

    let manager1 = User::new_manager(
        "Wang Xiaoming".to_string(),
        "manager1@diveclub.com".to_string(),
        seed_password("SEED_MANAGER_PASSWORD"),
        "0923456789".to_string(),
        "Events Lead".to_string(),
        NaiveDate::from_ymd_opt(2023, 3, 1).expect("valid date"),
    );
    let manager1 = managers.insert(manager1).await?;
    tracing::info!(email = %manager1.email, "Created manager");

    let manager2 = User::new_manager(
        "Li Meili".to_string(),
        "manager2@diveclub.com".to_string(),
        seed_password("SEED_MANAGER_PASSWORD"),
        "0934567890".to_string(),
        "Training Lead".to_string(),
        NaiveDate::from_ymd_opt(2023, 5, 1).expect("valid date"),
    );
    let manager2 = managers.insert(manager2).await?;
    tracing::info!(email = %manager2.email, "Created manager");

    tracing::info!("Database seed completed.");
    Ok(())
}

fn seed_password(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| "change-me".to_string())
}
