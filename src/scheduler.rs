//! Scheduled sweep of expired activities.
//!
//! A timer fires on a fixed cadence (hourly by default, aligned to the wall
//! clock) and promotes published-but-past activities to Ended. Failures are
//! logged and never stop the loop; unswept activities remain published and
//! past-due, so the next tick retries them naturally.

use std::sync::Arc;

use chrono::{Timelike, Utc};
use tokio::time::{sleep, Duration};

use crate::services::ActivityService;

/// Run the sweep loop forever. Callers race this against a shutdown signal.
pub async fn run(service: Arc<dyn ActivityService>, interval_secs: u64) {
    tracing::info!(interval_secs, "Activity sweep scheduler started");

    loop {
        sleep(delay_until_next_tick(interval_secs)).await;

        tracing::info!("Running scheduled task: mark ended activities");
        match service.mark_ended_activities().await {
            Ok(swept) => tracing::info!(swept, "Scheduled sweep completed"),
            Err(e) => tracing::error!("Scheduled sweep failed: {}", e),
        }
    }
}

/// Time until the next wall-clock-aligned tick, so an hourly sweep fires at
/// the top of the hour.
fn delay_until_next_tick(interval_secs: u64) -> Duration {
    let interval_secs = interval_secs.max(1);
    let seconds_today = u64::from(Utc::now().num_seconds_from_midnight());
    let into_interval = seconds_today % interval_secs;
    Duration::from_secs(interval_secs - into_interval)
}
