//! Diving club activity management backend.
//!
//! Managers draft and submit activities, the administrator approves or
//! rejects them, and the public browses what gets published. The core of the
//! system is the activity lifecycle state machine and its authorization-gated
//! transitions, with a time-driven sweep that ends published activities whose
//! end time has passed.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Activity entity, state machine, and identity model
//! - **services**: Workflow service and notification dispatch
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **jobs**: Background email jobs
//! - **scheduler**: Time-driven status sweep
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the sweep scheduler daemon
//! cargo run -- run
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Process queued notification emails
//! cargo run -- jobs work
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod scheduler;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Activity, ActivityStatus, User, UserRole};
pub use errors::{AppError, AppResult};
pub use services::{ActivityManager, ActivityService};
