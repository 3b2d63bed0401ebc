//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod activity;
pub mod user;

pub use activity::{
    Activity, ActivityChanges, ActivityDraft, ActivityStatus, AuditDecision, Creator,
};
pub use user::{User, UserRole};
