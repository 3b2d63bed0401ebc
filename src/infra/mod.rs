//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories over the persistence store

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{ActivityRepository, ActivityStore, ManagerRepository, ManagerStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockActivityRepository, MockManagerRepository};
