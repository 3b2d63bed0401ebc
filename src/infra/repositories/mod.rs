//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod activity_repository;
pub(crate) mod entities;
mod manager_repository;

pub use activity_repository::{ActivityRepository, ActivityStore};
pub use manager_repository::{ManagerRepository, ManagerStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use activity_repository::MockActivityRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use manager_repository::MockManagerRepository;
