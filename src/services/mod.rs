//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod activity_service;
mod notifier;

pub use activity_service::{ActivityManager, ActivityService};
pub use notifier::{ActivityNotifier, EmailNotifier};

#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockActivityNotifier;
