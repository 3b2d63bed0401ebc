//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `run` - Start the sweep scheduler daemon
//! - `sweep` - Run one sweep pass and exit
//! - `migrate` - Database migrations
//! - `jobs` - Background job management
//! - `seed` - Bootstrap sample accounts

pub mod args;

pub use args::{Cli, Commands};
