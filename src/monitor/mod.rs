//! Check cycle: scheduling, aggregation and notification
//!
//! ```text
//! run_scheduled / run_manual
//!        |
//!        v
//!   CheckScheduler --skip--> CycleOutcome::Skipped
//!        | run (after jitter)
//!        v
//!   check_packages (ModuleHost + ReleaseFetcher, settle-all)
//!        |
//!        v
//!   NotificationGate (fingerprint, hide, snooze) --> Presenter
//! ```

pub mod aggregator;
pub mod fingerprint;
pub mod gate;
pub mod host;
pub mod report;
pub mod runner;
pub mod scheduler;

pub use runner::{Collaborators, CycleOutcome, Monitor, MonitorError};
