//! Scheduler, telemetry and command-line surface for driving a simulation.

pub mod cli;
pub mod scheduler;
pub mod telemetry;

pub use scheduler::{Scheduler, SchedulerHandle, SchedulerOptions, SchedulerStatus};
