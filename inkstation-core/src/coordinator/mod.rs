//! Update coordination
//!
//! Runs one update cycle per invocation against injected collaborators.

pub mod cycle;
pub mod schedule;
pub mod state;

pub use cycle::{
    CycleError, CycleIssue, CycleOptions, CycleResult, CycleStatus, FetchKind, UpdateCoordinator,
};
pub use schedule::{current_due, forecast_due, FetchPlan};
pub use state::StationState;
