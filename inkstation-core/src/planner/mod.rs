//! Refresh planner
//!
//! Chooses, per region, between skipping, a partial refresh and a full
//! refresh, and orders the resulting panel operations.

pub mod plan;
pub mod state;

pub use plan::{plan, region_state, EntryRegions, PlanEntry, PlanPolicy, UpdatePlan};
pub use state::{RegionEvent, RegionState};
