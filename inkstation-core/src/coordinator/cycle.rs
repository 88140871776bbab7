//! Update cycle
//!
//! One cycle fetches what is due, renders every region, diffs against the
//! region cache, plans the panel operations and issues them. Only layout
//! and render failures abort a cycle; fetch and panel failures degrade it.

use alloc::vec::Vec;

use chrono::NaiveDateTime;
use inkstation_display::{DisplayController, DisplayError};
use log::{debug, error, info, warn};
use thiserror::Error;

use super::schedule::FetchPlan;
use super::state::StationState;
use crate::cache::DirtySet;
use crate::config::StationConfig;
use crate::domain::UserContent;
use crate::layout::{Layout, LayoutError, RegionName};
use crate::planner::{plan, PlanPolicy};
use crate::render::{render, RenderError};
use crate::traits::{FetchError, StateStore, WeatherProvider};

/// Fatal cycle errors
///
/// Nothing has been written to the panel and the region cache is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Per-cycle switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleOptions {
    /// Write every region with a full refresh, ignoring the cache
    pub force_full: bool,
    /// Fetch current weather and forecast regardless of schedule
    pub fetch_all: bool,
}

/// Which fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Current,
    Forecast,
}

impl FetchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FetchKind::Current => "current weather",
            FetchKind::Forecast => "forecast",
        }
    }
}

/// Non-fatal fault recorded during a cycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleIssue {
    /// Fetch failed; cached values were used
    #[error("{} fetch failed: {error}", .kind.as_str())]
    Fetch { kind: FetchKind, error: FetchError },
    /// Panel rejected a plan entry; its regions stay dirty
    #[error("panel write of {} region(s) failed: {error}", .regions.len())]
    Display {
        regions: Vec<RegionName>,
        error: DisplayError,
    },
}

/// Overall outcome of a completed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// Everything fetched and written
    Success,
    /// Stale data shown or some regions not written
    Degraded,
}

/// Report of a completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleResult {
    pub status: CycleStatus,
    /// Cycle number in the region cache
    pub cycle: u64,
    /// Regions the panel accepted, in write order
    pub regions_written: Vec<RegionName>,
    /// Non-fatal faults
    pub errors: Vec<CycleIssue>,
    /// Number of plan entries issued
    pub planned: usize,
    /// Whether the plan was one whole-panel refresh
    pub coalesced: bool,
    /// Fetches attempted
    pub fetched: FetchPlan,
}

impl CycleResult {
    /// Check if the cycle completed without any fault
    pub fn success(&self) -> bool {
        self.status == CycleStatus::Success
    }

    /// Check if the cycle completed with faults
    pub fn is_degraded(&self) -> bool {
        self.status == CycleStatus::Degraded
    }
}

/// Runs update cycles for one station configuration
#[derive(Debug, Clone)]
pub struct UpdateCoordinator {
    config: StationConfig,
    layout: Layout,
    user: UserContent,
}

impl UpdateCoordinator {
    /// Create a coordinator, computing the layout up front
    pub fn new(config: StationConfig) -> Result<Self, LayoutError> {
        let layout = Layout::compute(config.panel.width, config.panel.height, &config.layout)
            .inspect_err(|e| error!("Invalid layout: {}", e))?;
        debug!(
            "Layout for {}x{} panel, fingerprint {}",
            config.panel.width,
            config.panel.height,
            layout.fingerprint()
        );
        Ok(Self {
            config,
            layout,
            user: UserContent::Empty,
        })
    }

    /// Set the user block content
    pub fn with_user_content(mut self, user: UserContent) -> Self {
        self.user = user;
        self
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Load persisted state for this coordinator's layout
    pub fn load_state<S: StateStore + ?Sized>(&self, store: &mut S) -> StationState {
        StationState::load(store, &self.layout)
    }

    /// Run one update cycle
    pub fn run_cycle<W, D>(
        &self,
        now: NaiveDateTime,
        state: &mut StationState,
        weather: &mut W,
        display: &mut D,
        options: CycleOptions,
    ) -> Result<CycleResult, CycleError>
    where
        W: WeatherProvider + ?Sized,
        D: DisplayController + ?Sized,
    {
        self.check_panel(display)?;

        let mut errors = Vec::new();
        let fetched = FetchPlan::decide(
            now,
            &self.config.schedule,
            &state.weather,
            options.fetch_all,
        );
        debug!(
            "Fetch plan: current={} forecast={}",
            fetched.current, fetched.forecast
        );

        if fetched.current {
            match weather.get_current(&self.config.location) {
                Ok(current) => state.weather.update_current(current, now),
                Err(error) => {
                    warn!("Current weather fetch failed, using cached values: {}", error);
                    errors.push(CycleIssue::Fetch {
                        kind: FetchKind::Current,
                        error,
                    });
                }
            }
        }
        if fetched.forecast {
            match weather.get_forecast(&self.config.location) {
                Ok(days) => state.weather.update_forecast(days, now),
                Err(error) => {
                    warn!("Forecast fetch failed, using cached values: {}", error);
                    errors.push(CycleIssue::Fetch {
                        kind: FetchKind::Forecast,
                        error,
                    });
                }
            }
        }

        let snapshot = state.weather.snapshot(now, &self.user, self.config.units);
        let contents = render(&self.layout, &snapshot).inspect_err(|e| {
            error!("Render failed, panel left untouched: {}", e);
        })?;

        let cycle = state.cache.begin_cycle();
        let dirty = if options.force_full {
            DirtySet::new()
        } else {
            state
                .cache
                .diff(&contents, self.config.refresh.max_partial_age)
        };
        let policy = PlanPolicy::from_config(&self.config.refresh, options.force_full);
        let update = plan(&dirty, &contents, &state.cache, self.layout.panel(), &policy);

        let mut regions_written = Vec::new();
        let mut failed = 0;
        for entry in update.iter() {
            let result = display
                .write_region(&entry.bitmap, entry.rect)
                .and_then(|()| display.refresh(entry.mode));

            match result {
                Ok(()) => {
                    for (region, hash) in &entry.regions {
                        state.cache.commit(*region, *hash, now, entry.mode);
                        regions_written.push(*region);
                    }
                }
                Err(error) => {
                    let regions: Vec<RegionName> = entry.regions.iter().map(|(r, _)| *r).collect();
                    warn!(
                        "Panel rejected {} refresh of {} at {}: {}",
                        entry.mode,
                        regions.len(),
                        entry.rect,
                        error
                    );
                    failed += 1;
                    errors.push(CycleIssue::Display { regions, error });
                }
            }
        }

        let status = if errors.is_empty() {
            CycleStatus::Success
        } else {
            CycleStatus::Degraded
        };

        info!(
            "Cycle {}: {} of {} operations, {} regions written{}{}",
            cycle,
            update.len() - failed,
            update.len(),
            regions_written.len(),
            if update.is_coalesced() { " (coalesced)" } else { "" },
            if status == CycleStatus::Degraded { ", degraded" } else { "" },
        );

        Ok(CycleResult {
            status,
            cycle,
            regions_written,
            errors,
            planned: update.len(),
            coalesced: update.is_coalesced(),
            fetched,
        })
    }

    fn check_panel<D: DisplayController + ?Sized>(&self, display: &D) -> Result<(), LayoutError> {
        let (actual_width, actual_height) = display.dimensions();
        let panel = self.config.panel;
        if (actual_width, actual_height) != (panel.width, panel.height) {
            let err = LayoutError::PanelMismatch {
                width: panel.width,
                height: panel.height,
                actual_width,
                actual_height,
            };
            error!("Cycle aborted: {}", err);
            return Err(err);
        }
        Ok(())
    }
}
