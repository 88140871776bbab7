//! Inkstation - E-paper Weather Station
//!
//! Runs one update cycle per invocation and exits; cron starts it once a
//! minute. Each run loads the station configuration, takes the cycle lock,
//! restores the region and weather caches, lets the core decide what to
//! fetch, draw and refresh, and saves the caches for the next run.
//!
//! Exit codes: 0 on success, degraded success or a skipped run, 1 on a
//! fatal layout or render error, 2 on configuration or environment errors.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info, warn, LevelFilter};

use inkstation_core::coordinator::{CycleOptions, UpdateCoordinator};
use inkstation_core::layout::RegionName;
use inkstation_core::traits::{Clock, FixedClock};

use crate::clock::{parse_now, SystemClock};
use crate::config::load_config;
use crate::error::AppError;
use crate::feed::FeedProvider;
use crate::lock::StationLock;
use crate::panel::PbmPanel;
use crate::store::FileStateStore;
use crate::user_image::user_content;

mod clock;
mod config;
mod error;
mod feed;
mod lock;
mod logging;
mod panel;
mod store;
mod user_image;

#[cfg(test)]
mod test_util;

#[derive(Parser, Debug)]
#[command(name = "inkstation")]
#[command(about = "Run one e-paper weather station update cycle")]
#[command(version)]
struct Cli {
    /// Station configuration file
    #[arg(short, long, default_value = "station.toml")]
    config: PathBuf,

    /// Redraw every region with a full refresh, ignoring the region cache
    #[arg(long)]
    force_full: bool,

    /// Fetch current weather and forecast regardless of the schedule
    #[arg(long)]
    fetch_all: bool,

    /// Run as if the local time were this
    #[arg(long, value_name = "YYYY-MM-DDTHH:MM")]
    now: Option<String>,

    /// Wait for a running cycle to finish instead of skipping this one
    #[arg(long)]
    wait_lock: bool,

    /// Log per-region decisions
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let clock: Box<dyn Clock> = match &cli.now {
        Some(value) => Box::new(FixedClock(parse_now(value)?)),
        None => Box::new(SystemClock),
    };
    let now = clock.now();

    let config = load_config(&cli.config)?;
    let paths = &config.paths;

    fs::create_dir_all(&paths.state_dir).map_err(|source| AppError::StateDir {
        path: paths.state_dir.clone(),
        source,
    })?;

    let lock = if cli.wait_lock {
        StationLock::acquire(&paths.state_dir)?
    } else {
        match StationLock::try_acquire(&paths.state_dir)? {
            Some(lock) => lock,
            None => {
                warn!("Another cycle is still running, skipping {}", now);
                return Ok(());
            }
        }
    };

    info!("Starting cycle for {}", now.format("%Y-%m-%d %H:%M"));
    debug!("Holding {}", lock.path().display());

    let coordinator = UpdateCoordinator::new(config.station.clone())?;
    let user = coordinator
        .layout()
        .get(RegionName::UserBlock)
        .map(|block| user_content(paths, block))
        .unwrap_or_default();
    let coordinator = coordinator.with_user_content(user);

    let mut store = FileStateStore::new(&paths.state_dir);
    let mut state = coordinator.load_state(&mut store);

    let panel_config = config.station.panel;
    let mut panel = PbmPanel::open(&paths.panel_image, panel_config.width, panel_config.height)
        .map_err(|source| AppError::Panel {
            path: paths.panel_image.clone(),
            source,
        })?;
    let mut feed = FeedProvider::new(&paths.weather_feed_dir);

    let options = CycleOptions {
        force_full: cli.force_full,
        fetch_all: cli.fetch_all,
    };
    let result = coordinator.run_cycle(now, &mut state, &mut feed, &mut panel, options)?;

    let (full, partial) = panel.refreshes();
    debug!("Panel refreshes: {} full, {} partial", full, partial);

    if let Err(e) = state.save(&mut store) {
        warn!("Cannot save state, the next cycle starts cold: {}", e);
    }

    if result.is_degraded() {
        warn!(
            "Cycle {} degraded with {} issue(s)",
            result.cycle,
            result.errors.len()
        );
    }
    drop(lock);
    Ok(())
}
