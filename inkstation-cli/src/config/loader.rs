//! Station configuration file
//!
//! The file is the core `StationConfig` plus a `[paths]` table telling the
//! binary where its state, panel image and weather feed live. Relative paths
//! are resolved against the directory holding the config file, so a cron
//! entry does not depend on its working directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use inkstation_core::config::StationConfig;

use crate::error::AppError;

/// Environment variable overriding `location.latitude`
pub const LATITUDE_VAR: &str = "INKSTATION_LATITUDE";
/// Environment variable overriding `location.longitude`
pub const LONGITUDE_VAR: &str = "INKSTATION_LONGITUDE";

/// File locations used by the binary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the persisted state and the cycle lock
    pub state_dir: PathBuf,
    /// PBM image standing in for the panel
    pub panel_image: PathBuf,
    /// Directory holding `current.json` and `forecast.json`
    pub weather_feed_dir: PathBuf,
    /// Picture shown in the user block
    pub user_image: Option<PathBuf>,
    /// Text shown in the user block when no picture is configured
    pub user_text: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("state"),
            panel_image: PathBuf::from("panel.pbm"),
            weather_feed_dir: PathBuf::from("feed"),
            user_image: None,
            user_text: None,
        }
    }
}

impl PathsConfig {
    /// Make every relative path relative to `base`
    fn resolve(&mut self, base: &Path) {
        for path in [
            &mut self.state_dir,
            &mut self.panel_image,
            &mut self.weather_feed_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        if let Some(image) = self.user_image.as_mut() {
            if image.is_relative() {
                *image = base.join(&*image);
            }
        }
    }
}

/// Complete binary configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub station: StationConfig,
    pub paths: PathsConfig,
}

/// Parse and validate configuration text
///
/// `env` looks up environment overrides; paths are left as written.
pub fn parse_config<F>(text: &str, path: &Path, env: F) -> Result<CliConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: CliConfig = toml::from_str(text).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    apply_env_overrides(&mut config.station, env)?;
    config.station.validate()?;
    Ok(config)
}

/// Load the configuration file at `path`
pub fn load_config(path: &Path) -> Result<CliConfig, AppError> {
    info!("Loading configuration from {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes of TOML", text.len());

    let mut config = parse_config(&text, path, |name| std::env::var(name).ok())?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    config.paths.resolve(base);

    log_config_summary(&config);
    Ok(config)
}

fn apply_env_overrides<F>(station: &mut StationConfig, env: F) -> Result<(), AppError>
where
    F: Fn(&str) -> Option<String>,
{
    for (name, target) in [
        (LATITUDE_VAR, &mut station.location.latitude),
        (LONGITUDE_VAR, &mut station.location.longitude),
    ] {
        if let Some(value) = env(name) {
            *target = value
                .trim()
                .parse()
                .map_err(|_| AppError::EnvOverride { name, value })?;
            debug!("{} overrides configured location", name);
        }
    }
    Ok(())
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &CliConfig) {
    let station = &config.station;
    info!("Configuration loaded successfully");
    debug!(
        "  panel {}x{}, split {}",
        station.panel.width, station.panel.height, station.layout.split_ratio
    );
    debug!(
        "  current weather at :{:02}, forecast at {:02}:{:02}",
        station.schedule.current_weather_minute,
        station.schedule.forecast_hour,
        station.schedule.current_weather_minute
    );
    debug!(
        "  full refresh after {} cycles or {} partials",
        station.refresh.max_partial_age, station.refresh.ghosting_threshold
    );
    debug!("  state in {}", config.paths.state_dir.display());
    debug!("  panel image {}", config.paths.panel_image.display());
}
