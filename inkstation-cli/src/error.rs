//! Binary error type and exit codes

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use inkstation_core::config::ConfigError;
use inkstation_core::coordinator::CycleError;
use inkstation_core::layout::LayoutError;

/// Exit code for a fatal layout or render error
pub const EXIT_CYCLE_FAILED: u8 = 1;
/// Exit code for configuration and environment problems
pub const EXIT_SETUP_FAILED: u8 = 2;

/// Errors that end a run before or during the cycle
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(#[from] ConfigError),

    #[error("{name} is set to {value:?}, which is not a number")]
    EnvOverride { name: &'static str, value: String },

    #[error("invalid --now {0:?}, expected YYYY-MM-DDTHH:MM")]
    InvalidNow(String),

    #[error("cannot use state directory {}: {source}", .path.display())]
    StateDir { path: PathBuf, source: io::Error },

    #[error("cannot take cycle lock {}: {source}", .path.display())]
    Lock { path: PathBuf, source: io::Error },

    #[error("cannot open panel image {}: {source}", .path.display())]
    Panel { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Cycle(#[from] CycleError),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Layout(_) | AppError::Cycle(_) => EXIT_CYCLE_FAILED,
            _ => EXIT_SETUP_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstation_core::render::RenderError;

    #[test]
    fn test_exit_codes() {
        let render = AppError::from(CycleError::Render(RenderError::MissingCurrentWeather));
        assert_eq!(render.exit_code(), EXIT_CYCLE_FAILED);

        let layout = AppError::from(LayoutError::InvalidRatio("split_ratio"));
        assert_eq!(layout.exit_code(), EXIT_CYCLE_FAILED);

        let lock = AppError::Lock {
            path: PathBuf::from("/run/inkstation.lock"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(lock.exit_code(), EXIT_SETUP_FAILED);
        assert!(lock.to_string().contains("/run/inkstation.lock"));
    }
}
