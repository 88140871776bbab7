//! Log output
//!
//! Lines go to stderr as `YYYY-MM-DD HH:MM:SS - LEVEL - message` so the
//! scheduler can append them to a log file. `RUST_LOG` refines the level
//! picked on the command line.

use std::io::Write;

use chrono::Local;
use log::LevelFilter;

/// Install the global logger
pub fn init(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });

    // A logger may already be installed when running under a test harness
    let _ = builder.try_init();
}
