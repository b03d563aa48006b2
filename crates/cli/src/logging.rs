use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub const LOG_LEVEL_ENV: &str = "BATCH_RENAMER_LOG";

/// Timestamped stderr logger.
pub struct Logger {
    level: Level,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            eprintln!(
                "{} {} [{}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

/// `off` and unknown values fall back to `warn`.
fn parse_level(value: Option<&str>) -> Level {
    value
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .and_then(|filter| filter.to_level())
        .unwrap_or(Level::Warn)
}

pub fn init(verbose: bool) -> anyhow::Result<()> {
    let mut level = parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    if verbose {
        level = level.max(Level::Info);
    }

    static LOGGER: OnceLock<Logger> = OnceLock::new();
    let first_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger { level });

    if first_call {
        log::set_logger(logger)
            .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;
        log::set_max_level(level.to_level_filter());
    }
    Ok(())
}
