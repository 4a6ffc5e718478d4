use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Writes diagnostics to standard error, keeping standard output free for commands.
pub struct StderrLogger {
    level: Level,
    timestamps: bool,
}

impl StderrLogger {
    pub fn new(level: Level, timestamps: bool) -> Self {
        Self { level, timestamps }
    }

    pub fn init(level: Level, timestamps: bool) -> Result<(), SetLoggerError> {
        let logger = LOGGER.get_or_init(|| StderrLogger::new(level, timestamps));

        // 将 Level 转换为对应的 LevelFilter
        let level_filter = match logger.level {
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
        };

        log::set_logger(logger).map(|()| log::set_max_level(level_filter))
    }

    /// Status lines go out verbatim; other levels carry a tag.
    fn format_record(&self, record: &Record) -> String {
        if self.timestamps {
            return format!(
                "{} [{}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.args()
            );
        }
        match record.level() {
            Level::Info => record.args().to_string(),
            level => format!("[{}] {}", level, record.args()),
        }
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", self.format_record(record));
        }
    }

    fn flush(&self) {}
}
