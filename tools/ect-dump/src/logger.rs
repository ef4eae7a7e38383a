use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes log records to stderr, leaving stdout to the dump itself.
pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Install as the global logger. Call once, before decoding.
    #[allow(clippy::missing_errors_doc)]
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message"
        eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}
