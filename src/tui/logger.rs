use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Log lines shared between the logger and the UI.
pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

/// Captures `log` records into a buffer the log pane renders, since the
/// alternate screen leaves no room for stderr output.
pub struct TuiLogger {
    level: LevelFilter,
    buffer: LogBuffer,
}

impl TuiLogger {
    pub const CAPACITY: usize = 200;

    pub fn new(level: LevelFilter) -> (Self, LogBuffer) {
        let buffer: LogBuffer = Arc::new(Mutex::new(VecDeque::with_capacity(Self::CAPACITY)));
        (TuiLogger { level, buffer: buffer.clone() }, buffer)
    }

    /// Install as the global logger. `RUST_LOG` may hold a plain level name.
    pub fn install() -> Result<LogBuffer, SetLoggerError> {
        let level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let (logger, buffer) = Self::new(level);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(buffer)
    }
}

impl Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
            Level::Trace => "TRC",
        };
        if let Ok(mut buffer) = self.buffer.lock() {
            if buffer.len() == Self::CAPACITY {
                buffer.pop_front();
            }
            buffer.push_back(format!("{tag} {}", record.args()));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_recent_lines_at_level() {
        let (logger, buffer) = TuiLogger::new(LevelFilter::Info);
        for i in 0..(TuiLogger::CAPACITY + 5) {
            logger.log(
                &Record::builder()
                    .level(Level::Info)
                    .args(format_args!("line {i}"))
                    .build(),
            );
        }
        logger.log(&Record::builder().level(Level::Debug).args(format_args!("hidden")).build());
        let buf = buffer.lock().unwrap();
        assert_eq!(buf.len(), TuiLogger::CAPACITY);
        assert_eq!(buf.front().map(String::as_str), Some("INF line 5"));
        assert!(buf.iter().all(|l| !l.contains("hidden")));
    }
}
