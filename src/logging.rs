use anyhow::{Context, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Warn/error record surfaced to the interactive shell
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
    pub timestamp: Instant,
}

/// Logger for the long-running coordinator: writes to a rolling file and
/// forwards loud records to an optional flash message channel
struct PromptrLogger {
    file_writer: Mutex<RollingFileAppender>,
    flash_tx: Option<Sender<FlashMessage>>,
    file_level: LevelFilter,
    flash_level: LevelFilter,
}

impl Log for PromptrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.file_level || metadata.level() <= self.flash_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!("{}", record.args());
        let level = record.level();

        if level <= self.file_level {
            if let Ok(mut writer) = self.file_writer.lock() {
                let _ = writeln!(
                    writer,
                    "{} [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    level,
                    message
                );
            }
        }

        if level <= self.flash_level {
            if let Some(tx) = &self.flash_tx {
                let _ = tx.send(FlashMessage {
                    level,
                    message,
                    timestamp: Instant::now(),
                });
            }
        }
    }

    fn flush(&self) {
        // RollingFileAppender handles flushing automatically
    }
}

/// Parse log level string to LevelFilter
fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the coordinator logger
///
/// Rotation is daily with three retained files. Pass a flash sender to
/// mirror warn/error records into the shell's notice area.
pub fn init_logger(
    log_file_path: PathBuf,
    flash_tx: Option<Sender<FlashMessage>>,
    file_level: &str,
    flash_level: &str,
) -> Result<()> {
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(
            log_file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("promptr"),
        )
        .filename_suffix(
            log_file_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log"),
        )
        .build(
            log_file_path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path"))?,
        )
        .context("Failed to create rotating file appender")?;

    let file_level = parse_level(file_level);
    let flash_level = parse_level(flash_level);

    let logger = PromptrLogger {
        file_writer: Mutex::new(file_appender),
        flash_tx,
        file_level,
        flash_level,
    };

    let max_level = file_level.max(flash_level);
    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(max_level);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("error"), LevelFilter::Error);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("Info"), LevelFilter::Info);
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }
}
