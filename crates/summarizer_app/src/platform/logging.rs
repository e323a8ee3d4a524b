//! Logger setup for the desktop app.
//!
//! `SUMMARIZER_LOG` picks the destination: `terminal` (default), `file`
//! (`./summarizer.log` in the working directory) or `both`.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_DESTINATION_VAR: &str = "SUMMARIZER_LOG";
const LOG_FILE: &str = "./summarizer.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    File,
    Terminal,
    Both,
}

impl LogDestination {
    /// Unknown or missing values fall back to the terminal.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("file") => LogDestination::File,
            Some("both") => LogDestination::Both,
            _ => LogDestination::Terminal,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_DESTINATION_VAR).ok().as_deref())
    }
}

/// Initialize the global logger. Does nothing if one is already installed.
pub fn initialize(destination: LogDestination) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        if let Some(file_logger) = create_file_logger(level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return;
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogDestination;

    #[test]
    fn destination_parsing() {
        assert_eq!(LogDestination::parse(None), LogDestination::Terminal);
        assert_eq!(LogDestination::parse(Some(" FILE ")), LogDestination::File);
        assert_eq!(LogDestination::parse(Some("both")), LogDestination::Both);
        assert_eq!(LogDestination::parse(Some("syslog")), LogDestination::Terminal);
    }
}
