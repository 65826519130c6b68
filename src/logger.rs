use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

static STUDIO_LOGGER: Lazy<StudioLogger> = Lazy::new(StudioLogger::new);

pub fn init() -> Result<(), String> {
    init_with_config(LoggerConfig::default())
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.to_level_filter();
    STUDIO_LOGGER.update_config(config);

    log::set_logger(&*STUDIO_LOGGER).map_err(|e| format!("Failed to set logger: {:?}", e))?;
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Accepts the usual names (`info`, `WARN`, ...); `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        self.to_level().to_level_filter()
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: LogLevel::from_level(record.level()),
            message: record.args().to_string(),
            module: record.module_path().unwrap_or("unknown").to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_file_location: false,
            show_module: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the preset from `IMAGEGEN_LOG_FORMAT` (`json` for production)
    /// and the level from `IMAGEGEN_LOG`.
    pub fn from_env() -> Self {
        let base = match std::env::var("IMAGEGEN_LOG_FORMAT").as_deref() {
            Ok("json") => Self::production(),
            _ => Self::default(),
        };
        match std::env::var("IMAGEGEN_LOG").ok().as_deref().and_then(LogLevel::parse) {
            Some(level) => base.with_level(level),
            None => base,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_file_path = Some(path.to_string());
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_file_location: true,
            ..Default::default()
        }
    }
}

pub struct StudioLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
}

impl StudioLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) {
        let file = new_config.log_file_path.as_ref().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| eprintln!("Cannot open log file {}: {}", path, e))
                .ok()
        });

        if let Ok(mut log_file) = self.log_file.lock() {
            *log_file = file;
        }
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    fn format_line(entry: &LogEntry, config: &LoggerConfig) -> String {
        let paint = |text: String, style: fn(ColoredString) -> ColoredString| {
            if config.show_colors {
                style(text.normal()).to_string()
            } else {
                text
            }
        };

        let mut line = String::new();

        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        line.push_str(&paint(timestamp, |s| s.bright_black()));
        line.push(' ');

        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };
        if config.show_colors {
            line.push_str(&format!("[{}] ", level.color(entry.level.color()).bold()));
        } else {
            line.push_str(&format!("[{}] ", level));
        }

        if config.show_module && !entry.module.is_empty() {
            line.push_str(&paint(format!("{}::", entry.module), |s| s.bright_blue()));
        }

        line.push_str(&paint(entry.message.clone(), |s| s.bold()));

        if config.show_file_location {
            line.push_str(&paint(format!(" ({}:{})", entry.file, entry.line), |s| {
                s.bright_black()
            }));
        }

        line
    }
}

impl log::Log for StudioLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.config
            .lock()
            .map(|config| metadata.level() <= config.min_level.to_level())
            .unwrap_or(true)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(config) = self.config.lock() else {
            return;
        };

        let entry = LogEntry::from_record(record);
        let line = if config.output_json {
            serde_json::to_string(&entry).unwrap_or_default()
        } else {
            Self::format_line(&entry, &config)
        };
        println!("{}", line);

        if let Ok(mut log_file) = self.log_file.lock() {
            if let Some(file) = log_file.as_mut() {
                let plain = if config.output_json || !config.show_colors {
                    line
                } else {
                    Self::format_line(&entry, &config.clone().with_colors(false))
                };
                let _ = writeln!(file, "{}", plain);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        if let Ok(mut log_file) = self.log_file.lock() {
            if let Some(file) = log_file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long a scope took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  '{}' completed in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_startup_info(app_name: &str, version: &str, address: &str) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Server will run on {}", address);
}

/// Prints the effective configuration. Credentials are only reported as set or unset.
pub fn log_config_info(config: &crate::config::Config) {
    let flag = |set: bool| if set { "✅" } else { "❌" };

    log::info!("⚙️  Configuration loaded:");
    log::info!("   Upstream endpoint: {}", config.upstream.endpoint);
    log::info!("   Upstream model: {}", config.upstream.model);
    log::info!("   API key: {}", flag(config.upstream.api_key.is_some()));
    log::info!(
        "   Customer id: {}",
        flag(config.upstream.customer_id.is_some())
    );
    log::info!(
        "   History: {} (max {} entries)",
        config.history.path.display(),
        config.history.capacity()
    );
}
