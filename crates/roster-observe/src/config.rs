use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::format::LogFormat;
use crate::level::LogLevel;
use crate::timezone::LogTimeZone;

/// Logging configuration, usually one section of a service config file.
///
/// Every field has a default, so `{}` is a valid section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter expression (e.g. `"info"`, `"roster_api=debug,info"`).
    pub level: LogLevel,
    /// Timezone for timestamps.
    pub timezone: LogTimeZone,
    /// Include module targets in output.
    pub with_targets: bool,
    /// Allow colored output (text format, terminal only).
    pub use_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::default(),
            timezone: LogTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LogConfig {
    /// Whether text output should be colored right now.
    ///
    /// Checked at initialization time rather than config-parse time, so
    /// redirecting the service's stdout disables color without a config
    /// change.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
