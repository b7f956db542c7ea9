use std::{fmt, str::FromStr, sync::RwLock};

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::error::ObserveError;

/// Local UTC offset captured by [`init_local_offset`] before the runtime
/// starts. Stays at UTC when never initialized or when detection fails.
static LOCAL_OFFSET: RwLock<UtcOffset> = RwLock::new(UtcOffset::UTC);

/// Timezone applied to log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTimeZone {
    /// Timestamps in UTC (default).
    #[default]
    Utc,
    /// Timestamps in the system timezone captured at startup.
    Local,
}

impl LogTimeZone {
    /// Offset applied to timestamps under this setting.
    pub(crate) fn offset(self) -> UtcOffset {
        match self {
            LogTimeZone::Utc => UtcOffset::UTC,
            LogTimeZone::Local => cached_local_offset(),
        }
    }
}

impl FromStr for LogTimeZone {
    type Err = ObserveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(ObserveError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LogTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogTimeZone::Utc => "utc",
            LogTimeZone::Local => "local",
        };
        f.write_str(s)
    }
}

/// Capture the system UTC offset for [`LogTimeZone::Local`] timestamps.
///
/// Call in `main()` before the async runtime starts: offset detection is
/// refused in multi-threaded processes on most Unix platforms. Falls back to
/// UTC silently when detection fails.
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    if let Ok(mut guard) = LOCAL_OFFSET.write() {
        *guard = offset;
    }
}

fn cached_local_offset() -> UtcOffset {
    LOCAL_OFFSET
        .read()
        .map(|guard| *guard)
        .unwrap_or(UtcOffset::UTC)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::LogTimeZone;

    #[test]
    fn default_is_utc() {
        assert_eq!(LogTimeZone::default(), LogTimeZone::Utc);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(LogTimeZone::from_str("UTC").unwrap(), LogTimeZone::Utc);
        assert_eq!(LogTimeZone::from_str("Local").unwrap(), LogTimeZone::Local);
        assert!(LogTimeZone::from_str("pst").is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&LogTimeZone::Local).unwrap(), "\"local\"");
        let parsed: LogTimeZone = serde_json::from_str("\"utc\"").unwrap();
        assert_eq!(parsed, LogTimeZone::Utc);
    }

    #[test]
    fn utc_offset_is_zero_without_initialization() {
        assert!(LogTimeZone::Utc.offset().is_utc());
    }

    #[test]
    fn local_offset_is_sane_after_initialization() {
        super::init_local_offset();
        let offset = LogTimeZone::Local.offset();
        assert!(offset.whole_hours().abs() <= 14);
    }
}
