use std::fmt;

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::timezone::LogTimeZone;

/// RFC3339 timestamp formatter honoring the configured timezone.
///
/// [`LogTimeZone::Local`] reads the offset cached at startup on every
/// record, so it stays correct even when the formatter outlives
/// initialization order mistakes; it never blocks on offset detection.
#[derive(Debug, Clone, Copy)]
pub struct Rfc3339Timer {
    zone: LogTimeZone,
}

impl Rfc3339Timer {
    pub fn new(zone: LogTimeZone) -> Self {
        Self { zone }
    }
}

impl FormatTime for Rfc3339Timer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = OffsetDateTime::now_utc().to_offset(self.zone.offset());
        match now.format(&Rfc3339) {
            Ok(ts) => write!(w, "{ts} "),
            Err(_) => write!(w, "<invalid-time> "),
        }
    }
}
