//! Fixed-offset civil time formatting
//!
//! Every timestamp shown on the chart or written to an export is rendered in
//! Bangkok time (UTC+7, no daylight saving). The conversion goes through an
//! explicit [`FixedOffset`], so the result never depends on the host's
//! timezone setting.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// UTC offset of Asia/Bangkok in seconds
pub const BANGKOK_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Pattern for export rows and the "Generated on" line (`yyyy-MM-dd HH:mm:ss`)
pub const EXPORT_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Pattern for chart axis labels (`HH:mm:ss`)
pub const AXIS_PATTERN: &str = "%H:%M:%S";

/// Formats instants in a fixed civil timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFormatter {
    offset: FixedOffset,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::bangkok()
    }
}

impl TimeFormatter {
    /// Formatter for Asia/Bangkok (UTC+7)
    pub fn bangkok() -> Self {
        Self::with_offset_secs(BANGKOK_UTC_OFFSET_SECS)
    }

    /// Formatter for an arbitrary fixed offset east of UTC.
    ///
    /// Offsets outside ±24h are rejected by chrono; those fall back to UTC.
    pub fn with_offset_secs(secs: i32) -> Self {
        let offset = FixedOffset::east_opt(secs).unwrap_or_else(|| {
            tracing::warn!("Invalid UTC offset {}s, using UTC", secs);
            Utc.fix()
        });
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Convert to the civil timezone
    pub fn to_civil(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// `yyyy-MM-dd HH:mm:ss`, used for exports and point labels
    pub fn format_export(&self, instant: DateTime<Utc>) -> String {
        self.to_civil(instant).format(EXPORT_PATTERN).to_string()
    }

    /// `HH:mm:ss`, used for chart axis labels
    pub fn format_axis(&self, instant: DateTime<Utc>) -> String {
        self.to_civil(instant).format(AXIS_PATTERN).to_string()
    }
}

/// Format for exports in Bangkok time
pub fn format_bkk(instant: DateTime<Utc>) -> String {
    TimeFormatter::bangkok().format_export(instant)
}

/// Format for axis labels in Bangkok time
pub fn format_bkk_axis(instant: DateTime<Utc>) -> String {
    TimeFormatter::bangkok().format_axis(instant)
}
