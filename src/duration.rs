//! Human-readable holding times

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

/// Label used when a duration has no whole second in it
pub const ZERO_DURATION_LABEL: &str = "0 秒";

/// Calendar-free time units, largest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    const ALL: [TimeUnit; 4] = [TimeUnit::Day, TimeUnit::Hour, TimeUnit::Minute, TimeUnit::Second];

    pub fn millis(&self) -> f64 {
        match self {
            TimeUnit::Day => DAY_MS,
            TimeUnit::Hour => HOUR_MS,
            TimeUnit::Minute => MINUTE_MS,
            TimeUnit::Second => SECOND_MS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeUnit::Day => "天",
            TimeUnit::Hour => "小时",
            TimeUnit::Minute => "分钟",
            TimeUnit::Second => "秒",
        }
    }

    /// Whole units left after removing every larger unit
    fn component(&self, ms: f64) -> f64 {
        match self {
            TimeUnit::Day => (ms / DAY_MS).floor(),
            TimeUnit::Hour => ((ms % DAY_MS) / HOUR_MS).floor(),
            TimeUnit::Minute => ((ms % HOUR_MS) / MINUTE_MS).floor(),
            TimeUnit::Second => ((ms % MINUTE_MS) / SECOND_MS).floor(),
        }
    }
}

/// Format a duration in milliseconds using its largest non-zero unit.
///
/// The value is the whole count of that unit plus the fraction of the next
/// one, e.g. 1 day 12 hours is `1.50 天`. Negative and non-finite input is
/// treated as zero.
pub fn format_holding_time(ms: f64) -> String {
    let ms = if ms.is_finite() && ms > 0.0 { ms } else { 0.0 };

    for unit in TimeUnit::ALL {
        let whole = unit.component(ms);
        if whole > 0.0 {
            let value = whole + (ms % unit.millis()) / unit.millis();
            return format!("{:.2} {}", value, unit.label());
        }
    }

    ZERO_DURATION_LABEL.to_string()
}
