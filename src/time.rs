//! Time handling shared by the threshold resolver and window operators.
//!
//! Covers the granularity → suffix rules (spec §4.2) and the window
//! duration classification (spec §4.2 / §9 open question), both pinned to
//! milliseconds throughout — see the §9 deviation note on unit consistency.

use chrono::{DateTime, Datelike as _, Timelike as _, Utc};

/// Temporal resolution of a threshold method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Single,
    Hour,
    Day,
    Month,
}

impl Granularity {
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "single" => Some(Self::Single),
            "hour" => Some(Self::Hour),
            "day" => Some(Self::Day),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// The bucket a window's actual span is mapped to for threshold lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDuration {
    OneHour,
    TwelveHours,
    TwentyFourHours,
}

impl WindowDuration {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::TwelveHours => "12h",
            Self::TwentyFourHours => "24h",
        }
    }

    /// Classify a window span (`window_end - window_start`, milliseconds)
    /// into one of the three threshold buckets.
    ///
    /// The literal boundaries are 1.5h and 12.5h in milliseconds. This
    /// deliberately collapses under-filled 24h windows (e.g. 10h of data)
    /// into the 12h bucket rather than emitting a false anomaly (spec §4.2).
    ///
    /// The canonical unit is milliseconds for both the sigma path and the
    /// null-aggregate path; the source's seconds/milliseconds inconsistency
    /// between those two paths (spec §9) is not reproduced here.
    #[must_use]
    pub fn classify(time_diff_millis: i64) -> Self {
        if time_diff_millis < 5_400_000 {
            Self::OneHour
        } else if time_diff_millis < 45_000_000 {
            Self::TwelveHours
        } else {
            Self::TwentyFourHours
        }
    }
}

/// Convert epoch milliseconds (UTC) into a `DateTime<Utc>`.
#[must_use]
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(|| {
        // An out-of-range timestamp is a malformed-observation concern that
        // should have been rejected before the core ever saw it (spec §7
        // item 4); clamp rather than panic so a check never crashes the
        // operator over a single bad instant.
        DateTime::from_timestamp_millis(0).expect("epoch is representable")
    })
}

/// The midpoint of a window, used to resolve sigma thresholds (spec §4.5).
///
/// The source computes `windowStart + (windowEnd + windowStart) / 2`, which
/// is not the midpoint; this implements the intended `(start + end) / 2`
/// (spec §9 deviation note).
#[must_use]
pub fn window_centre(window_start: i64, window_end: i64) -> i64 {
    window_start + (window_end - window_start) / 2
}

/// Format the registry-key suffix for a given granularity and instant,
/// per the spec §4.2 rules. Returns `None` for [`Granularity::Single`].
#[must_use]
pub fn suffix_for(granularity: Granularity, instant_millis: i64) -> Option<String> {
    let t = millis_to_utc(instant_millis);
    match granularity {
        Granularity::Single => None,
        Granularity::Hour => {
            let rounded = if t.minute() <= 30 {
                t.with_minute(0).unwrap().with_second(0).unwrap().with_nanosecond(0).unwrap()
            } else {
                (t.with_minute(0).unwrap().with_second(0).unwrap().with_nanosecond(0).unwrap())
                    + chrono::Duration::hours(1)
            };
            Some(rounded.format("%Y-%m-%dT%H").to_string())
        }
        Granularity::Day => Some(t.format("%Y-%m-%d").to_string()),
        Granularity::Month => Some(t.format("%Y-%m").to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_classification_matches_spec_examples() {
        assert_eq!(WindowDuration::classify(3_600_000).as_str(), "1h"); // 1h
        assert_eq!(WindowDuration::classify(43_200_000).as_str(), "12h"); // 12h
        assert_eq!(WindowDuration::classify(86_400_000).as_str(), "24h"); // 24h
        assert_eq!(WindowDuration::classify(36_000_000).as_str(), "12h"); // 10h -> 12h
        assert_eq!(WindowDuration::classify(0).as_str(), "1h");
    }

    #[test]
    fn window_classification_boundaries() {
        assert_eq!(WindowDuration::classify(5_399_999).as_str(), "1h");
        assert_eq!(WindowDuration::classify(5_400_000).as_str(), "12h");
        assert_eq!(WindowDuration::classify(44_999_999).as_str(), "12h");
        assert_eq!(WindowDuration::classify(45_000_000).as_str(), "24h");
    }

    #[test]
    fn window_centre_is_true_midpoint() {
        assert_eq!(window_centre(0, 86_400_000), 43_200_000);
        assert_eq!(window_centre(1_000, 3_000), 2_000);
    }

    #[test]
    fn hour_suffix_rounds_to_nearest() {
        // 2024-03-05T10:30:00Z -> floor to 10
        let t = chrono::Utc
            .with_ymd_and_hms(2024, 3, 5, 10, 30, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            suffix_for(Granularity::Hour, t),
            Some("2024-03-05T10".to_string())
        );

        // 2024-03-05T10:31:00Z -> ceil to 11
        let t = chrono::Utc
            .with_ymd_and_hms(2024, 3, 5, 10, 31, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            suffix_for(Granularity::Hour, t),
            Some("2024-03-05T11".to_string())
        );
    }

    #[test]
    fn hour_suffix_ceil_crosses_day_boundary() {
        let t = chrono::Utc
            .with_ymd_and_hms(2024, 3, 5, 23, 45, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(
            suffix_for(Granularity::Hour, t),
            Some("2024-03-06T00".to_string())
        );
    }

    #[test]
    fn day_and_month_suffixes() {
        let t = chrono::Utc
            .with_ymd_and_hms(2024, 3, 5, 10, 31, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(suffix_for(Granularity::Day, t), Some("2024-03-05".to_string()));
        assert_eq!(suffix_for(Granularity::Month, t), Some("2024-03".to_string()));
    }

    #[test]
    fn single_granularity_has_no_suffix() {
        assert_eq!(suffix_for(Granularity::Single, 0), None);
    }

    use chrono::TimeZone as _;
}
