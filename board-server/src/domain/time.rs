//! Departure time normalization.
//!
//! The transit backend encodes departure times three ways: the sentinel
//! `">>"` for a vehicle already at the platform, a countdown such as
//! `"5min"`, or a wall-clock `"HH:MM"`. Everything downstream (sorting,
//! the look-ahead window, the countdown column) works on absolute local
//! timestamps, so tokens are resolved once, here, against a single `now`.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Minutes in a day, used for the midnight wrap.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Error returned when a departure time token cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid departure time {token:?}: {reason}")]
pub struct TimeError {
    token: String,
    reason: &'static str,
}

impl TimeError {
    fn new(token: &str, reason: &'static str) -> Self {
        Self {
            token: token.to_string(),
            reason,
        }
    }
}

/// A parsed, not yet resolved, departure time token.
///
/// # Examples
///
/// ```
/// use board_server::domain::TimeToken;
///
/// assert_eq!(TimeToken::parse(">>").unwrap(), TimeToken::Imminent);
/// assert_eq!(TimeToken::parse("5min").unwrap(), TimeToken::InMinutes(5));
/// assert!(TimeToken::parse("14:30").is_ok());
/// assert!(TimeToken::parse("soon").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeToken {
    /// `">>"`: departing now.
    Imminent,
    /// `"<N>min"`: departing in N minutes.
    InMinutes(u32),
    /// `"HH:MM"`: departing at a clock time.
    Clock(NaiveTime),
}

impl TimeToken {
    /// Parse a raw token from the backend.
    pub fn parse(raw: &str) -> Result<Self, TimeError> {
        let s = raw.trim();

        if s == ">>" {
            return Ok(TimeToken::Imminent);
        }

        if let Some(count) = s.strip_suffix("min") {
            let count = count.trim_end();
            if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimeError::new(raw, "expected digits before 'min'"));
            }
            let minutes = count
                .parse::<u32>()
                .map_err(|_| TimeError::new(raw, "minute count out of range"))?;
            return Ok(TimeToken::InMinutes(minutes));
        }

        let (hours, minutes) = s
            .split_once(':')
            .ok_or_else(|| TimeError::new(raw, "expected '>>', '<N>min' or HH:MM"))?;

        let hour = parse_digits(hours, 1..=2).ok_or_else(|| TimeError::new(raw, "invalid hour"))?;
        if hour > 23 {
            return Err(TimeError::new(raw, "hour must be 0-23"));
        }

        let minute =
            parse_digits(minutes, 2..=2).ok_or_else(|| TimeError::new(raw, "invalid minute"))?;
        if minute > 59 {
            return Err(TimeError::new(raw, "minute must be 0-59"));
        }

        let time =
            NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new(raw, "invalid time"))?;

        Ok(TimeToken::Clock(time))
    }

    /// Resolve the token to an absolute timestamp relative to `now`.
    ///
    /// Clock times earlier in the day than `now` (by minute of day) belong to
    /// tomorrow. A clock time in the same minute as `now` stays today.
    pub fn resolve(&self, now: NaiveDateTime) -> Result<NaiveDateTime, TimeError> {
        match *self {
            TimeToken::Imminent => Ok(now),
            TimeToken::InMinutes(minutes) => now
                .checked_add_signed(Duration::minutes(i64::from(minutes)))
                .ok_or_else(|| TimeError::new(&format!("{minutes}min"), "timestamp overflow")),
            TimeToken::Clock(time) => {
                let today = now.date().and_time(time);
                if minute_of_day(time) < minute_of_day(now.time()) {
                    today
                        .checked_add_signed(Duration::days(1))
                        .ok_or_else(|| TimeError::new(&time.to_string(), "date overflow"))
                } else {
                    Ok(today)
                }
            }
        }
    }
}

impl fmt::Display for TimeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeToken::Imminent => write!(f, ">>"),
            TimeToken::InMinutes(m) => write!(f, "{m}min"),
            TimeToken::Clock(t) => write!(f, "{:02}:{:02}", t.hour(), t.minute()),
        }
    }
}

/// Parse and resolve a raw token in one step.
///
/// # Examples
///
/// ```
/// use board_server::domain::normalize_time;
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2024, 3, 15)
///     .unwrap()
///     .and_hms_opt(10, 0, 0)
///     .unwrap();
///
/// assert_eq!(normalize_time(">>", now).unwrap(), now);
/// assert_eq!(normalize_time("10:30", now).unwrap().to_string(), "2024-03-15 10:30:00");
/// // Earlier than now: tomorrow.
/// assert_eq!(normalize_time("09:45", now).unwrap().to_string(), "2024-03-16 09:45:00");
/// ```
pub fn normalize_time(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, TimeError> {
    TimeToken::parse(raw)?.resolve(now)
}

/// Minutes since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Whole minutes from `now` until `departure`, comparing time of day only.
///
/// A departure earlier in the day than `now` is taken to be tomorrow.
/// Identical minutes yield 0, never a full day.
///
/// # Examples
///
/// ```
/// use board_server::domain::minutes_until;
/// use chrono::NaiveTime;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// assert_eq!(minutes_until(t(23, 58), t(23, 59)), 1);
/// assert_eq!(minutes_until(t(0, 1), t(0, 1)), 0);
/// assert_eq!(minutes_until(t(23, 59), t(0, 1)), 2);
/// ```
pub fn minutes_until(now: NaiveTime, departure: NaiveTime) -> u32 {
    let now = minute_of_day(now);
    let departure = minute_of_day(departure);
    if departure < now {
        departure + MINUTES_PER_DAY - now
    } else {
        departure - now
    }
}

/// Whole minutes from `now` until a resolved departure, at minute
/// granularity.
///
/// Both instants are truncated to the minute first, so fresh data agrees
/// with [`minutes_until`]. A departure already in the past yields 0.
///
/// # Examples
///
/// ```
/// use board_server::domain::minutes_until_departure;
/// use chrono::NaiveDate;
///
/// let at = |h, m, s| NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(h, m, s).unwrap();
/// assert_eq!(minutes_until_departure(at(12, 0, 30), at(12, 5, 0)), 5);
/// assert_eq!(minutes_until_departure(at(12, 1, 10), at(12, 0, 30)), 0);
/// ```
pub fn minutes_until_departure(now: NaiveDateTime, departure: NaiveDateTime) -> u32 {
    let minutes = (truncate_to_minute(departure) - truncate_to_minute(now)).num_minutes();
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at - Duration::seconds(i64::from(at.second())) - Duration::nanoseconds(i64::from(at.nanosecond()))
}

/// Parse a run of ASCII digits whose length lies in `len`.
fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parse_tokens() {
        assert_eq!(TimeToken::parse(">>").unwrap(), TimeToken::Imminent);
        assert_eq!(TimeToken::parse(" >> ").unwrap(), TimeToken::Imminent);
        assert_eq!(TimeToken::parse("0min").unwrap(), TimeToken::InMinutes(0));
        assert_eq!(TimeToken::parse("12 min").unwrap(), TimeToken::InMinutes(12));
        assert_eq!(TimeToken::parse("07:05").unwrap(), TimeToken::Clock(t(7, 5)));
        assert_eq!(TimeToken::parse("7:05").unwrap(), TimeToken::Clock(t(7, 5)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TimeToken::parse("").is_err());
        assert!(TimeToken::parse("min").is_err());
        assert!(TimeToken::parse("-3min").is_err());
        assert!(TimeToken::parse("24:00").is_err());
        assert!(TimeToken::parse("12:60").is_err());
        assert!(TimeToken::parse("12:5").is_err());
        assert!(TimeToken::parse("1230").is_err());
        assert!(TimeToken::parse("ab:cd").is_err());
    }

    #[test]
    fn error_mentions_token() {
        let err = TimeToken::parse("later").unwrap_err();
        assert!(err.to_string().contains("later"));
    }

    #[test]
    fn imminent_resolves_to_now() {
        let now = at(10, 15, 42);
        assert_eq!(normalize_time(">>", now).unwrap(), now);
    }

    #[test]
    fn countdown_keeps_seconds() {
        let now = at(10, 15, 42);
        assert_eq!(normalize_time("5min", now).unwrap(), at(10, 20, 42));
    }

    #[test]
    fn countdown_crosses_midnight() {
        let now = at(23, 58, 0);
        let resolved = normalize_time("5min", now).unwrap();
        assert_eq!(resolved.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert_eq!(resolved.time(), t(0, 3));
    }

    #[test]
    fn clock_time_zeroes_seconds() {
        let now = at(10, 15, 42);
        assert_eq!(normalize_time("10:40", now).unwrap(), at(10, 40, 0));
    }

    #[test]
    fn clock_time_same_minute_is_today() {
        let now = at(10, 15, 42);
        assert_eq!(normalize_time("10:15", now).unwrap(), at(10, 15, 0));
    }

    #[test]
    fn clock_time_after_midnight_rolls_over() {
        let now = at(23, 50, 0);
        let resolved = normalize_time("00:10", now).unwrap();
        assert_eq!(resolved.date(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert_eq!(resolved.time(), t(0, 10));
    }

    #[test]
    fn minutes_until_examples() {
        assert_eq!(minutes_until(t(23, 58), t(23, 59)), 1);
        assert_eq!(minutes_until(t(0, 1), t(0, 1)), 0);
        assert_eq!(minutes_until(t(23, 59), t(0, 1)), 2);
        assert_eq!(minutes_until(t(10, 0), t(9, 59)), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn minutes_until_ignores_seconds() {
        let now = NaiveTime::from_hms_opt(10, 0, 59).unwrap();
        assert_eq!(minutes_until(now, t(10, 1)), 1);
    }

    #[test]
    fn departure_countdown_uses_resolved_date() {
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 16)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        assert_eq!(minutes_until_departure(at(23, 59, 0), tomorrow), 2);
        assert_eq!(minutes_until_departure(at(10, 0, 59), at(10, 1, 0)), 1);
    }

    #[test]
    fn departed_vehicle_counts_zero_not_a_day() {
        // ">>" resolved at 12:00:30, shown 40 s later.
        let departure = normalize_time(">>", at(12, 0, 30)).unwrap();
        assert_eq!(minutes_until_departure(at(12, 1, 10), departure), 0);
        assert_eq!(minutes_until(t(12, 1), departure.time()), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn display_round_trips() {
        for raw in [">>", "3min", "08:09"] {
            assert_eq!(TimeToken::parse(raw).unwrap().to_string(), raw);
        }
    }
}
