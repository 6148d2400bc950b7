//! Temporal constraint validator
//!
//! Pure evaluation of one [`Constraint`] against one point in time.
//! Each dimension fails open when its fields are unset or carry the
//! `"none"` sentinel; all dimensions must pass for overall acceptance.
//!
//! Date comparisons are lexicographic on fixed-width `YYYYMMDD`
//! strings, which orders identically to numeric comparison.

use crate::types::Constraint;
use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The constraint dimension that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCheck {
    /// Outside the begin/end date window
    Date,
    /// Inside the enforced-inactive lock window
    LockDate,
    /// Outside the time-of-day window
    Time,
    /// Day of week not enabled by the day mask
    Day,
    /// Session inactivity exceeded the timeout
    Timeout,
}

impl fmt::Display for ConstraintCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Date => "date window",
            Self::LockDate => "lock date",
            Self::Time => "time of day",
            Self::Day => "day of week",
            Self::Timeout => "inactivity timeout",
        };
        f.write_str(name)
    }
}

/// A snapshot of "now" used for one validation pass.
///
/// Captured once per session-activation run so every role in the pass
/// is judged against the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeContext {
    /// Current date as `YYYYMMDD`
    pub date: String,

    /// Current time of day in military `HHMM`, as a number (0..=2359)
    pub time: u16,

    /// Current day of week digit: `'1'` = Sunday .. `'7'` = Saturday
    pub day: char,

    /// The underlying instant, used for inactivity checks
    pub instant: DateTime<Utc>,
}

impl TimeContext {
    /// Snapshot the local clock.
    pub fn now() -> Self {
        let local = Local::now();
        let day = char::from(b'1' + local.weekday().num_days_from_sunday() as u8);
        Self {
            date: format!("{:04}{:02}{:02}", local.year(), local.month(), local.day()),
            time: (local.hour() * 100 + local.minute()) as u16,
            day,
            instant: local.with_timezone(&Utc),
        }
    }

    /// Explicit context, mainly for tests and replays.
    pub fn new(date: impl Into<String>, time: u16, day: char) -> Self {
        Self {
            date: date.into(),
            time,
            day,
            instant: Utc::now(),
        }
    }
}

/// Validate every dimension of `constraint` against `now`.
///
/// Returns the first failing dimension in the fixed order date,
/// lock date, time of day, day of week.
pub fn validate(constraint: &Constraint, now: &TimeContext) -> Result<(), ConstraintCheck> {
    check_date(constraint, now)?;
    check_lock_date(constraint, now)?;
    check_time(constraint, now)?;
    check_day(constraint, now)?;
    Ok(())
}

/// `begin_date <= today <= end_date`; each bound enforced only when set.
fn check_date(constraint: &Constraint, now: &TimeContext) -> Result<(), ConstraintCheck> {
    if let Some(begin) = bound(&constraint.begin_date) {
        if now.date.as_str() < begin {
            return Err(ConstraintCheck::Date);
        }
    }
    if let Some(end) = bound(&constraint.end_date) {
        if now.date.as_str() > end {
            return Err(ConstraintCheck::Date);
        }
    }
    Ok(())
}

/// Exclusion window: reject when today falls inside it. Requires both
/// bounds; a half-open lock window is treated as disabled.
fn check_lock_date(constraint: &Constraint, now: &TimeContext) -> Result<(), ConstraintCheck> {
    if let (Some(begin), Some(end)) = (
        bound(&constraint.begin_lock_date),
        bound(&constraint.end_lock_date),
    ) {
        if now.date.as_str() >= begin && now.date.as_str() <= end {
            return Err(ConstraintCheck::LockDate);
        }
    }
    Ok(())
}

/// `begin_time <= now <= end_time` in military HHMM. A "0000"/"0000"
/// pair disables the check, as does an unparsable value.
fn check_time(constraint: &Constraint, now: &TimeContext) -> Result<(), ConstraintCheck> {
    let (begin, end) = match (bound(&constraint.begin_time), bound(&constraint.end_time)) {
        (Some(b), Some(e)) => (b, e),
        _ => return Ok(()),
    };
    let (begin, end) = match (begin.parse::<u16>(), end.parse::<u16>()) {
        (Ok(b), Ok(e)) => (b, e),
        _ => return Ok(()),
    };
    if begin == 0 && end == 0 {
        return Ok(());
    }
    if now.time < begin || now.time > end {
        return Err(ConstraintCheck::Time);
    }
    Ok(())
}

/// The current day's digit must appear in the mask.
fn check_day(constraint: &Constraint, now: &TimeContext) -> Result<(), ConstraintCheck> {
    if let Some(mask) = bound(&constraint.day_mask) {
        if !mask.contains(now.day) {
            return Err(ConstraintCheck::Day);
        }
    }
    Ok(())
}

fn bound(field: &Option<String>) -> Option<&str> {
    if Constraint::is_set(field) {
        field.as_deref()
    } else {
        None
    }
}
