//! Helper functions for parsing repeat rules and computing successor instants.
//!
//! The grammar is a compact `KEY=VALUE;KEY=VALUE` string with two interpreted
//! keys, `FREQ` (`DAILY`/`WEEKLY`/`MONTHLY`) and `INTERVAL` (positive integer,
//! default 1). Malformed input degrades to `None`; a bad rule must never
//! block a completion.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

/// Interpreted recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// Parsed recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatRule {
    pub freq: Frequency,
    pub interval: u32,
}

/// ## Summary
/// Parses a compact repeat-rule string into a [`RepeatRule`].
///
/// Keys and values are case-insensitive; whitespace around entries is
/// tolerated. `BYDAY`, `COUNT`, `UNTIL` and any other uninterpreted key are
/// ignored. An `INTERVAL` that is non-numeric or not positive is coerced
/// to 1 rather than failing the parse.
///
/// Returns `None` when `FREQ` is missing or names an unsupported frequency.
#[must_use]
pub fn parse_repeat_rule(input: &str) -> Option<RepeatRule> {
    let mut freq = None;
    let mut interval = 1u32;

    for entry in input.split(';') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                freq = match value.trim().to_ascii_uppercase().as_str() {
                    "DAILY" => Some(Frequency::Daily),
                    "WEEKLY" => Some(Frequency::Weekly),
                    "MONTHLY" => Some(Frequency::Monthly),
                    other => {
                        tracing::trace!(freq = %other, "Unsupported FREQ value");
                        None
                    }
                };
            }
            "INTERVAL" => {
                interval = value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .unwrap_or(1);
            }
            _ => {}
        }
    }

    freq.map(|freq| RepeatRule { freq, interval })
}

/// ## Summary
/// Computes the next occurrence of a recurring item from its anchor instant.
///
/// Daily rules advance by `interval` days and weekly rules by
/// `7 * interval` days. Monthly rules advance the calendar month with the
/// day-of-month preserved; when the target month is shorter, the excess
/// days overflow into the following month (Jan 31 + 1 month is Mar 3 in a
/// non-leap year). Time of day is kept as-is; all arithmetic is on UTC
/// instants.
///
/// Returns `None` when `rule` is absent, empty, or fails to parse.
#[must_use]
pub fn next_occurrence(anchor: DateTime<Utc>, rule: Option<&str>) -> Option<DateTime<Utc>> {
    let rule = parse_repeat_rule(rule?)?;
    let interval = i64::from(rule.interval);

    match rule.freq {
        Frequency::Daily => anchor.checked_add_signed(TimeDelta::days(interval)),
        Frequency::Weekly => anchor.checked_add_signed(TimeDelta::days(7 * interval)),
        Frequency::Monthly => add_months_overflowing(anchor, rule.interval),
    }
}

/// Advances the calendar month, spilling a too-large day-of-month into the
/// following month instead of clamping.
fn add_months_overflowing(anchor: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let total_month0 = i64::from(anchor.month0()) + i64::from(months);
    let year = anchor
        .year()
        .checked_add(i32::try_from(total_month0 / 12).ok()?)?;
    let month = u32::try_from(total_month0 % 12).ok()? + 1;
    let day = anchor.day();

    let date = if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        date
    } else {
        let excess = day - days_in_month(year, month)?;
        let (year, month) = if month == 12 {
            (year.checked_add(1)?, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, excess)?
    };

    Some(DateTime::from_naive_utc_and_offset(
        date.and_time(anchor.time()),
        Utc,
    ))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next_first.signed_duration_since(first).num_days()).ok()
}
