//! Daily forecast selection
//!
//! Reduces the 3-hour forecast feed to one entry per day: the midday slot of
//! each distinct weekday, earliest first.

use std::collections::HashSet;

use chrono::{Datelike, Timelike, Weekday};

use crate::ports::ForecastEntry;

/// Number of days shown when no other limit is configured
pub const DEFAULT_MAX_DAYS: usize = 4;

/// Hour of the slot that represents a whole day
const MIDDAY_HOUR: u32 = 12;

/// Whether the entry is the 12:00:00 slot of its day
#[must_use]
pub fn is_midday(entry: &ForecastEntry) -> bool {
    let ts = entry.timestamp;
    ts.hour() == MIDDAY_HOUR && ts.minute() == 0 && ts.second() == 0 && ts.nanosecond() == 0
}

/// Select up to `max_days` midday entries with distinct weekdays
///
/// Entries are ordered chronologically first (ties keep feed order). A weekday
/// that was already emitted is skipped, so a date seven days after an emitted
/// one never shows up. Short feeds yield fewer entries; nothing is padded.
#[must_use]
pub fn select_daily(entries: &[ForecastEntry], max_days: usize) -> Vec<ForecastEntry> {
    let mut ordered: Vec<&ForecastEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut seen: HashSet<Weekday> = HashSet::new();
    let mut daily = Vec::with_capacity(max_days.min(entries.len()));

    for entry in ordered.into_iter().filter(|e| is_midday(e)) {
        if daily.len() >= max_days {
            break;
        }
        if seen.insert(entry.timestamp.weekday()) {
            daily.push(entry.clone());
        }
    }

    daily
}
