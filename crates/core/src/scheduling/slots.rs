//! Availability-to-bookable-slots computation
//!
//! Converts a day's availability windows plus a required total service
//! duration into the ordered, de-duplicated list of valid appointment start
//! times. Pure computation: the current moment is injected by the caller,
//! never read from the system clock.

use std::collections::BTreeSet;

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use salonkit_domain::{AvailabilityWindow, BookableSlot, Result};

/// Enumerate bookable start times at a fixed granularity
///
/// For each window, candidates start at the window opening and step forward
/// by `step_minutes` while the candidate start plus `total_duration_minutes`
/// still fits within the window (an appointment ending exactly at the window
/// close is valid). Candidates not strictly after `now` are discarded, so a
/// customer cannot book earlier today. Overlapping windows are not merged
/// beforehand; duplicate candidates are collapsed at collection time and the
/// result is chronologically ordered.
///
/// # Arguments
/// * `windows` - Availability windows, all for the same calendar day
/// * `total_duration_minutes` - Required appointment length (0 = no slots)
/// * `now` - The current moment, in the booking day's wall-clock time
/// * `step_minutes` - Candidate granularity (must be positive)
///
/// # Errors
/// Returns `SalonError::Validation` if `step_minutes` is zero or any window
/// ends at or before it starts. Malformed windows are rejected up front
/// rather than silently producing empty iteration.
pub fn compute_slots(
    windows: &[AvailabilityWindow],
    total_duration_minutes: u32,
    now: NaiveDateTime,
    step_minutes: u32,
) -> Result<Vec<BookableSlot>> {
    if step_minutes == 0 {
        return Err(salonkit_domain::SalonError::Validation(
            "slot step must be a positive number of minutes".to_string(),
        ));
    }
    for window in windows {
        window.validate()?;
    }

    if total_duration_minutes == 0 {
        return Ok(Vec::new());
    }

    let mut candidates: BTreeSet<NaiveTime> = BTreeSet::new();

    for window in windows {
        let start = minutes_from_midnight(window.start_time);
        let end = minutes_from_midnight(window.end_time);

        let mut candidate = start;
        loop {
            // checked arithmetic: a nonsense duration or step must read as
            // "does not fit", not overflow
            let Some(finish) = candidate.checked_add(total_duration_minutes) else { break };
            if finish > end {
                break;
            }
            // `day` carries the calendar date; the window times are
            // wall-clock on that same day.
            if let Some(time) = time_from_minutes(candidate) {
                if window.day.and_time(time) > now {
                    candidates.insert(time);
                }
            }
            match candidate.checked_add(step_minutes) {
                Some(next) => candidate = next,
                None => break,
            }
        }
    }

    Ok(candidates.into_iter().map(BookableSlot::from).collect())
}

fn minutes_from_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}
