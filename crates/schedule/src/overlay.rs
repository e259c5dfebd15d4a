// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::generator::{first_step_at_or_after, lookahead_horizon, nth_occurrence};
use crate::ScheduleError;
use serde::Serialize;
use std::collections::BTreeSet;
use types::{CalendarDate, RepeatRule};

/// One concrete occurrence of an event, with its cancellation state applied.
///
/// Derived on demand from the generator output and the event's cancelled
/// dates, never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub date: CalendarDate,
    pub is_cancelled: bool,
}

/// Overlay the cancellation state onto a list of generated dates.
///
/// The result is 1:1 and order-preserving with the input; a date is marked
/// cancelled exactly when it is a member of `cancelled_dates`.
pub fn classify(dates: &[CalendarDate], cancelled_dates: &BTreeSet<CalendarDate>) -> Vec<Occurrence> {
    dates
        .iter()
        .map(|&date| Occurrence {
            date,
            is_cancelled: cancelled_dates.contains(&date),
        })
        .collect()
}

/// Resolve the next occurrence at or after `from_date` that is not cancelled.
///
/// Returns `Ok(None)` when the series has no active occurrence left within
/// the lookahead window, e.g. a non-repeating event whose date has passed or
/// a series whose entire window is cancelled.
pub fn next_active(
    start_date: CalendarDate,
    repeat_rule: RepeatRule,
    cancelled_dates: &BTreeSet<CalendarDate>,
    from_date: CalendarDate,
) -> Result<Option<CalendarDate>, ScheduleError> {
    if let RepeatRule::Never = repeat_rule {
        let active = start_date >= from_date && !cancelled_dates.contains(&start_date);
        return Ok(active.then_some(start_date));
    }

    let horizon = lookahead_horizon(from_date)?;
    let mut step = first_step_at_or_after(start_date, repeat_rule, from_date)?;

    loop {
        let date = nth_occurrence(start_date, repeat_rule, step)
            .ok_or(ScheduleError::IterationCeilingExceeded)?;

        if date > horizon {
            return Ok(None);
        }

        if !cancelled_dates.contains(&date) {
            return Ok(Some(date));
        }

        step += 1;
    }
}
