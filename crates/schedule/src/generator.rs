// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::ScheduleError;
use types::{CalendarDate, RepeatRule};

/// Upper bound on how far past `from_date` occurrences are generated,
/// expressed in calendar months (10 years of lookahead).
pub const LOOKAHEAD_CEILING_MONTHS: u32 = 120;

/// Generate the first `count` occurrences of an event with date >= `from_date`.
///
/// Occurrences are computed by advancing the anchor (`start_date`) in whole
/// steps of the repeat rule:
///
/// - [`RepeatRule::Never`]: the start date itself, if it lies at or after
///   `from_date`.
/// - [`RepeatRule::Weekly`]: `start_date` + 7 days per step. Every occurrence
///   falls on the start date's weekday.
/// - [`RepeatRule::Monthly`]: `start_date` + 1 calendar month per step. Each
///   step is taken from the anchor, not from the previous (possibly clamped)
///   occurrence, so the day-of-month anchor is preserved across short months
///   (2024-01-31 → 2024-02-29 → 2024-03-31).
///
/// The result is ordered ascending and deterministic for identical inputs.
/// Fails with [`ScheduleError::IterationCeilingExceeded`] when `count`
/// occurrences do not fit within [`LOOKAHEAD_CEILING_MONTHS`] past
/// `from_date`.
pub fn generate(
    start_date: CalendarDate,
    repeat_rule: RepeatRule,
    from_date: CalendarDate,
    count: usize,
) -> Result<Vec<CalendarDate>, ScheduleError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    if let RepeatRule::Never = repeat_rule {
        if start_date >= from_date {
            return Ok(vec![start_date]);
        } else {
            return Ok(Vec::new());
        }
    }

    let horizon = lookahead_horizon(from_date)?;
    let mut step = first_step_at_or_after(start_date, repeat_rule, from_date)?;
    let mut dates = Vec::with_capacity(count);

    while dates.len() < count {
        let date = nth_occurrence(start_date, repeat_rule, step)
            .ok_or(ScheduleError::IterationCeilingExceeded)?;

        if date > horizon {
            return Err(ScheduleError::IterationCeilingExceeded);
        }

        if date >= from_date {
            dates.push(date);
        }

        step += 1;
    }

    Ok(dates)
}

/// The occurrence `n` steps after the anchor, or `None` when the date would
/// leave the representable calendar range.
pub fn nth_occurrence(
    start_date: CalendarDate,
    repeat_rule: RepeatRule,
    n: u32,
) -> Option<CalendarDate> {
    match repeat_rule {
        RepeatRule::Never => (n == 0).then_some(start_date),
        RepeatRule::Weekly => start_date.add_days(7 * u64::from(n)),
        RepeatRule::Monthly => start_date.add_months(n),
    }
}

/// Whether `date` is an occurrence of the series described by `start_date`
/// and `repeat_rule`.
pub fn is_occurrence(
    start_date: CalendarDate,
    repeat_rule: RepeatRule,
    date: CalendarDate,
) -> bool {
    if date < start_date {
        return false;
    }

    match repeat_rule {
        RepeatRule::Never => date == start_date,
        RepeatRule::Weekly => date.days_since(start_date) % 7 == 0,
        RepeatRule::Monthly => {
            let months = date.month_index() - start_date.month_index();
            u32::try_from(months)
                .ok()
                .and_then(|months| nth_occurrence(start_date, repeat_rule, months))
                == Some(date)
        }
    }
}

pub(crate) fn lookahead_horizon(from_date: CalendarDate) -> Result<CalendarDate, ScheduleError> {
    from_date
        .add_months(LOOKAHEAD_CEILING_MONTHS)
        .ok_or(ScheduleError::IterationCeilingExceeded)
}

/// The smallest step whose occurrence lies at or after `from_date`.
///
/// Computed arithmetically so that series with an anchor far in the past are
/// caught up without walking every intermediate occurrence.
pub(crate) fn first_step_at_or_after(
    start_date: CalendarDate,
    repeat_rule: RepeatRule,
    from_date: CalendarDate,
) -> Result<u32, ScheduleError> {
    let step = match repeat_rule {
        RepeatRule::Never => 0,
        RepeatRule::Weekly => {
            let days = from_date.days_since(start_date);
            if days <= 0 {
                0
            } else {
                ((days + 6) / 7) as u32
            }
        }
        RepeatRule::Monthly => {
            let months = from_date.month_index() - start_date.month_index();
            let step = u32::try_from(months).unwrap_or(0);

            // The (possibly clamped) day-of-month may still fall before
            // `from_date` within the same month.
            let date = nth_occurrence(start_date, repeat_rule, step)
                .ok_or(ScheduleError::IterationCeilingExceeded)?;
            if date < from_date {
                step + 1
            } else {
                step
            }
        }
    };

    Ok(step)
}
