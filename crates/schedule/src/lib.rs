// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Occurrence arithmetic for recurring match events.
//!
//! This crate is the single canonical implementation of the recurring-date
//! logic: the occurrence generator and the cancellation overlay. Everything
//! in here is a pure function over [`CalendarDate`](types::CalendarDate)
//! values; "now" is always injected by the caller as a `from_date` parameter
//! and never read from the clock.

mod error;
mod generator;
mod overlay;

pub use error::ScheduleError;
pub use generator::{generate, is_occurrence, nth_occurrence, LOOKAHEAD_CEILING_MONTHS};
pub use overlay::{classify, next_active, Occurrence};
