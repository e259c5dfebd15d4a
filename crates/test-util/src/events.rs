// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event fixtures with deterministic ids and timestamps.

use chrono::{DateTime, Utc};
use storage::events::{Event, NewEvent};
use types::{CalendarDate, EventId, OrganizationId, RepeatRule};

/// A fixed point in time used for all fixture timestamps.
pub fn unix_epoch() -> DateTime<Utc> {
    std::time::SystemTime::UNIX_EPOCH.into()
}

/// Build an event record with a deterministic id and epoch timestamps.
pub fn make_event(title: &str, start_date: CalendarDate, repeat_rule: RepeatRule) -> Event {
    NewEvent {
        organization: OrganizationId::nil(),
        title: title.into(),
        start_date,
        repeat_rule,
    }
    .into_event(EventId::nil(), unix_epoch())
}

/// Parse a `YYYY-MM-DD` literal into a [`CalendarDate`].
///
/// Panics on malformed input, which is what a test wants.
pub fn date(s: &str) -> CalendarDate {
    s.parse().expect("valid calendar date literal")
}
