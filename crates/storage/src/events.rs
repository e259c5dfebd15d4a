// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::{DateTime, Utc};
use schedule::{classify, is_occurrence, next_active, Occurrence, ScheduleError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use types::{CalendarDate, EventId, OrganizationId, ParticipantId, RepeatRule};

/// Monotonic per-event revision used for optimistic concurrency control.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EventRevision(i64);

impl EventRevision {
    /// Wrap a value into this type.
    pub const fn from(inner: i64) -> Self {
        Self(inner)
    }

    /// Destructure this type and extract the inner value.
    pub fn into_inner(self) -> i64 {
        self.0
    }

    /// The revision following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Errors raised by the cancellation and subscription mutations on an
/// [`Event`].
///
/// All of these are precondition failures detected before any persistence
/// call is made.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EventError {
    /// The date is not part of the event's occurrence series at all.
    #[error("{0} is not an occurrence of this event")]
    InvalidOccurrenceDate(CalendarDate),
    /// The date is not an active occurrence (unknown to the series, or
    /// cancelled).
    #[error("{0} is not an active occurrence of this event")]
    UnknownOccurrence(CalendarDate),
    #[error("participant is already subscribed to this occurrence")]
    AlreadySubscribed,
    #[error("participant is not subscribed to this occurrence")]
    NotSubscribed,
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A participant's subscription to exactly one occurrence of one event.
///
/// Subscriptions are created by a join and destroyed by an unjoin, never
/// mutated in place. At most one subscription exists per (event,
/// participant, occurrence date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub participant_id: ParticipantId,
    pub occurrence_date: CalendarDate,
    /// Free-form caller-supplied data, e.g. a public participant's nickname.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A recurring match event owned by a tenant organization.
///
/// `start_date` and `repeat_rule` are immutable once the event is created;
/// all occurrence computation is anchored to them. `cancelled_dates` and
/// `subscriptions` are the only mutable collections and are only modified
/// through the methods below, which enforce the occurrence-membership and
/// uniqueness invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub organization: OrganizationId,
    pub title: String,
    pub start_date: CalendarDate,
    #[serde(default)]
    pub repeat_rule: RepeatRule,
    #[serde(default)]
    pub cancelled_dates: BTreeSet<CalendarDate>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: EventRevision,
}

impl Event {
    /// The first `count` occurrences at or after `from_date`, with the
    /// cancellation overlay applied.
    pub fn upcoming_occurrences(
        &self,
        from_date: CalendarDate,
        count: usize,
    ) -> Result<Vec<Occurrence>, ScheduleError> {
        let dates = schedule::generate(self.start_date, self.repeat_rule, from_date, count)?;

        Ok(classify(&dates, &self.cancelled_dates))
    }

    /// The next occurrence at or after `from_date` that is not cancelled.
    pub fn next_active_occurrence(
        &self,
        from_date: CalendarDate,
    ) -> Result<Option<CalendarDate>, ScheduleError> {
        next_active(
            self.start_date,
            self.repeat_rule,
            &self.cancelled_dates,
            from_date,
        )
    }

    /// Whether `date` belongs to the event's series and is not cancelled.
    pub fn is_active_occurrence(&self, date: CalendarDate) -> bool {
        is_occurrence(self.start_date, self.repeat_rule, date)
            && !self.cancelled_dates.contains(&date)
    }

    /// Mark one occurrence as cancelled.
    ///
    /// Idempotent: returns `Ok(true)` when the date was newly cancelled and
    /// `Ok(false)` when it already was. The roster for the date is left
    /// untouched; cancellation and rostering are independent axes.
    pub fn cancel_occurrence(&mut self, date: CalendarDate) -> Result<bool, EventError> {
        self.verify_occurrence_date(date)?;

        Ok(self.cancelled_dates.insert(date))
    }

    /// Remove the cancellation mark from one occurrence.
    ///
    /// Idempotent: returns `Ok(false)` when the date was not cancelled.
    pub fn restore_occurrence(&mut self, date: CalendarDate) -> Result<bool, EventError> {
        self.verify_occurrence_date(date)?;

        Ok(self.cancelled_dates.remove(&date))
    }

    /// Subscribe a participant to one active occurrence.
    pub fn join(
        &mut self,
        occurrence_date: CalendarDate,
        participant_id: ParticipantId,
        metadata: serde_json::Value,
    ) -> Result<Subscription, EventError> {
        if !self.is_active_occurrence(occurrence_date) {
            return Err(EventError::UnknownOccurrence(occurrence_date));
        }

        let exists = self
            .subscriptions
            .iter()
            .any(|sub| sub.participant_id == participant_id && sub.occurrence_date == occurrence_date);
        if exists {
            return Err(EventError::AlreadySubscribed);
        }

        let subscription = Subscription {
            participant_id,
            occurrence_date,
            metadata,
        };
        self.subscriptions.push(subscription.clone());

        Ok(subscription)
    }

    /// Remove a participant's subscription from one occurrence.
    ///
    /// Returns the removed subscription.
    pub fn unjoin(
        &mut self,
        occurrence_date: CalendarDate,
        participant_id: ParticipantId,
    ) -> Result<Subscription, EventError> {
        let index = self
            .subscriptions
            .iter()
            .position(|sub| {
                sub.participant_id == participant_id && sub.occurrence_date == occurrence_date
            })
            .ok_or(EventError::NotSubscribed)?;

        Ok(self.subscriptions.remove(index))
    }

    /// The roster of one occurrence: all subscriptions for exactly `date`.
    pub fn roster_for(&self, date: CalendarDate) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|sub| sub.occurrence_date == date)
            .collect()
    }

    fn verify_occurrence_date(&self, date: CalendarDate) -> Result<(), EventError> {
        if is_occurrence(self.start_date, self.repeat_rule, date) {
            Ok(())
        } else {
            Err(EventError::InvalidOccurrenceDate(date))
        }
    }
}

/// Data required to create a new [`Event`].
///
/// The id, the timestamps and the initial revision are assigned by the
/// store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub organization: OrganizationId,
    pub title: String,
    pub start_date: CalendarDate,
    #[serde(default)]
    pub repeat_rule: RepeatRule,
}

impl NewEvent {
    /// Build the stored record for this event.
    pub fn into_event(self, id: EventId, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            organization: self.organization,
            title: self.title,
            start_date: self.start_date,
            repeat_rule: self.repeat_rule,
            cancelled_dates: BTreeSet::new(),
            subscriptions: Vec::new(),
            created_at,
            updated_at: created_at,
            revision: EventRevision::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn weekly_event() -> Event {
        let unix_epoch: DateTime<Utc> = std::time::SystemTime::UNIX_EPOCH.into();

        NewEvent {
            organization: OrganizationId::nil(),
            title: "Sunday league".into(),
            start_date: date("2024-01-07"),
            repeat_rule: RepeatRule::Weekly,
        }
        .into_event(EventId::nil(), unix_epoch)
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut event = weekly_event();

        assert_eq!(event.cancel_occurrence(date("2024-01-14")), Ok(true));
        assert_eq!(event.cancel_occurrence(date("2024-01-14")), Ok(false));
        assert_eq!(event.cancelled_dates.len(), 1);
    }

    #[test]
    fn cancel_rejects_dates_outside_the_series() {
        let mut event = weekly_event();

        assert_eq!(
            event.cancel_occurrence(date("2024-01-15")),
            Err(EventError::InvalidOccurrenceDate(date("2024-01-15")))
        );
        assert!(event.cancelled_dates.is_empty());
    }

    #[test]
    fn restore_after_cancel_clears_the_mark() {
        let mut event = weekly_event();

        event.cancel_occurrence(date("2024-01-14")).unwrap();
        assert_eq!(event.restore_occurrence(date("2024-01-14")), Ok(true));
        assert_eq!(event.restore_occurrence(date("2024-01-14")), Ok(false));

        let occurrences = event.upcoming_occurrences(date("2024-01-01"), 2).unwrap();
        assert!(occurrences.iter().all(|o| !o.is_cancelled));
    }

    #[test]
    fn cancelling_does_not_touch_the_roster() {
        let mut event = weekly_event();
        let participant = ParticipantId::from_u128(1);

        event
            .join(date("2024-01-14"), participant, json!({}))
            .unwrap();
        event.cancel_occurrence(date("2024-01-14")).unwrap();

        assert_eq!(event.roster_for(date("2024-01-14")).len(), 1);

        event.restore_occurrence(date("2024-01-14")).unwrap();
        assert_eq!(event.roster_for(date("2024-01-14")).len(), 1);
    }

    #[test]
    fn join_twice_for_the_same_occurrence_fails() {
        let mut event = weekly_event();
        let participant = ParticipantId::from_u128(1);

        event
            .join(date("2024-01-14"), participant, json!({}))
            .unwrap();

        assert_eq!(
            event.join(date("2024-01-14"), participant, json!({})),
            Err(EventError::AlreadySubscribed)
        );
        assert_eq!(event.roster_for(date("2024-01-14")).len(), 1);
    }

    #[test]
    fn joining_different_occurrences_is_allowed() {
        let mut event = weekly_event();
        let participant = ParticipantId::from_u128(1);

        event
            .join(date("2024-01-14"), participant, json!({}))
            .unwrap();
        event
            .join(date("2024-01-21"), participant, json!({}))
            .unwrap();

        assert_eq!(event.roster_for(date("2024-01-14")).len(), 1);
        assert_eq!(event.roster_for(date("2024-01-21")).len(), 1);
    }

    #[test]
    fn join_rejects_cancelled_and_foreign_dates() {
        let mut event = weekly_event();
        event.cancel_occurrence(date("2024-01-14")).unwrap();

        assert_eq!(
            event.join(date("2024-01-14"), ParticipantId::from_u128(1), json!({})),
            Err(EventError::UnknownOccurrence(date("2024-01-14")))
        );
        assert_eq!(
            event.join(date("2024-01-15"), ParticipantId::from_u128(1), json!({})),
            Err(EventError::UnknownOccurrence(date("2024-01-15")))
        );
    }

    #[test]
    fn unjoin_removes_exactly_the_matching_subscription() {
        let mut event = weekly_event();
        let first = ParticipantId::from_u128(1);
        let second = ParticipantId::from_u128(2);

        event.join(date("2024-01-14"), first, json!({})).unwrap();
        event.join(date("2024-01-14"), second, json!({})).unwrap();

        let removed = event.unjoin(date("2024-01-14"), first).unwrap();
        assert_eq!(removed.participant_id, first);

        let roster = event.roster_for(date("2024-01-14"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].participant_id, second);
    }

    #[test]
    fn unjoin_without_a_subscription_fails() {
        let mut event = weekly_event();

        assert_eq!(
            event.unjoin(date("2024-01-14"), ParticipantId::from_u128(1)),
            Err(EventError::NotSubscribed)
        );
    }

    #[test]
    fn roster_is_scoped_to_one_date() {
        let mut event = weekly_event();

        event
            .join(date("2024-01-14"), ParticipantId::from_u128(1), json!({}))
            .unwrap();
        event
            .join(date("2024-01-21"), ParticipantId::from_u128(2), json!({}))
            .unwrap();

        let roster = event.roster_for(date("2024-01-14"));
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].occurrence_date, date("2024-01-14"));
        assert!(event.roster_for(date("2024-01-28")).is_empty());
    }

    #[test]
    fn upcoming_occurrences_apply_the_overlay() {
        let mut event = weekly_event();
        event.cancel_occurrence(date("2024-01-14")).unwrap();

        let occurrences = event.upcoming_occurrences(date("2024-01-01"), 3).unwrap();

        assert_eq!(
            occurrences
                .iter()
                .map(|o| (o.date, o.is_cancelled))
                .collect::<Vec<_>>(),
            vec![
                (date("2024-01-07"), false),
                (date("2024-01-14"), true),
                (date("2024-01-21"), false),
            ]
        );
    }

    #[test]
    fn next_active_occurrence_skips_cancelled_dates() {
        let mut event = weekly_event();
        event.cancel_occurrence(date("2024-01-14")).unwrap();

        assert_eq!(
            event.next_active_occurrence(date("2024-01-08")).unwrap(),
            Some(date("2024-01-21"))
        );
    }

    #[test]
    fn event_wire_format_uses_iso_dates() {
        let mut event = weekly_event();
        event.cancel_occurrence(date("2024-01-14")).unwrap();
        event
            .join(
                date("2024-01-21"),
                ParticipantId::nil(),
                json!({"nickname": "Sam"}),
            )
            .unwrap();

        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["startDate"], json!("2024-01-07"));
        assert_eq!(value["repeatRule"], json!("week"));
        assert_eq!(value["cancelledDates"], json!(["2024-01-14"]));
        assert_eq!(
            value["subscriptions"],
            json!([{
                "participantId": "00000000-0000-0000-0000-000000000000",
                "occurrenceDate": "2024-01-21",
                "metadata": {"nickname": "Sam"},
            }])
        );
    }

    #[test]
    fn event_roundtrips_through_its_wire_format() {
        let mut event = weekly_event();
        event.cancel_occurrence(date("2024-01-14")).unwrap();

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(back, event);
    }
}
