// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! The iteration service composes the occurrence arithmetic, the
//! cancellation overlay and the subscription ledger behind the two
//! operations every caller needs: listing upcoming iterations and mutating
//! the state of one iteration. The administrative and the public surface go
//! through the exact same code paths.
//!
//! Every mutation is a load-modify-save cycle against one event record. The
//! store detects concurrent writes through its revision check; on a conflict
//! the cycle is retried from a fresh load a bounded number of times.

use schedule::ScheduleError;
use std::sync::Arc;
use storage::events::{Event, EventError, Subscription};
use storage::{EventStore, StorageError};
use types::{CalendarDate, EventId, ParticipantId};

/// How often a load-modify-save cycle is attempted before the conflict is
/// surfaced to the caller.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Error type of the [`IterationService`] operations
#[derive(Debug, thiserror::Error)]
pub enum IterationError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Join/leave was requested but the event has no active occurrence left
    /// within the lookahead window.
    #[error("the event has no upcoming active occurrence")]
    NoUpcomingOccurrence,
}

/// One upcoming iteration of an event together with its roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    pub date: CalendarDate,
    pub is_cancelled: bool,
    pub participants: Vec<Subscription>,
}

/// Whether a cancellation toggle marks or unmarks the date.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CancelAction {
    Cancel,
    Uncancel,
}

pub struct IterationService {
    store: Arc<dyn EventStore>,
}

impl IterationService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// The first `count` iterations of the event at or after `from_date`,
    /// each with its cancellation state and the roster of exactly that date.
    #[tracing::instrument(err, skip(self))]
    pub async fn list_upcoming(
        &self,
        event_id: EventId,
        from_date: CalendarDate,
        count: usize,
    ) -> Result<Vec<Iteration>, IterationError> {
        let event = self.store.load_event(event_id).await?;

        let occurrences = event.upcoming_occurrences(from_date, count)?;

        let iterations = occurrences
            .into_iter()
            .map(|occurrence| Iteration {
                date: occurrence.date,
                is_cancelled: occurrence.is_cancelled,
                participants: event
                    .roster_for(occurrence.date)
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .collect();

        Ok(iterations)
    }

    /// Cancel or restore one iteration of the event.
    ///
    /// Redundant toggles are no-ops; the returned bool tells whether the
    /// call changed anything.
    #[tracing::instrument(err, skip(self))]
    pub async fn toggle_cancellation(
        &self,
        event_id: EventId,
        date: CalendarDate,
        action: CancelAction,
    ) -> Result<bool, IterationError> {
        self.modify_event(event_id, |event| {
            let changed = match action {
                CancelAction::Cancel => event.cancel_occurrence(date)?,
                CancelAction::Uncancel => event.restore_occurrence(date)?,
            };

            Ok(changed)
        })
        .await
    }

    /// Subscribe a participant to the event's next active iteration.
    ///
    /// The occurrence date is always resolved server-side from `from_date`;
    /// callers never pick a date themselves.
    #[tracing::instrument(err, skip(self, metadata))]
    pub async fn join_next_occurrence(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
        metadata: serde_json::Value,
        from_date: CalendarDate,
    ) -> Result<Subscription, IterationError> {
        self.modify_event(event_id, |event| {
            let date = event
                .next_active_occurrence(from_date)
                .map_err(IterationError::Schedule)?
                .ok_or(IterationError::NoUpcomingOccurrence)?;

            Ok(event.join(date, participant_id, metadata.clone())?)
        })
        .await
    }

    /// Remove a participant's subscription from the event's next active
    /// iteration.
    #[tracing::instrument(err, skip(self))]
    pub async fn leave_next_occurrence(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
        from_date: CalendarDate,
    ) -> Result<Subscription, IterationError> {
        self.modify_event(event_id, |event| {
            let date = event
                .next_active_occurrence(from_date)
                .map_err(IterationError::Schedule)?
                .ok_or(IterationError::NoUpcomingOccurrence)?;

            Ok(event.unjoin(date, participant_id)?)
        })
        .await
    }

    /// Run one load-modify-save cycle, retrying on write conflicts.
    ///
    /// `apply` must be free of side effects outside the passed event, it may
    /// run multiple times.
    async fn modify_event<T, F>(&self, event_id: EventId, mut apply: F) -> Result<T, IterationError>
    where
        F: FnMut(&mut Event) -> Result<T, IterationError>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut event = self.store.load_event(event_id).await?;
            let value = apply(&mut event)?;

            match self.store.save_event(event).await {
                Ok(_) => return Ok(value),
                Err(StorageError::Conflict) if attempt < MAX_SAVE_ATTEMPTS => {
                    log::warn!(
                        "conflicting write on event {event_id}, retrying ({attempt}/{MAX_SAVE_ATTEMPTS})"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
