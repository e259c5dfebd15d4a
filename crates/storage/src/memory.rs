// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! In-memory [`EventStore`] implementation.
//!
//! Backs the controller in tests and single-node deployments without an
//! external database. The revision check in [`MemoryEventStore::save_event`]
//! behaves exactly like the contract demands from real stores, so the
//! conflict-retry path of the callers is exercised the same way.

use crate::events::{Event, NewEvent};
use crate::{EventStore, Result, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use types::{EventId, OrganizationId};

#[derive(Default)]
pub struct MemoryEventStore {
    events: RwLock<HashMap<EventId, Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    #[tracing::instrument(err, skip_all)]
    async fn create_event(&self, new_event: NewEvent) -> Result<Event> {
        let event = new_event.into_event(EventId::generate(), Utc::now());

        self.events.write().insert(event.id, event.clone());
        log::debug!("created event {}", event.id);

        Ok(event)
    }

    #[tracing::instrument(err, skip(self))]
    async fn load_event(&self, event_id: EventId) -> Result<Event> {
        self.events
            .read()
            .get(&event_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    #[tracing::instrument(err, skip_all)]
    async fn save_event(&self, mut event: Event) -> Result<Event> {
        let mut events = self.events.write();

        let stored = events.get(&event.id).ok_or(StorageError::NotFound)?;

        if stored.revision != event.revision {
            return Err(StorageError::Conflict);
        }

        event.revision = event.revision.next();
        event.updated_at = Utc::now();
        events.insert(event.id, event.clone());

        Ok(event)
    }

    #[tracing::instrument(err, skip(self))]
    async fn delete_event(&self, event_id: EventId) -> Result<()> {
        self.events
            .write()
            .remove(&event_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    #[tracing::instrument(err, skip(self))]
    async fn get_events_for_organization(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .values()
            .filter(|event| event.organization == organization)
            .cloned()
            .collect();

        events.sort_by(|a, b| {
            (a.start_date, a.created_at, a.id).cmp(&(b.start_date, b.created_at, b.id))
        });

        Ok(events)
    }
}
