// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! Matchday event storage, interface and the in-memory implementation
//!
//! The controller core never talks to a database directly. It loads and
//! saves whole [`Event`](events::Event) records through the [`EventStore`]
//! trait; deployments plug in their own persistence behind it. Writes use an
//! optimistic revision check so that concurrent read-modify-write cycles on
//! the same event cannot silently lose updates.

use async_trait::async_trait;
use types::{EventId, OrganizationId};

pub mod events;
pub mod memory;

use crate::events::{Event, NewEvent};

/// Result type using [`StorageError`] as a default Error
pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// Error types for the storage abstraction
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("A requested resource could not be found")]
    NotFound,
    /// The event was modified between load and save.
    ///
    /// Callers are expected to reload the event and retry a bounded number
    /// of times before surfacing the conflict.
    #[error("The event was concurrently modified")]
    Conflict,
    #[error("Storage Error: `{0}`")]
    Custom(String),
}

pub trait OptionalExt<T, E> {
    fn optional(self) -> Result<Option<T>, E>;
}

impl<T> OptionalExt<T, StorageError> for Result<T, StorageError> {
    fn optional(self) -> Result<Option<T>, StorageError> {
        match self {
            Ok(t) => Ok(Some(t)),
            Err(StorageError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// The persistence collaborator contract for match events.
///
/// Events are loaded and saved as whole records. [`EventStore::save_event`]
/// must compare the revision of the passed event against the stored one and
/// fail with [`StorageError::Conflict`] on a mismatch.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event and return the stored record.
    async fn create_event(&self, new_event: NewEvent) -> Result<Event>;

    /// Load one event by id.
    async fn load_event(&self, event_id: EventId) -> Result<Event>;

    /// Save a previously loaded event.
    ///
    /// Returns the stored record with its revision advanced.
    async fn save_event(&self, event: Event) -> Result<Event>;

    /// Delete an event together with its subscriptions.
    async fn delete_event(&self, event_id: EventId) -> Result<()>;

    /// All events owned by the given organization, ordered by start date.
    async fn get_events_for_organization(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Event>>;
}
