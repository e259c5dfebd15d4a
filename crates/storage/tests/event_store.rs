// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use pretty_assertions::assert_eq;
use serde_json::json;
use storage::events::NewEvent;
use storage::memory::MemoryEventStore;
use storage::{EventStore, StorageError};
use types::{CalendarDate, EventId, OrganizationId, ParticipantId, RepeatRule};

fn date(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

fn new_event(title: &str, organization: OrganizationId, start: &str) -> NewEvent {
    NewEvent {
        organization,
        title: title.into(),
        start_date: date(start),
        repeat_rule: RepeatRule::Weekly,
    }
}

#[tokio::test]
async fn create_then_load_returns_the_stored_event() {
    let store = MemoryEventStore::new();

    let created = store
        .create_event(new_event("Sunday league", OrganizationId::nil(), "2024-01-07"))
        .await
        .unwrap();

    let loaded = store.load_event(created.id).await.unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn load_of_unknown_event_fails() {
    let store = MemoryEventStore::new();

    let result = store.load_event(EventId::nil()).await;

    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn save_advances_the_revision() {
    let store = MemoryEventStore::new();
    let created = store
        .create_event(new_event("Sunday league", OrganizationId::nil(), "2024-01-07"))
        .await
        .unwrap();

    let mut event = store.load_event(created.id).await.unwrap();
    event.title = "Sunday league (indoor)".into();
    let saved = store.save_event(event).await.unwrap();

    assert_eq!(saved.revision, created.revision.next());
    assert_eq!(
        store.load_event(created.id).await.unwrap().title,
        "Sunday league (indoor)"
    );
}

#[tokio::test]
async fn concurrent_saves_from_the_same_revision_conflict() {
    let store = MemoryEventStore::new();
    let created = store
        .create_event(new_event("Sunday league", OrganizationId::nil(), "2024-01-07"))
        .await
        .unwrap();

    // Two callers load the same revision and both modify it.
    let mut first = store.load_event(created.id).await.unwrap();
    let mut second = store.load_event(created.id).await.unwrap();

    first
        .join(date("2024-01-07"), ParticipantId::from_u128(1), json!({}))
        .unwrap();
    second
        .join(date("2024-01-07"), ParticipantId::from_u128(2), json!({}))
        .unwrap();

    store.save_event(first).await.unwrap();
    let result = store.save_event(second).await;

    assert!(matches!(result, Err(StorageError::Conflict)));

    // The losing write is not partially applied.
    let stored = store.load_event(created.id).await.unwrap();
    assert_eq!(stored.subscriptions.len(), 1);
    assert_eq!(
        stored.subscriptions[0].participant_id,
        ParticipantId::from_u128(1)
    );
}

#[tokio::test]
async fn retry_after_conflict_succeeds_on_the_fresh_revision() {
    let store = MemoryEventStore::new();
    let created = store
        .create_event(new_event("Sunday league", OrganizationId::nil(), "2024-01-07"))
        .await
        .unwrap();

    let stale = store.load_event(created.id).await.unwrap();
    let mut winner = store.load_event(created.id).await.unwrap();
    winner
        .join(date("2024-01-07"), ParticipantId::from_u128(1), json!({}))
        .unwrap();
    store.save_event(winner).await.unwrap();

    assert!(matches!(
        store.save_event(stale).await,
        Err(StorageError::Conflict)
    ));

    // Reload and reapply, as the façade's bounded retry does.
    let mut fresh = store.load_event(created.id).await.unwrap();
    fresh
        .join(date("2024-01-07"), ParticipantId::from_u128(2), json!({}))
        .unwrap();
    store.save_event(fresh).await.unwrap();

    let stored = store.load_event(created.id).await.unwrap();
    assert_eq!(stored.subscriptions.len(), 2);
}

#[tokio::test]
async fn delete_removes_the_event_and_its_subscriptions() {
    let store = MemoryEventStore::new();
    let created = store
        .create_event(new_event("Sunday league", OrganizationId::nil(), "2024-01-07"))
        .await
        .unwrap();

    let mut event = store.load_event(created.id).await.unwrap();
    event
        .join(date("2024-01-07"), ParticipantId::from_u128(1), json!({}))
        .unwrap();
    store.save_event(event).await.unwrap();

    store.delete_event(created.id).await.unwrap();

    assert!(matches!(
        store.load_event(created.id).await,
        Err(StorageError::NotFound)
    ));
    assert!(matches!(
        store.delete_event(created.id).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn organization_listing_is_scoped_and_ordered() {
    let store = MemoryEventStore::new();
    let org = OrganizationId::from_u128(1);
    let other_org = OrganizationId::from_u128(2);

    store
        .create_event(new_event("Second", org, "2024-03-01"))
        .await
        .unwrap();
    store
        .create_event(new_event("First", org, "2024-01-07"))
        .await
        .unwrap();
    store
        .create_event(new_event("Elsewhere", other_org, "2024-01-01"))
        .await
        .unwrap();

    let events = store.get_events_for_organization(org).await.unwrap();

    assert_eq!(
        events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
        vec!["First", "Second"]
    );
}
