// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use super::request::PagePaginationQuery;
use super::response::{ApiError, NoContent};
use super::{ApiResponse, DefaultApiResult};
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, patch, post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use storage::events::{Event, EventRevision, NewEvent, Subscription};
use storage::EventStore;
use types::{CalendarDate, EventId, OrganizationId, RepeatRule};
use validator::Validate;

pub mod iterations;
pub mod subscriptions;

/// Event Resource representation
///
/// Returned from `GET /events/`, `GET /events/{event_id}` and the event
/// mutation endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    /// ID of the event
    pub id: EventId,

    /// The tenant organization owning the event
    pub organization: OrganizationId,

    /// Title of the event
    ///
    /// For display purposes
    pub title: String,

    /// Calendar date of the first occurrence
    pub start_date: CalendarDate,

    /// How the event recurs from its start date
    pub repeat_rule: RepeatRule,

    /// Occurrence dates that are currently cancelled
    pub cancelled_dates: BTreeSet<CalendarDate>,

    /// All per-occurrence subscriptions of the event
    pub subscriptions: Vec<Subscription>,

    /// Timestamp of the event creation
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update
    pub updated_at: DateTime<Utc>,

    /// Storage revision, advances with every write
    pub revision: EventRevision,
}

impl From<Event> for EventResource {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            organization: event.organization,
            title: event.title,
            start_date: event.start_date,
            repeat_rule: event.repeat_rule,
            cancelled_dates: event.cancelled_dates,
            subscriptions: event.subscriptions,
            created_at: event.created_at,
            updated_at: event.updated_at,
            revision: event.revision,
        }
    }
}

/// Request body for the `POST /events` endpoint
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostEventsBody {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub organization: OrganizationId,
    pub start_date: CalendarDate,
    #[serde(default)]
    pub repeat_rule: RepeatRule,
}

/// API Endpoint `POST /events`
///
/// Create a new match event for an organization
#[post("/events")]
pub async fn new_event(
    store: Data<dyn EventStore>,
    body: Json<PostEventsBody>,
) -> DefaultApiResult<EventResource> {
    let body = body.into_inner();

    body.validate()?;

    let event = store
        .create_event(NewEvent {
            organization: body.organization,
            title: body.title,
            start_date: body.start_date,
            repeat_rule: body.repeat_rule,
        })
        .await?;

    Ok(ApiResponse::new(EventResource::from(event)).with_status(StatusCode::CREATED))
}

/// Query parameters of the `GET /events` endpoint
#[derive(Debug, Deserialize)]
pub struct GetEventsQuery {
    /// The organization to list events for
    organization: OrganizationId,
}

/// API Endpoint `GET /events`
///
/// Returns the events of one organization, ordered by start date
#[get("/events")]
pub async fn get_events(
    store: Data<dyn EventStore>,
    query: Query<GetEventsQuery>,
    pagination: Query<PagePaginationQuery>,
) -> DefaultApiResult<Vec<EventResource>> {
    let per_page = pagination.per_page();
    let page = pagination.page();

    let events = store
        .get_events_for_organization(query.organization)
        .await?;

    let total = events.len() as i64;

    let events = events
        .into_iter()
        .skip(((page - 1) * per_page) as usize)
        .take(per_page as usize)
        .map(EventResource::from)
        .collect();

    Ok(ApiResponse::new(events).with_page_pagination(per_page, page, total))
}

/// API Endpoint `GET /events/{event_id}`
///
/// Returns the event resource for the given id
#[get("/events/{event_id}")]
pub async fn get_event(
    store: Data<dyn EventStore>,
    event_id: Path<EventId>,
) -> DefaultApiResult<EventResource> {
    let event = store.load_event(event_id.into_inner()).await?;

    Ok(ApiResponse::new(EventResource::from(event)))
}

/// Request body for the `PATCH /events/{event_id}` endpoint
///
/// `start_date` and `repeat_rule` are deliberately not patchable: existing
/// subscriptions reference occurrence dates of the current series, and
/// moving the series would strand them.
#[derive(Debug, Deserialize, Validate)]
pub struct PatchEventBody {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
}

/// API Endpoint `PATCH /events/{event_id}`
///
/// Update an event's display fields
#[patch("/events/{event_id}")]
pub async fn patch_event(
    store: Data<dyn EventStore>,
    event_id: Path<EventId>,
    body: Json<PatchEventBody>,
) -> DefaultApiResult<EventResource> {
    let body = body.into_inner();

    body.validate()?;

    let mut event = store.load_event(event_id.into_inner()).await?;

    if let Some(title) = body.title {
        event.title = title;
    }

    let event = store.save_event(event).await?;

    Ok(ApiResponse::new(EventResource::from(event)))
}

/// API Endpoint `DELETE /events/{event_id}`
///
/// Deletes the event and, with it, all of its subscriptions
#[delete("/events/{event_id}")]
pub async fn delete_event(
    store: Data<dyn EventStore>,
    event_id: Path<EventId>,
) -> Result<NoContent, ApiError> {
    store.delete_event(event_id.into_inner()).await?;

    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_util::assert_eq_json;
    use test_util::events::{date, make_event};
    use types::ParticipantId;

    #[test]
    fn event_resource_serialize() {
        let mut event = make_event("Sunday league", date("2024-01-07"), RepeatRule::Weekly);
        event.cancel_occurrence(date("2024-01-14")).unwrap();
        event
            .join(
                date("2024-01-21"),
                ParticipantId::nil(),
                serde_json::json!({ "nickname": "Sam" }),
            )
            .unwrap();

        let resource = EventResource::from(event);

        assert_eq_json!(
            resource,
            {
                "id": "00000000-0000-0000-0000-000000000000",
                "organization": "00000000-0000-0000-0000-000000000000",
                "title": "Sunday league",
                "startDate": "2024-01-07",
                "repeatRule": "week",
                "cancelledDates": ["2024-01-14"],
                "subscriptions": [
                    {
                        "participantId": "00000000-0000-0000-0000-000000000000",
                        "occurrenceDate": "2024-01-21",
                        "metadata": { "nickname": "Sam" }
                    }
                ],
                "createdAt": "1970-01-01T00:00:00Z",
                "updatedAt": "1970-01-01T00:00:00Z",
                "revision": 0
            }
        );
    }
}
