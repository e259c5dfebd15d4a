// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use super::super::response::{ApiError, NoContent};
use super::super::{current_calendar_date, ApiResponse, DefaultApiResult};
use crate::services::IterationService;
use actix_web::http::StatusCode;
use actix_web::post;
use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use storage::events::Subscription;
use types::{EventId, ParticipantId};

/// Request body for the `POST /events/{event_id}/join` endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostJoinBody {
    pub participant_id: ParticipantId,
    /// Free-form data stored with the subscription, e.g. a nickname
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// API Endpoint `POST /events/{event_id}/join`
///
/// Subscribe a participant to the event's next active iteration.
///
/// The occurrence date is resolved server-side, skipping cancelled dates;
/// clients never supply a date. Fails with `already_subscribed` when a
/// subscription for the resolved date exists.
#[post("/events/{event_id}/join")]
pub async fn join_event(
    service: Data<IterationService>,
    event_id: Path<EventId>,
    body: Json<PostJoinBody>,
) -> DefaultApiResult<Subscription> {
    let PostJoinBody {
        participant_id,
        metadata,
    } = body.into_inner();

    let subscription = service
        .join_next_occurrence(
            event_id.into_inner(),
            participant_id,
            metadata,
            current_calendar_date(),
        )
        .await?;

    Ok(ApiResponse::new(subscription).with_status(StatusCode::CREATED))
}

/// Request body for the `POST /events/{event_id}/unjoin` endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUnjoinBody {
    pub participant_id: ParticipantId,
}

/// API Endpoint `POST /events/{event_id}/unjoin`
///
/// Remove a participant's subscription from the event's next active
/// iteration. Fails with `not_subscribed` when there is none.
#[post("/events/{event_id}/unjoin")]
pub async fn unjoin_event(
    service: Data<IterationService>,
    event_id: Path<EventId>,
    body: Json<PostUnjoinBody>,
) -> Result<NoContent, ApiError> {
    service
        .leave_next_occurrence(
            event_id.into_inner(),
            body.participant_id,
            current_calendar_date(),
        )
        .await?;

    Ok(NoContent)
}
