// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

use super::super::response::{ApiError, Created, NoContent};
use super::super::{current_calendar_date, ApiResponse, DefaultApiResult};
use crate::services::{CancelAction, Iteration, IterationService};
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, Either};
use serde::{Deserialize, Serialize};
use storage::events::Subscription;
use types::{CalendarDate, EventId};

const DEFAULT_ITERATION_COUNT: usize = 30;
const MAX_ITERATION_COUNT: usize = 100;

/// Event iteration resource
///
/// An iteration is one concrete calendar-dated instance of a recurring
/// event, with its cancellation state and the roster of exactly that date.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventIteration {
    pub date: CalendarDate,
    pub is_cancelled: bool,
    pub participants: Vec<Subscription>,
}

impl From<Iteration> for EventIteration {
    fn from(iteration: Iteration) -> Self {
        Self {
            date: iteration.date,
            is_cancelled: iteration.is_cancelled,
            participants: iteration.participants,
        }
    }
}

/// Query parameters of the `GET /events/{event_id}/iterations` endpoint
#[derive(Debug, Deserialize)]
pub struct GetEventIterationsQuery {
    /// Number of iterations to return
    ///
    /// Default: 30, maximum: 100
    count: Option<usize>,
    /// First calendar date to consider
    ///
    /// Defaults to the current UTC day
    from: Option<CalendarDate>,
}

/// API Endpoint `GET /events/{event_id}/iterations`
///
/// Returns the upcoming iterations of the event
#[get("/events/{event_id}/iterations")]
pub async fn get_event_iterations(
    service: Data<IterationService>,
    event_id: Path<EventId>,
    query: Query<GetEventIterationsQuery>,
) -> DefaultApiResult<Vec<EventIteration>> {
    let event_id = event_id.into_inner();
    let GetEventIterationsQuery { count, from } = query.into_inner();

    let count = count
        .unwrap_or(DEFAULT_ITERATION_COUNT)
        .clamp(1, MAX_ITERATION_COUNT);
    let from = from.unwrap_or_else(current_calendar_date);

    let iterations = service.list_upcoming(event_id, from, count).await?;

    Ok(ApiResponse::new(
        iterations.into_iter().map(EventIteration::from).collect(),
    ))
}

/// Request body for the cancel/uncancel endpoints
#[derive(Debug, Deserialize)]
pub struct PostCancellationBody {
    /// The occurrence date to toggle
    pub date: CalendarDate,
}

/// API Endpoint `POST /events/{event_id}/cancel`
///
/// Marks one iteration of the event as cancelled. The roster of the date is
/// kept; restoring the date brings the participants back unchanged.
///
/// Returns 201 when the date was newly cancelled and 204 when it already
/// was (cancelling twice is not an error).
#[post("/events/{event_id}/cancel")]
pub async fn cancel_event_iteration(
    service: Data<IterationService>,
    event_id: Path<EventId>,
    body: Json<PostCancellationBody>,
) -> Result<Either<Created, NoContent>, ApiError> {
    let changed = service
        .toggle_cancellation(event_id.into_inner(), body.date, CancelAction::Cancel)
        .await?;

    if changed {
        Ok(Either::Left(Created))
    } else {
        Ok(Either::Right(NoContent))
    }
}

/// API Endpoint `POST /events/{event_id}/uncancel`
///
/// Removes the cancellation mark from one iteration of the event.
/// Idempotent, restoring a date that is not cancelled is a no-op.
#[post("/events/{event_id}/uncancel")]
pub async fn uncancel_event_iteration(
    service: Data<IterationService>,
    event_id: Path<EventId>,
    body: Json<PostCancellationBody>,
) -> Result<NoContent, ApiError> {
    service
        .toggle_cancellation(event_id.into_inner(), body.date, CancelAction::Uncancel)
        .await?;

    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_util::assert_eq_json;
    use test_util::events::date;
    use types::ParticipantId;

    #[test]
    fn event_iteration_serialize() {
        let iteration = EventIteration {
            date: date("2024-01-14"),
            is_cancelled: true,
            participants: vec![Subscription {
                participant_id: ParticipantId::nil(),
                occurrence_date: date("2024-01-14"),
                metadata: serde_json::json!({}),
            }],
        };

        assert_eq_json!(
            iteration,
            {
                "date": "2024-01-14",
                "isCancelled": true,
                "participants": [
                    {
                        "participantId": "00000000-0000-0000-0000-000000000000",
                        "occurrenceDate": "2024-01-14",
                        "metadata": {}
                    }
                ]
            }
        );
    }
}
