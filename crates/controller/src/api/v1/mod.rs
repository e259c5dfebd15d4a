// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! REST APIv1
//!
//! Current Endpoints. See their respective function:
//! - `/events` ([post](events::new_event), [get](events::get_events))
//! - `/events/{event_id}` ([get](events::get_event), [patch](events::patch_event), [delete](events::delete_event))
//! - `/events/{event_id}/iterations` ([get](events::iterations::get_event_iterations))
//! - `/events/{event_id}/cancel` ([post](events::iterations::cancel_event_iteration))
//! - `/events/{event_id}/uncancel` ([post](events::iterations::uncancel_event_iteration))
//! - `/events/{event_id}/join` ([post](events::subscriptions::join_event))
//! - `/events/{event_id}/unjoin` ([post](events::subscriptions::unjoin_event))

use chrono::Utc;
use types::CalendarDate;

pub mod events;
pub mod request;
pub mod response;

pub use response::{ApiResponse, DefaultApiResult};

/// The current day in the canonical (UTC) calendar.
///
/// The single place where "now" enters the system; everything below the
/// handlers takes the date as a parameter.
pub(crate) fn current_calendar_date() -> CalendarDate {
    CalendarDate::from(Utc::now().date_naive())
}
