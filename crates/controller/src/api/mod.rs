// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

//! HTTP API of the Matchday controller
//!
//! Versioned under `/v1`; the public surface mounts a subset of the same
//! handlers under `/public/v1`.

pub mod v1;
