// SPDX-FileCopyrightText: Matchday Team <dev@matchday.app>
//
// SPDX-License-Identifier: EUPL-1.2

/// Error types for the schedule arithmetic
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The generator hit its lookahead ceiling before producing the requested
    /// occurrences.
    ///
    /// This bound exists to fail fast on corrupted event data instead of
    /// walking an unbounded series; hitting it for a live event is a bug or a
    /// data problem, not a user error.
    #[error("occurrence generation exceeded the lookahead ceiling")]
    IterationCeilingExceeded,
}
