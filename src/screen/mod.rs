// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Screens
//!
//! Headless view-models for the console's editable screens. They own the
//! fetched data and screen state. Every mutation is routed through a
//! [`MutationDispatcher`](crate::dispatch::MutationDispatcher).
//!
//! - [`ResourceDetailScreen`] - group and team detail with edit and delete
//! - [`AttendanceBoard`] - events and attendance of one group
//! - [`DeleteCountdown`] - delete confirmation cool-down

pub mod attendance;
pub mod countdown;
pub mod detail;
pub mod kind;
pub mod state;
pub mod validation;

pub use attendance::AttendanceBoard;
pub use countdown::DeleteCountdown;
pub use detail::{Controls, GroupDetailScreen, ResourceDetailScreen, TeamDetailScreen};
pub use kind::{ComcellGroups, ResourceKind, Teams};
pub use state::{DetailState, Phase, ScreenError};
pub use validation::ValidationError;
