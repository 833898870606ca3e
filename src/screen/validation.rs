// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side form validation. A failing check blocks the request and is
//! shown inline next to the form.

use chrono::{DateTime, Utc};

use crate::models::{EventUpdate, GroupUpdate, TeamUpdate};

/// Longest name the backend accepts for groups and teams.
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    EmptyName,

    #[error("Name must be at most {max} characters.")]
    NameTooLong { max: usize },

    #[error("End time must be after the start time.")]
    EndBeforeStart,
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
    }
    Ok(())
}

/// An open-ended window (no end) is valid; an end equal to the start is not.
pub fn validate_time_window(
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match ends_at {
        Some(end) if end <= starts_at => Err(ValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}

pub fn validate_group_update(update: &GroupUpdate) -> Result<(), ValidationError> {
    validate_name(&update.name)
}

pub fn validate_team_update(update: &TeamUpdate) -> Result<(), ValidationError> {
    validate_name(&update.name)
}

pub fn validate_event_update(update: &EventUpdate) -> Result<(), ValidationError> {
    validate_name(&update.title)?;
    validate_time_window(update.starts_at, update.ends_at)
}
