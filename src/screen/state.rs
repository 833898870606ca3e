// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Detail screen states and transition errors.

use std::fmt;

use serde::Serialize;

use super::countdown::DeleteCountdown;
use super::validation::ValidationError;
use crate::auth::AuthError;
use crate::dispatch::DispatchError;
use crate::error::ApiError;
use crate::models::ResourceId;

/// Coarse screen phase, published to observers on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Unavailable,
    Loaded,
    Editing,
    Saving,
    Deleting,
    Deleted,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Unavailable => "unavailable",
            Phase::Loaded => "loaded",
            Phase::Editing => "editing",
            Phase::Saving => "saving",
            Phase::Deleting => "deleting",
            Phase::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full screen state for a resource `R` edited through drafts of type `D`.
#[derive(Debug, Clone)]
pub enum DetailState<R, D> {
    Loading,
    /// The initial fetch failed; nothing can be mutated.
    Unavailable { message: String },
    Loaded(R),
    /// `error` holds the inline message of the last failed save or check.
    Editing {
        resource: R,
        draft: D,
        error: Option<String>,
    },
    Saving { resource: R, draft: D },
    Deleting {
        resource: R,
        countdown: DeleteCountdown,
    },
    Deleted,
}

impl<R, D> DetailState<R, D> {
    pub fn phase(&self) -> Phase {
        match self {
            DetailState::Loading => Phase::Loading,
            DetailState::Unavailable { .. } => Phase::Unavailable,
            DetailState::Loaded(_) => Phase::Loaded,
            DetailState::Editing { .. } => Phase::Editing,
            DetailState::Saving { .. } => Phase::Saving,
            DetailState::Deleting { .. } => Phase::Deleting,
            DetailState::Deleted => Phase::Deleted,
        }
    }

    /// The last fetched resource, if the screen holds one.
    pub fn resource(&self) -> Option<&R> {
        match self {
            DetailState::Loaded(resource)
            | DetailState::Editing { resource, .. }
            | DetailState::Saving { resource, .. }
            | DetailState::Deleting { resource, .. } => Some(resource),
            DetailState::Loading | DetailState::Unavailable { .. } | DetailState::Deleted => None,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            DetailState::Editing { draft, .. } | DetailState::Saving { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Inline form error while editing.
    pub fn form_error(&self) -> Option<&str> {
        match self {
            DetailState::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("cannot {action} while the screen is {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },

    #[error(transparent)]
    Denied(AuthError),

    /// The target of a mutation belongs to another resource than the one
    /// whose ownership gates this screen.
    #[error("{noun} {id} does not belong to this screen")]
    ForeignResource { noun: &'static str, id: ResourceId },

    #[error("delete can be confirmed in {remaining_secs}s")]
    CountdownPending { remaining_secs: u64 },

    #[error(transparent)]
    Validation(ValidationError),

    #[error(transparent)]
    Dispatch(DispatchError),

    #[error("{message}")]
    Load {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("screen was closed")]
    Cancelled,
}

impl From<DispatchError> for ScreenError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Denied(denied) => ScreenError::Denied(denied),
            DispatchError::Cancelled => ScreenError::Cancelled,
            other => ScreenError::Dispatch(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MutationAction;

    #[test]
    fn resource_is_visible_in_every_holding_state() {
        let loaded: DetailState<&str, ()> = DetailState::Loaded("g");
        assert_eq!(loaded.resource(), Some(&"g"));
        assert_eq!(loaded.phase(), Phase::Loaded);

        let saving: DetailState<&str, u8> = DetailState::Saving {
            resource: "g",
            draft: 1,
        };
        assert_eq!(saving.draft(), Some(&1));
        assert_eq!(saving.phase().to_string(), "saving");

        let gone: DetailState<&str, ()> = DetailState::Deleted;
        assert!(gone.resource().is_none());
    }

    #[test]
    fn dispatch_denials_map_to_screen_denials() {
        let err: ScreenError = DispatchError::Denied(AuthError::PermissionDenied {
            action: MutationAction::EditSettings,
        })
        .into();
        assert!(matches!(err, ScreenError::Denied(_)));

        let err: ScreenError = DispatchError::Cancelled.into();
        assert!(matches!(err, ScreenError::Cancelled));
    }
}
