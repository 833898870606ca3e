// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Role and ownership based gating for every mutating action in the console.
//!
//! ## Flow
//!
//! 1. The session store holds the signed-in user and their global role
//! 2. Resource fetches produce a canonical [`OwnershipRecord`]
//! 3. The [`AuthorizationGate`] combines both into an [`AccessDecision`]
//! 4. Screens render controls from the decision; the dispatcher re-checks
//!    the gate right before every mutation request

pub mod error;
pub mod gate;
pub mod ownership;
pub mod roles;

pub use error::AuthError;
pub use gate::{
    can_modify, permission_level, AccessDecision, AuthorizationGate, MutationAction,
    PermissionLevel, ReadOnlyBanner, ReadOnlyReason,
};
pub use ownership::{listed_leaders, OwnedResource, OwnershipRecord};
pub use roles::Role;
