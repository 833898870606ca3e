// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comcell Console - client core of the church community admin console
//!
//! This crate holds everything below the UI: the session, the REST client,
//! role and ownership based authorization, gated mutation dispatch and the
//! headless detail screens built on top of them.
//!
//! ## Modules
//!
//! - `api` - REST client with per-screen cancellation
//! - `auth` - Roles, ownership records and the authorization gate
//! - `dispatch` - Gate-checked mutation wrapper
//! - `screen` - Group, team and attendance screen state
//! - `session` - Signed-in user and token persistence
//! - `state` - Console facade wiring the above together

pub mod api;
pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod screen;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;
