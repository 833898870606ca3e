// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! Holds the authenticated user for the console.
//!
//! ## Lifecycle
//!
//! 1. `POST /auth/login` returns `{ token, user }`
//! 2. [`SessionStore::sign_in`] keeps both and persists them
//! 3. Every API request carries `Authorization: Bearer <token>`
//! 4. [`SessionStore::sign_out`] clears memory and persistence
//!
//! On startup [`SessionStore::restore`] reloads a persisted session unless
//! its token has expired.

pub mod store;
pub mod token;
pub mod user;

pub use store::{IdentityProvider, SessionStore, StaticIdentity, TokenSource};
pub use token::{FileTokenStore, MemoryTokenStore, Session, SessionError, TokenStore};
pub use user::SessionUser;
