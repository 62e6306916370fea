// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the Chartroom server.
//!
//! Each aggregate has a `*Store` trait (what the server depends on) and a
//! `*Repository` implementing it over SQLite.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod project;
mod row;
pub mod saved_query;
pub mod session;
pub mod team;
pub mod testing;
pub mod types;
pub mod user;

pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, ping};
pub use project::{ProjectRepository, ProjectStore};
pub use saved_query::{SavedQueryRepository, SavedQueryStore};
pub use session::{SessionRepository, SessionStore};
pub use team::{TeamRepository, TeamStore};
pub use types::{NewSavedQuery, SavedQuery, SavedQueryCreator};
pub use user::{UserRepository, UserStore};
