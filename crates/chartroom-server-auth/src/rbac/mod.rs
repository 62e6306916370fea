// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-based access control.
//!
//! Access decisions are made for a team role, never for a user directly: the
//! caller resolves the user's role in the owning team first and then asks the
//! [`PolicyEngine`] whether that role may perform an [`Action`] on a
//! [`ResourceType`].

mod engine;
pub mod policies;
mod types;

pub use engine::{AccessControl, PolicyEngine, PolicyError};
pub use types::{Action, Grant, Permission, Possession, ResourceType};
