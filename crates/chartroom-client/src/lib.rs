// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the saved query endpoints, plus the selector state that sits
//! on top of it.

pub mod api;
pub mod client;
pub mod error;
pub mod selector;

pub use api::SavedQueryApi;
pub use client::{SavedQueryClient, SavedQueryClientBuilder};
pub use error::{ClientError, Result};
pub use selector::{ActionState, EditTarget, FetchState, QuerySelector, RemoveTarget, SelectorError};
