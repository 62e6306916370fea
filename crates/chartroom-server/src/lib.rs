// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Chartroom saved-query server.
//!
//! Exposes project-scoped saved queries over HTTP. Every request is
//! authenticated with a bearer session and then passes through the
//! [`SavedQueryPipeline`], which resolves the project, the caller's team role
//! and the policy decision before touching the store.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod validation;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use chartroom_server_config::ServerConfig;
pub use error::ServerError;
pub use pipeline::{ErrorKind, PipelineError, SavedQueryAction, SavedQueryPipeline};
