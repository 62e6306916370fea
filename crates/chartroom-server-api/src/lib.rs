// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod health;
pub mod saved_queries;

pub use health::{DatabaseHealth, HealthResponse, HealthStatus};
pub use saved_queries::{
	CreateSavedQueryRequest, ListSavedQueriesQuery, RemoveSavedQueryResponse,
	SavedQueryCreatorResponse, SavedQueryErrorResponse, SavedQueryResponse,
	UpdateSavedQueryRequest,
};
