// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chartroom_server_api::{
	CreateSavedQueryRequest, RemoveSavedQueryResponse, SavedQueryResponse,
};

use crate::error::Result;

/// The saved query operations the selector depends on.
///
/// [`SavedQueryClient`](crate::SavedQueryClient) implements this over HTTP.
#[async_trait]
pub trait SavedQueryApi: Send + Sync {
	async fn list(&self, project_id: &str, query_type: Option<&str>)
		-> Result<Vec<SavedQueryResponse>>;

	async fn create(
		&self,
		project_id: &str,
		request: &CreateSavedQueryRequest,
	) -> Result<SavedQueryResponse>;

	async fn update(
		&self,
		project_id: &str,
		saved_query_id: &str,
		summary: &str,
	) -> Result<SavedQueryResponse>;

	async fn remove(&self, project_id: &str, saved_query_id: &str)
		-> Result<RemoveSavedQueryResponse>;
}
