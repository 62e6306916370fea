// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP implementation of [`SavedQueryApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chartroom_server_api::{
	CreateSavedQueryRequest, RemoveSavedQueryResponse, SavedQueryErrorResponse, SavedQueryResponse,
	UpdateSavedQueryRequest,
};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::api::SavedQueryApi;
use crate::error::{ClientError, Result};

/// Client version for identification.
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builder for constructing a [`SavedQueryClient`].
pub struct SavedQueryClientBuilder {
	auth_token: Option<String>,
	base_url: Option<String>,
	request_timeout: Duration,
}

impl SavedQueryClientBuilder {
	pub fn new() -> Self {
		Self {
			auth_token: None,
			base_url: None,
			request_timeout: Duration::from_secs(30),
		}
	}

	/// Sets the session token sent as `Authorization: Bearer <token>`.
	pub fn auth_token(mut self, token: impl Into<String>) -> Self {
		self.auth_token = Some(token.into());
		self
	}

	/// Sets the server base URL, e.g. `http://localhost:8080`.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn build(self) -> Result<SavedQueryClient> {
		let auth_token = self
			.auth_token
			.filter(|t| !t.is_empty())
			.ok_or_else(|| ClientError::Config("auth token is required".to_string()))?;
		let base_url = self
			.base_url
			.filter(|u| !u.is_empty())
			.ok_or_else(|| ClientError::Config("base URL is required".to_string()))?;

		let base_url = base_url.trim_end_matches('/').to_string();
		let endpoint = Url::parse(&base_url)
			.map_err(|e| ClientError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
		if endpoint.cannot_be_a_base() {
			return Err(ClientError::Config(format!(
				"base URL {base_url:?} cannot carry a path"
			)));
		}

		let http_client = Client::builder()
			.user_agent(format!("chartroom-client/{CLIENT_VERSION}"))
			.timeout(self.request_timeout)
			.build()?;

		info!(base_url = %base_url, "saved query client initialized");

		Ok(SavedQueryClient {
			inner: Arc::new(ClientInner {
				auth_token,
				base_url,
				endpoint,
				http_client,
			}),
		})
	}
}

impl Default for SavedQueryClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ClientInner {
	auth_token: String,
	base_url: String,
	endpoint: Url,
	http_client: Client,
}

/// Saved query client over HTTP.
///
/// # Example
///
/// ```ignore
/// let client = SavedQueryClient::builder()
///     .base_url("http://localhost:8080")
///     .auth_token(token)
///     .build()?;
///
/// let queries = client.list(&project_id, Some("chart")).await?;
/// ```
#[derive(Clone)]
pub struct SavedQueryClient {
	inner: Arc<ClientInner>,
}

impl SavedQueryClient {
	pub fn builder() -> SavedQueryClientBuilder {
		SavedQueryClientBuilder::new()
	}

	pub fn base_url(&self) -> &str {
		&self.inner.base_url
	}

	fn collection_url(&self, project_id: &str) -> Result<Url> {
		self.endpoint(&["project", project_id, "savedQuery"])
	}

	fn item_url(&self, project_id: &str, saved_query_id: &str) -> Result<Url> {
		self.endpoint(&["project", project_id, "savedQuery", saved_query_id])
	}

	/// Append percent-encoded segments to the base URL. Ids that would be
	/// dropped or collapsed as path segments are refused.
	fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		if let Some(bad) = segments
			.iter()
			.find(|s| s.is_empty() || **s == "." || **s == "..")
		{
			return Err(ClientError::InvalidId((*bad).to_string()));
		}

		let mut url = self.inner.endpoint.clone();
		url
			.path_segments_mut()
			.map_err(|_| ClientError::Config("base URL cannot carry a path".to_string()))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
		builder.bearer_auth(&self.inner.auth_token)
	}

	async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
		let response = self.authorized(builder).send().await?;
		let status = response.status();

		if status == StatusCode::UNAUTHORIZED {
			debug!("server rejected request as unauthorized");
			return Err(ClientError::Unauthorized);
		}

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			let err = status_error(status, &body);
			warn!(status = status.as_u16(), error = %err, "saved query request failed");
			return Err(err);
		}

		let bytes = response.bytes().await?;
		Ok(serde_json::from_slice(&bytes)?)
	}
}

/// Map a non-2xx, non-401 answer to [`ClientError::Status`], keeping the
/// server's `{error, message}` body when it has one.
fn status_error(status: StatusCode, body: &str) -> ClientError {
	match serde_json::from_str::<SavedQueryErrorResponse>(body) {
		Ok(parsed) => ClientError::Status {
			status: status.as_u16(),
			error: parsed.error,
			message: parsed.message,
		},
		Err(_) => ClientError::Status {
			status: status.as_u16(),
			error: String::new(),
			message: String::new(),
		},
	}
}

#[async_trait]
impl SavedQueryApi for SavedQueryClient {
	#[instrument(skip(self))]
	async fn list(
		&self,
		project_id: &str,
		query_type: Option<&str>,
	) -> Result<Vec<SavedQueryResponse>> {
		let mut builder = self.inner.http_client.get(self.collection_url(project_id)?);
		if let Some(query_type) = query_type.filter(|t| !t.is_empty()) {
			builder = builder.query(&[("type", query_type)]);
		}
		self.send(builder).await
	}

	#[instrument(skip(self, request))]
	async fn create(
		&self,
		project_id: &str,
		request: &CreateSavedQueryRequest,
	) -> Result<SavedQueryResponse> {
		let builder = self
			.inner
			.http_client
			.post(self.collection_url(project_id)?)
			.json(request);
		self.send(builder).await
	}

	#[instrument(skip(self, summary))]
	async fn update(
		&self,
		project_id: &str,
		saved_query_id: &str,
		summary: &str,
	) -> Result<SavedQueryResponse> {
		let body = UpdateSavedQueryRequest {
			summary: summary.to_string(),
		};
		let builder = self
			.inner
			.http_client
			.put(self.item_url(project_id, saved_query_id)?)
			.json(&body);
		self.send(builder).await
	}

	#[instrument(skip(self))]
	async fn remove(
		&self,
		project_id: &str,
		saved_query_id: &str,
	) -> Result<RemoveSavedQueryResponse> {
		let builder = self
			.inner
			.http_client
			.delete(self.item_url(project_id, saved_query_id)?);
		self.send(builder).await
	}
}
