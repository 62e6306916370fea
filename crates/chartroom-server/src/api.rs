// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and HTTP router.

use std::sync::Arc;

use axum::{
	routing::{get, put},
	Json, Router,
};
use chartroom_server_auth::{AccessControl, PolicyEngine};
use chartroom_server_config::ServerConfig;
use chartroom_server_db::{
	ProjectRepository, SavedQueryRepository, SessionRepository, TeamRepository, UserRepository,
};
use sqlx::SqlitePool;
use utoipa::OpenApi;

use crate::{error::ServerError, pipeline::SavedQueryPipeline, routes};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub pipeline: Arc<SavedQueryPipeline>,
	pub user_repo: Arc<UserRepository>,
	pub team_repo: Arc<TeamRepository>,
	pub project_repo: Arc<ProjectRepository>,
	pub session_repo: Arc<SessionRepository>,
	pub saved_query_repo: Arc<SavedQueryRepository>,
}

/// Load the access-control table: the configured policy file, or the built-in
/// grants when none is set.
pub fn load_policy(config: &ServerConfig) -> Result<AccessControl, ServerError> {
	match &config.rbac.policy_file {
		Some(path) => {
			let policy = AccessControl::from_toml_file(path)?;
			tracing::info!(path = %path.display(), grants = policy.len(), "loaded access-control policy");
			Ok(policy)
		}
		None => {
			tracing::debug!("using built-in access-control grants");
			Ok(AccessControl::with_default_grants())
		}
	}
}

/// Build application state over a migrated pool.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, ServerError> {
	let user_repo = Arc::new(UserRepository::new(pool.clone()));
	let team_repo = Arc::new(TeamRepository::new(pool.clone()));
	let project_repo = Arc::new(ProjectRepository::new(pool.clone()));
	let session_repo = Arc::new(SessionRepository::new(pool.clone()));
	let saved_query_repo = Arc::new(SavedQueryRepository::new(pool.clone()));

	let policy: Arc<dyn PolicyEngine> = Arc::new(load_policy(config)?);
	let pipeline = Arc::new(SavedQueryPipeline::new(
		project_repo.clone(),
		team_repo.clone(),
		policy,
		saved_query_repo.clone(),
	));

	Ok(AppState {
		pool,
		pipeline,
		user_repo,
		team_repo,
		project_repo,
		session_repo,
		saved_query_repo,
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/openapi.json",
			get(|| async { Json(crate::api_docs::ApiDoc::openapi()) }),
		)
		.route(
			"/project/{project_id}/savedQuery",
			get(routes::saved_queries::list_saved_queries)
				.post(routes::saved_queries::create_saved_query),
		)
		.route(
			"/project/{project_id}/savedQuery/{id}",
			put(routes::saved_queries::update_saved_query)
				.delete(routes::saved_queries::remove_saved_query),
		)
		.with_state(state)
}

#[cfg(test)]
mod tests {
	use super::*;

	use axum::{
		body::Body,
		http::{Request, StatusCode},
	};
	use chartroom_server_auth::ProjectId;
	use chartroom_server_config::RbacConfig;
	use tempfile::tempdir;
	use tower::ServiceExt;

	async fn create_test_app() -> (Router, tempfile::TempDir) {
		let dir = tempdir().unwrap();
		let db_path = dir.path().join("test.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = chartroom_server_db::create_pool(&db_url).await.unwrap();
		chartroom_server_db::run_migrations(&pool).await.unwrap();

		let state = create_app_state(pool, &ServerConfig::default()).unwrap();
		(create_router(state), dir)
	}

	#[tokio::test]
	async fn health_is_public() {
		let (app, _dir) = create_test_app().await;
		let response = app
			.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn openapi_json_is_served() {
		let (app, _dir) = create_test_app().await;
		let response = app
			.oneshot(
				Request::builder()
					.uri("/api/openapi.json")
					.body(Body::empty())
					.unwrap(),
			)
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[tokio::test]
	async fn saved_queries_require_a_token() {
		let (app, _dir) = create_test_app().await;
		let uri = format!("/project/{}/savedQuery", ProjectId::generate());
		let response = app
			.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[test]
	fn missing_policy_file_is_an_error() {
		let config = ServerConfig {
			rbac: RbacConfig {
				policy_file: Some("/nonexistent/chartroom/policy.toml".into()),
			},
			..Default::default()
		};
		assert!(matches!(load_policy(&config), Err(ServerError::Policy(_))));
	}

	#[test]
	fn policy_file_replaces_default_grants() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("policy.toml");
		std::fs::write(
			&path,
			r#"
[[grants]]
role = "viewer"
resource = "saved_query"
action = "read"
possession = "any"
"#,
		)
		.unwrap();

		let config = ServerConfig {
			rbac: RbacConfig {
				policy_file: Some(path),
			},
			..Default::default()
		};
		let policy = load_policy(&config).unwrap();
		assert_eq!(policy.len(), 1);
	}
}
