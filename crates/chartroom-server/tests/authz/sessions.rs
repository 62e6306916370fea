// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use chartroom_server_api::{HealthResponse, SavedQueryErrorResponse};

use super::support::{create_test_user, read_json, TestApp};

#[tokio::test]
async fn test_expired_session_is_rejected() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let expired = create_test_user(
		&app.state,
		"expired@test.com",
		"Ex",
		chrono::Duration::hours(-1),
	)
	.await;
	app
		.state
		.team_repo
		.add_member(&f.team.id, &expired.user.id, chartroom_server_auth::TeamRole::Owner)
		.await
		.unwrap();

	let response = app.get(&f.list_path(), Some(&expired)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	let body: SavedQueryErrorResponse = read_json(response).await;
	assert_eq!(body.message, "Not authorized");
}

#[tokio::test]
async fn test_unknown_or_malformed_tokens_are_rejected() {
	let app = TestApp::new().await;
	let path = app.fixtures.list_path();

	for value in [
		"Bearer not-a-real-token",
		"Bearer ",
		"Basic dXNlcjpwYXNz",
		"bearer lowercase-scheme",
	] {
		let response = app.get_with_authorization(&path, value).await;
		assert_eq!(
			response.status(),
			StatusCode::UNAUTHORIZED,
			"authorization header {value:?}"
		);
	}
}

#[tokio::test]
async fn test_health_needs_no_session() {
	let app = TestApp::new().await;

	let response = app.get("/health", None).await;
	assert_eq!(response.status(), StatusCode::OK);
	let health: HealthResponse = read_json(response).await;
	assert!(health.is_healthy());
	assert!(health.database.error.is_none());
}

#[tokio::test]
async fn test_openapi_document_lists_saved_query_paths() {
	let app = TestApp::new().await;

	let response = app.get("/api/openapi.json", None).await;
	assert_eq!(response.status(), StatusCode::OK);
	let doc: serde_json::Value = read_json(response).await;
	let paths = doc["paths"].as_object().unwrap();
	assert!(paths.contains_key("/project/{project_id}/savedQuery"));
	assert!(paths.contains_key("/project/{project_id}/savedQuery/{id}"));
}
