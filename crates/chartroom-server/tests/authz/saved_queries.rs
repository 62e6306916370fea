// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use chartroom_server_api::{RemoveSavedQueryResponse, SavedQueryErrorResponse, SavedQueryResponse};
use chartroom_server_auth::{ProjectId, SavedQueryId, TeamRole};
use serde_json::json;

use super::support::{read_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_saved_query_read_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase {
			name: "unauthenticated_cannot_list",
			method: Method::GET,
			path: f.list_path(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "viewer_can_list",
			method: Method::GET,
			path: f.list_path(),
			user: Some(f.viewer.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "editor_can_list",
			method: Method::GET,
			path: f.list_path(),
			user: Some(f.editor.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "owner_can_list",
			method: Method::GET,
			path: f.list_path(),
			user: Some(f.owner.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_without_role_gets_generic_error",
			method: Method::GET,
			path: f.list_path(),
			user: Some(f.outsider.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "unknown_project_is_generic_error",
			method: Method::GET,
			path: format!("/project/{}/savedQuery", ProjectId::generate()),
			user: Some(f.owner.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "malformed_project_id_is_bad_request",
			method: Method::GET,
			path: "/project/not-a-uuid/savedQuery".to_string(),
			user: Some(f.owner.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_saved_query_write_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase {
			name: "unauthenticated_cannot_create",
			method: Method::POST,
			path: f.list_path(),
			user: None,
			body: Some(json!({"summary": "x"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "viewer_cannot_create",
			method: Method::POST,
			path: f.list_path(),
			user: Some(f.viewer.clone()),
			body: Some(json!({"summary": "x"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "editor_can_create",
			method: Method::POST,
			path: f.list_path(),
			user: Some(f.editor.clone()),
			body: Some(json!({"summary": "editor query"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "viewer_cannot_update",
			method: Method::PUT,
			path: f.item_path(&f.chart_query),
			user: Some(f.viewer.clone()),
			body: Some(json!({"summary": "renamed"})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "admin_can_update",
			method: Method::PUT,
			path: f.item_path(&f.chart_query),
			user: Some(f.admin.clone()),
			body: Some(json!({"summary": "renamed"})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "outsider_cannot_update",
			method: Method::PUT,
			path: f.item_path(&f.chart_query),
			user: Some(f.outsider.clone()),
			body: Some(json!({"summary": "hijacked"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "viewer_cannot_remove",
			method: Method::DELETE,
			path: f.item_path(&f.table_query),
			user: Some(f.viewer.clone()),
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "editor_can_remove_via_update_grant",
			method: Method::DELETE,
			path: f.item_path(&f.table_query),
			user: Some(f.editor.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_denial_body_is_not_authorized() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(&f.list_path(), Some(&f.viewer), json!({"summary": "x"}))
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let body: SavedQueryErrorResponse = read_json(response).await;
	assert_eq!(body.error, "unauthorized");
	assert_eq!(body.message, "Not authorized");

	let stored = app
		.state
		.saved_query_repo
		.find_by_project(&f.project.id, None)
		.await
		.unwrap();
	assert_eq!(stored.len(), 2, "viewer create must not reach the store");
}

#[tokio::test]
async fn test_create_ignores_caller_supplied_identity() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			&f.list_path(),
			Some(&f.admin),
			json!({
				"summary": "x",
				"userId": "attacker",
				"user_id": f.outsider.user.id.to_string(),
				"project_id": f.other_project.id.to_string(),
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let created: SavedQueryResponse = read_json(response).await;
	assert_eq!(created.user_id, f.admin.user.id.to_string());
	assert_eq!(created.project_id, f.project.id.to_string());
	assert_eq!(created.summary, "x");
	assert_eq!(created.query_type, "");
}

#[tokio::test]
async fn test_create_then_list_shows_creator_newest_first() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			&f.list_path(),
			Some(&f.editor),
			json!({"summary": "  Churn by cohort  ", "type": "chart", "query": "SELECT churn"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let created: SavedQueryResponse = read_json(response).await;
	assert_eq!(created.summary, "Churn by cohort");

	let response = app.get(&f.list_path(), Some(&f.viewer)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let listed: Vec<SavedQueryResponse> = read_json(response).await;

	assert_eq!(listed.len(), 3);
	assert_eq!(listed[0].id, created.id);
	let creator = listed[0].creator.as_ref().expect("creator joined");
	assert_eq!(creator.display_name(), "Eddie Tester");
	assert!(listed
		.iter()
		.all(|q| q.project_id == f.project.id.to_string()));
}

#[tokio::test]
async fn test_list_type_filter() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.get(&format!("{}?type=chart", f.list_path()), Some(&f.viewer))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let charts: Vec<SavedQueryResponse> = read_json(response).await;
	assert_eq!(charts.len(), 1);
	assert_eq!(charts[0].id, f.chart_query.id.to_string());

	let response = app
		.get(&format!("{}?type=", f.list_path()), Some(&f.viewer))
		.await;
	let all: Vec<SavedQueryResponse> = read_json(response).await;
	assert_eq!(all.len(), 2, "empty type means no filter");

	let response = app
		.get(&format!("{}?type=pivot", f.list_path()), Some(&f.viewer))
		.await;
	let none: Vec<SavedQueryResponse> = read_json(response).await;
	assert!(none.is_empty());
}

#[tokio::test]
async fn test_padded_type_filter_matches_trimmed_type() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			&f.list_path(),
			Some(&f.editor),
			json!({"summary": "Padded", "type": " pivot "}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let created: SavedQueryResponse = read_json(response).await;
	assert_eq!(created.query_type, "pivot");

	let response = app
		.get(&format!("{}?type=%20pivot%20", f.list_path()), Some(&f.viewer))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let pivots: Vec<SavedQueryResponse> = read_json(response).await;
	assert_eq!(pivots.len(), 1);
	assert_eq!(pivots[0].id, created.id);

	let response = app
		.get(&format!("{}?type=%20%20%20", f.list_path()), Some(&f.viewer))
		.await;
	let all: Vec<SavedQueryResponse> = read_json(response).await;
	assert_eq!(all.len(), 3, "blank type means no filter");
}

#[tokio::test]
async fn test_update_replaces_summary_only() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.put(
			&f.item_path(&f.chart_query),
			Some(&f.editor),
			json!({"summary": "Weekly revenue (EUR)", "type": "table", "query": "DROP TABLE"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let updated: SavedQueryResponse = read_json(response).await;
	assert_eq!(updated.summary, "Weekly revenue (EUR)");
	assert_eq!(updated.query_type, "chart");
	assert_eq!(updated.query, "SELECT 1");
	assert_eq!(updated.user_id, f.owner.user.id.to_string());
}

#[tokio::test]
async fn test_update_blank_summary_is_invalid_input() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.put(&f.item_path(&f.chart_query), Some(&f.editor), json!({"summary": "   "}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body: SavedQueryErrorResponse = read_json(response).await;
	assert_eq!(body.error, "invalid_input");
}

#[tokio::test]
async fn test_cross_project_update_is_rejected() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	// The owner holds update in `project`, but the record lives in `other_project`.
	let path = f.item_path(&f.foreign_query);
	let response = app
		.put(&path, Some(&f.owner), json!({"summary": "hijacked"}))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let foreign = app
		.state
		.saved_query_repo
		.get(&f.other_project.id, &f.foreign_query.id)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(foreign.summary, "Budget");
}

#[tokio::test]
async fn test_remove_twice_is_generic_error() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = f.item_path(&f.chart_query);

	let response = app.delete(&path, Some(&f.owner)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let removed: RemoveSavedQueryResponse = read_json(response).await;
	assert_eq!(removed.id, f.chart_query.id.to_string());
	assert!(removed.deleted);

	let response = app.delete(&path, Some(&f.owner)).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_unknown_id_is_generic_error() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let path = format!("{}/{}", f.list_path(), SavedQueryId::generate());
	let response = app.delete(&path, Some(&f.owner)).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let path = format!("{}/not-a-uuid", f.list_path());
	let response = app.delete(&path, Some(&f.owner)).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_authorizes_first() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.send_raw(Method::POST, &f.list_path(), Some(&f.viewer), "{not json")
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let response = app
		.send_raw(Method::POST, &f.list_path(), Some(&f.editor), "{not json")
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body: SavedQueryErrorResponse = read_json(response).await;
	assert_eq!(body.error, "invalid_input");
}

#[tokio::test]
async fn test_role_change_takes_effect_immediately() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let promoted = app.create_user("promoted@test.com", Some(TeamRole::Viewer)).await;
	let response = app
		.post(&f.list_path(), Some(&promoted), json!({"summary": "x"}))
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	app
		.state
		.team_repo
		.add_member(&f.team.id, &promoted.user.id, TeamRole::Editor)
		.await
		.unwrap();

	let response = app
		.post(&f.list_path(), Some(&promoted), json!({"summary": "x"}))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}
