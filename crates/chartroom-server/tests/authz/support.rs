// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chartroom_server_auth::{
	session::{generate_session_token, hash_token, Session},
	Project, Team, TeamRole, User,
};
use chartroom_server_db::{NewSavedQuery, SavedQuery};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::TempDir;
use tower::ServiceExt;

use chartroom_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub session_token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("authorization"),
			HeaderValue::from_str(&format!("Bearer {}", self.session_token)).unwrap(),
		)
	}
}

#[derive(Clone)]
pub struct Fixtures {
	pub team: Team,
	pub owner: TestUser,
	pub admin: TestUser,
	pub editor: TestUser,
	pub viewer: TestUser,
	/// Owner of another team; no role in `team`.
	pub outsider: TestUser,
	pub project: Project,
	pub other_project: Project,
	/// Seeded in `project`, type "chart".
	pub chart_query: SavedQuery,
	/// Seeded in `project`, type "table".
	pub table_query: SavedQuery,
	/// Seeded in `other_project`.
	pub foreign_query: SavedQuery,
}

impl Fixtures {
	pub fn list_path(&self) -> String {
		format!("/project/{}/savedQuery", self.project.id)
	}

	pub fn item_path(&self, query: &SavedQuery) -> String {
		format!("/project/{}/savedQuery/{}", self.project.id, query.id)
	}
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = chartroom_server_db::create_pool(&db_url).await.unwrap();
		chartroom_server_db::run_migrations(&pool).await.unwrap();

		let config = ServerConfig::default();
		let state = create_app_state(pool, &config).unwrap();

		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	/// Create a user with a session, optionally as a member of the fixture team.
	pub async fn create_user(&self, email: &str, role: Option<TeamRole>) -> TestUser {
		match role {
			Some(role) => create_member(&self.state, &self.fixtures.team, email, email, role).await,
			None => create_test_user(&self.state, email, email, chrono::Duration::hours(1)).await,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn put(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PUT, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// Send a raw JSON-typed body, for malformed payload cases.
	pub async fn send_raw(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: &'static str,
	) -> Response<Body> {
		let mut builder = Request::builder()
			.method(method)
			.uri(path)
			.header("content-type", "application/json");

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request = builder.body(Body::from(body)).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Send a request with an arbitrary Authorization header value.
	pub async fn get_with_authorization(&self, path: &str, value: &str) -> Response<Body> {
		let request = Request::builder()
			.method(Method::GET)
			.uri(path)
			.header("authorization", value)
			.body(Body::empty())
			.unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PUT => {
				app.put(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let team = Team::new("Analytics");
	state.team_repo.create_team(&team).await.unwrap();

	let owner = create_member(state, &team, "owner@test.com", "Olive", TeamRole::Owner).await;
	let admin = create_member(state, &team, "admin@test.com", "Ada", TeamRole::Admin).await;
	let editor = create_member(state, &team, "editor@test.com", "Eddie", TeamRole::Editor).await;
	let viewer = create_member(state, &team, "viewer@test.com", "Vera", TeamRole::Viewer).await;

	let other_team = Team::new("Finance");
	state.team_repo.create_team(&other_team).await.unwrap();
	let outsider =
		create_test_user(state, "outsider@test.com", "Otto", chrono::Duration::hours(1)).await;
	state
		.team_repo
		.add_member(&other_team.id, &outsider.user.id, TeamRole::Owner)
		.await
		.unwrap();

	let project = Project::new(team.id, "Revenue");
	state.project_repo.create_project(&project).await.unwrap();
	let other_project = Project::new(other_team.id, "Budget");
	state
		.project_repo
		.create_project(&other_project)
		.await
		.unwrap();

	let chart_query = seed_query(state, &project, &owner, "Weekly revenue", "chart").await;
	let table_query = seed_query(state, &project, &editor, "Top customers", "table").await;
	let foreign_query = seed_query(state, &other_project, &outsider, "Budget", "chart").await;

	Fixtures {
		team,
		owner,
		admin,
		editor,
		viewer,
		outsider,
		project,
		other_project,
		chart_query,
		table_query,
		foreign_query,
	}
}

async fn create_member(
	state: &AppState,
	team: &Team,
	email: &str,
	name: &str,
	role: TeamRole,
) -> TestUser {
	let user = create_test_user(state, email, name, chrono::Duration::hours(1)).await;
	state
		.team_repo
		.add_member(&team.id, &user.user.id, role)
		.await
		.unwrap();
	user
}

/// Create a user and a session for them. A negative `ttl` yields an already
/// expired session.
pub async fn create_test_user(
	state: &AppState,
	email: &str,
	name: &str,
	ttl: chrono::Duration,
) -> TestUser {
	let user = User::new(name, email).with_surname("Tester");
	state.user_repo.create_user(&user).await.unwrap();

	let session_token = generate_session_token();
	let session = Session::new(user.id, ttl);
	state
		.session_repo
		.create_session(&session, &hash_token(&session_token))
		.await
		.unwrap();

	TestUser {
		user,
		session_token,
	}
}

async fn seed_query(
	state: &AppState,
	project: &Project,
	creator: &TestUser,
	summary: &str,
	query_type: &str,
) -> SavedQuery {
	state
		.saved_query_repo
		.create(&NewSavedQuery {
			project_id: project.id,
			user_id: creator.user.id,
			query: "SELECT 1".to_string(),
			summary: summary.to_string(),
			query_type: query_type.to_string(),
		})
		.await
		.unwrap()
}
