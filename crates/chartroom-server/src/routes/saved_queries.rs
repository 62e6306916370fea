// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Saved query HTTP handlers.
//!
//! Every handler authenticates first, then hands the raw request to the
//! [`SavedQueryPipeline`](crate::pipeline::SavedQueryPipeline). Project and
//! user ids in request bodies are ignored; both come from the path and the
//! session.

use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use chartroom_server_auth::{ProjectId, UserId};

pub use chartroom_server_api::saved_queries::*;

use crate::{
	api::AppState,
	auth_middleware::RequireAuth,
	error::ServerError,
	parse_id,
	pipeline::{CreateSavedQuery, PipelineError, SavedQueryAction, UpdateSavedQuery},
	validation::parse_project_id,
};

/// Reject a malformed body without revealing more than the caller may know.
///
/// Authorization still runs first, so a caller without the grant sees 401
/// regardless of what they sent.
async fn reject_body(
	state: &AppState,
	project_id: &ProjectId,
	actor: &UserId,
	action: SavedQueryAction,
	rejection: JsonRejection,
) -> Response {
	if let Err(e) = state.pipeline.authorize(project_id, actor, action).await {
		return ServerError::from(e).into_response();
	}
	tracing::debug!(error = %rejection, "malformed saved query body");
	ServerError::from(PipelineError::InvalidInput(rejection.body_text())).into_response()
}

#[utoipa::path(
    get,
    path = "/project/{project_id}/savedQuery",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ListSavedQueriesQuery
    ),
    responses(
        (status = 200, description = "Saved queries, newest first", body = Vec<SavedQueryResponse>),
        (status = 400, description = "Project not found or request failed", body = SavedQueryErrorResponse),
        (status = 401, description = "Not authorized", body = SavedQueryErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "saved-queries"
)]
/// List a project's saved queries.
///
/// # Authorization
/// Requires `read` on saved queries for the caller's role in the project's team.
#[tracing::instrument(skip(state, current_user, params), fields(%project_id))]
pub async fn list_saved_queries(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
	Query(params): Query<ListSavedQueriesQuery>,
) -> Response {
	let project_id = parse_id!(SavedQueryErrorResponse, parse_project_id(&project_id));
	let actor = current_user.actor_user_id();

	match state
		.pipeline
		.list(&project_id, &actor, params.query_type.as_deref())
		.await
	{
		Ok(queries) => {
			let body: Vec<SavedQueryResponse> = queries.into_iter().map(Into::into).collect();
			(StatusCode::OK, Json(body)).into_response()
		}
		Err(e) => ServerError::from(e).into_response(),
	}
}

#[utoipa::path(
    post,
    path = "/project/{project_id}/savedQuery",
    params(
        ("project_id" = String, Path, description = "Project ID")
    ),
    request_body = CreateSavedQueryRequest,
    responses(
        (status = 200, description = "Saved query created", body = SavedQueryResponse),
        (status = 400, description = "Invalid request or project not found", body = SavedQueryErrorResponse),
        (status = 401, description = "Not authorized", body = SavedQueryErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "saved-queries"
)]
/// Create a saved query owned by the caller.
///
/// # Authorization
/// Requires `create` on saved queries.
#[tracing::instrument(skip(state, current_user, payload), fields(%project_id))]
pub async fn create_saved_query(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(project_id): Path<String>,
	payload: Result<Json<CreateSavedQueryRequest>, JsonRejection>,
) -> Response {
	let project_id = parse_id!(SavedQueryErrorResponse, parse_project_id(&project_id));
	let actor = current_user.actor_user_id();

	let Json(payload) = match payload {
		Ok(payload) => payload,
		Err(rejection) => {
			return reject_body(&state, &project_id, &actor, SavedQueryAction::Create, rejection).await;
		}
	};

	let request = CreateSavedQuery {
		summary: payload.summary,
		query_type: payload.query_type,
		query: payload.query,
	};

	match state.pipeline.create(&project_id, &actor, request).await {
		Ok(saved) => {
			tracing::info!(saved_query_id = %saved.id, %project_id, "saved query created");
			(StatusCode::OK, Json(SavedQueryResponse::from(saved))).into_response()
		}
		Err(e) => ServerError::from(e).into_response(),
	}
}

#[utoipa::path(
    put,
    path = "/project/{project_id}/savedQuery/{id}",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("id" = String, Path, description = "Saved query ID")
    ),
    request_body = UpdateSavedQueryRequest,
    responses(
        (status = 200, description = "Saved query updated", body = SavedQueryResponse),
        (status = 400, description = "Invalid request or saved query not found", body = SavedQueryErrorResponse),
        (status = 401, description = "Not authorized", body = SavedQueryErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "saved-queries"
)]
/// Replace a saved query's summary.
///
/// # Authorization
/// Requires `update` on saved queries.
#[tracing::instrument(skip(state, current_user, payload), fields(%project_id, saved_query_id = %id))]
pub async fn update_saved_query(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((project_id, id)): Path<(String, String)>,
	payload: Result<Json<UpdateSavedQueryRequest>, JsonRejection>,
) -> Response {
	let project_id = parse_id!(SavedQueryErrorResponse, parse_project_id(&project_id));
	let actor = current_user.actor_user_id();

	let Json(payload) = match payload {
		Ok(payload) => payload,
		Err(rejection) => {
			return reject_body(&state, &project_id, &actor, SavedQueryAction::Update, rejection).await;
		}
	};

	let request = UpdateSavedQuery {
		saved_query_id: id,
		summary: payload.summary,
	};

	match state.pipeline.update(&project_id, &actor, request).await {
		Ok(saved) => (StatusCode::OK, Json(SavedQueryResponse::from(saved))).into_response(),
		Err(e) => ServerError::from(e).into_response(),
	}
}

#[utoipa::path(
    delete,
    path = "/project/{project_id}/savedQuery/{id}",
    params(
        ("project_id" = String, Path, description = "Project ID"),
        ("id" = String, Path, description = "Saved query ID")
    ),
    responses(
        (status = 200, description = "Saved query removed", body = RemoveSavedQueryResponse),
        (status = 400, description = "Invalid request or saved query not found", body = SavedQueryErrorResponse),
        (status = 401, description = "Not authorized", body = SavedQueryErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "saved-queries"
)]
/// Remove a saved query.
///
/// # Authorization
/// Gated by the `update` grant; there is no separate delete check.
#[tracing::instrument(skip(state, current_user), fields(%project_id, saved_query_id = %id))]
pub async fn remove_saved_query(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((project_id, id)): Path<(String, String)>,
) -> Response {
	let project_id = parse_id!(SavedQueryErrorResponse, parse_project_id(&project_id));
	let actor = current_user.actor_user_id();

	match state.pipeline.remove(&project_id, &actor, &id).await {
		Ok(removed) => {
			tracing::info!(saved_query_id = %removed, %project_id, "saved query removed");
			(
				StatusCode::OK,
				Json(RemoveSavedQueryResponse {
					id: removed.to_string(),
					deleted: true,
				}),
			)
				.into_response()
		}
		Err(e) => ServerError::from(e).into_response(),
	}
}
