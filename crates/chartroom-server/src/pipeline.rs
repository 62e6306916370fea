// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authorization pipeline for saved queries.
//!
//! Every operation runs the same stages in order:
//!
//! ```text
//! resolve project → resolve team role → evaluate policy → validate → store
//! ```
//!
//! A stage that fails stops the pipeline, so a caller without a role, or
//! whose role is denied, never reaches the store. Each failure is tagged with
//! its [`ErrorKind`] where it happens.

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;
use chartroom_server_auth::{
	Action, PolicyEngine, Possession, Project, ProjectId, ResourceType, SavedQueryId, TeamId,
	TeamRole, UserId,
};
use chartroom_server_db::{
	DbError, NewSavedQuery, ProjectStore, SavedQuery, SavedQueryStore, TeamStore,
};

use crate::validation::{parse_saved_query_id, validate_query_type, validate_summary};

/// Operations the pipeline exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedQueryAction {
	List,
	Create,
	Update,
	Remove,
}

impl SavedQueryAction {
	/// The policy action that must be granted ("any" possession) to run this
	/// operation. Removal is gated by the update grant.
	pub fn required_action(self) -> Action {
		match self {
			SavedQueryAction::List => Action::Read,
			SavedQueryAction::Create => Action::Create,
			SavedQueryAction::Update => Action::Update,
			SavedQueryAction::Remove => Action::Update,
		}
	}
}

impl fmt::Display for SavedQueryAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SavedQueryAction::List => write!(f, "list"),
			SavedQueryAction::Create => write!(f, "create"),
			SavedQueryAction::Update => write!(f, "update"),
			SavedQueryAction::Remove => write!(f, "remove"),
		}
	}
}

/// Response class of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	NotFound,
	Unauthorized,
	StoreFailure,
	InvalidInput,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
	#[error("project {0} not found")]
	ProjectNotFound(ProjectId),

	#[error("user {user_id} has no role in team {team_id}")]
	NoTeamRole { team_id: TeamId, user_id: UserId },

	#[error("role {role} may not {action} saved queries")]
	Denied { role: TeamRole, action: SavedQueryAction },

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("store failure: {0}")]
	Store(#[source] DbError),
}

impl PipelineError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			PipelineError::ProjectNotFound(_) | PipelineError::NoTeamRole { .. } => ErrorKind::NotFound,
			PipelineError::Denied { .. } => ErrorKind::Unauthorized,
			PipelineError::InvalidInput(_) => ErrorKind::InvalidInput,
			PipelineError::Store(_) => ErrorKind::StoreFailure,
		}
	}

	/// Authorization denials are 401; everything else collapses to 400.
	pub fn status(&self) -> StatusCode {
		match self.kind() {
			ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
			ErrorKind::NotFound | ErrorKind::StoreFailure | ErrorKind::InvalidInput => {
				StatusCode::BAD_REQUEST
			}
		}
	}
}

/// Outcome of the authorization stages.
#[derive(Debug, Clone)]
pub struct AuthorizedScope {
	pub project: Project,
	pub actor: UserId,
	pub role: TeamRole,
}

/// Unvalidated create payload.
#[derive(Debug, Clone, Default)]
pub struct CreateSavedQuery {
	pub summary: String,
	pub query_type: Option<String>,
	pub query: Option<String>,
}

/// Unvalidated update payload.
#[derive(Debug, Clone, Default)]
pub struct UpdateSavedQuery {
	pub saved_query_id: String,
	pub summary: String,
}

pub struct SavedQueryPipeline {
	projects: Arc<dyn ProjectStore>,
	teams: Arc<dyn TeamStore>,
	policy: Arc<dyn PolicyEngine>,
	saved_queries: Arc<dyn SavedQueryStore>,
}

impl SavedQueryPipeline {
	pub fn new(
		projects: Arc<dyn ProjectStore>,
		teams: Arc<dyn TeamStore>,
		policy: Arc<dyn PolicyEngine>,
		saved_queries: Arc<dyn SavedQueryStore>,
	) -> Self {
		Self {
			projects,
			teams,
			policy,
			saved_queries,
		}
	}

	/// Run the project, role and policy stages for `action`.
	#[tracing::instrument(skip(self), fields(%project_id, %actor, %action))]
	pub async fn authorize(
		&self,
		project_id: &ProjectId,
		actor: &UserId,
		action: SavedQueryAction,
	) -> Result<AuthorizedScope, PipelineError> {
		let project = self
			.projects
			.get_project_by_id(project_id)
			.await
			.map_err(|e| {
				tracing::error!(error = %e, %project_id, "failed to resolve project");
				PipelineError::Store(e)
			})?
			.ok_or(PipelineError::ProjectNotFound(*project_id))?;

		let role = self
			.teams
			.get_team_role(&project.team_id, actor)
			.await
			.map_err(|e| {
				tracing::error!(error = %e, team_id = %project.team_id, "failed to resolve team role");
				PipelineError::Store(e)
			})?
			.ok_or(PipelineError::NoTeamRole {
				team_id: project.team_id,
				user_id: *actor,
			})?;

		let permission = self.policy.evaluate(
			role,
			action.required_action(),
			ResourceType::SavedQuery,
			Possession::Any,
		);
		if !permission.granted {
			tracing::info!(%role, required = %permission.action, "saved query access denied");
			return Err(PipelineError::Denied { role, action });
		}

		tracing::debug!(%role, "saved query access granted");
		Ok(AuthorizedScope {
			project,
			actor: *actor,
			role,
		})
	}

	/// List a project's saved queries, newest first. The filter is trimmed the
	/// way stored types are; a blank filter lists all.
	#[tracing::instrument(skip(self), fields(%project_id, %actor))]
	pub async fn list(
		&self,
		project_id: &ProjectId,
		actor: &UserId,
		type_filter: Option<&str>,
	) -> Result<Vec<SavedQuery>, PipelineError> {
		let scope = self
			.authorize(project_id, actor, SavedQueryAction::List)
			.await?;

		self
			.saved_queries
			.find_by_project(
				&scope.project.id,
				type_filter.map(str::trim).filter(|t| !t.is_empty()),
			)
			.await
			.map_err(store_failure)
	}

	/// Create a saved query owned by `actor` in `project_id`.
	#[tracing::instrument(skip(self, payload), fields(%project_id, %actor))]
	pub async fn create(
		&self,
		project_id: &ProjectId,
		actor: &UserId,
		payload: CreateSavedQuery,
	) -> Result<SavedQuery, PipelineError> {
		let scope = self
			.authorize(project_id, actor, SavedQueryAction::Create)
			.await?;

		let summary = validate_summary(&payload.summary).map_err(PipelineError::InvalidInput)?;
		let query_type =
			validate_query_type(payload.query_type.as_deref()).map_err(PipelineError::InvalidInput)?;

		let new = NewSavedQuery {
			project_id: scope.project.id,
			user_id: scope.actor,
			query: payload.query.unwrap_or_default(),
			summary,
			query_type,
		};

		self.saved_queries.create(&new).await.map_err(store_failure)
	}

	/// Replace the summary of a saved query in `project_id`.
	#[tracing::instrument(skip(self, payload), fields(%project_id, %actor))]
	pub async fn update(
		&self,
		project_id: &ProjectId,
		actor: &UserId,
		payload: UpdateSavedQuery,
	) -> Result<SavedQuery, PipelineError> {
		let scope = self
			.authorize(project_id, actor, SavedQueryAction::Update)
			.await?;

		let id = parse_saved_query_id(&payload.saved_query_id)
			.map_err(|e| PipelineError::InvalidInput(e.message))?;
		let summary = validate_summary(&payload.summary).map_err(PipelineError::InvalidInput)?;

		self
			.saved_queries
			.update_summary(&scope.project.id, &id, &summary)
			.await
			.map_err(store_failure)
	}

	/// Delete a saved query in `project_id`, returning its id.
	#[tracing::instrument(skip(self), fields(%project_id, %actor))]
	pub async fn remove(
		&self,
		project_id: &ProjectId,
		actor: &UserId,
		saved_query_id: &str,
	) -> Result<SavedQueryId, PipelineError> {
		let scope = self
			.authorize(project_id, actor, SavedQueryAction::Remove)
			.await?;

		let id =
			parse_saved_query_id(saved_query_id).map_err(|e| PipelineError::InvalidInput(e.message))?;

		self
			.saved_queries
			.delete(&scope.project.id, &id)
			.await
			.map_err(store_failure)?;
		Ok(id)
	}
}

fn store_failure(e: DbError) -> PipelineError {
	if e.is_not_found() {
		tracing::debug!(error = %e, "saved query not found");
	} else {
		tracing::error!(error = %e, "saved query store failure");
	}
	PipelineError::Store(e)
}
