// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Saved query selector state.
//!
//! Holds the list of a project's saved queries and drives the three user
//! actions on it:
//!
//! - **select**: pure callback, no server call
//! - **edit**: stage a target with a draft summary, confirm, submit `update`
//! - **remove**: stage a target, confirm, submit `remove`
//!
//! Each mutating action is its own state machine:
//!
//! ```text
//! Idle ──request──▶ Confirming(t) ──confirm──▶ Submitting(t) ──▶ Done | Failed(msg)
//!   ▲                   │                                            │
//!   └──────cancel───────┘◀─────────────────acknowledge──────────────┘
//! ```
//!
//! Submitting clears on success and on failure alike; neither Done nor Failed
//! keeps the target.

use std::sync::Arc;

use chartroom_server_api::SavedQueryResponse;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::SavedQueryApi;

/// State of one mutating action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState<T> {
	#[default]
	Idle,
	Confirming(T),
	Submitting(T),
	Done,
	Failed(String),
}

impl<T: Clone> ActionState<T> {
	pub fn is_idle(&self) -> bool {
		matches!(self, ActionState::Idle)
	}

	pub fn is_submitting(&self) -> bool {
		matches!(self, ActionState::Submitting(_))
	}

	/// The staged target while confirming or submitting.
	pub fn pending(&self) -> Option<&T> {
		match self {
			ActionState::Confirming(t) | ActionState::Submitting(t) => Some(t),
			_ => None,
		}
	}

	fn name(&self) -> &'static str {
		match self {
			ActionState::Idle => "idle",
			ActionState::Confirming(_) => "confirming",
			ActionState::Submitting(_) => "submitting",
			ActionState::Done => "done",
			ActionState::Failed(_) => "failed",
		}
	}

	fn begin(&mut self, target: T) -> Result<(), SelectorError> {
		match self {
			ActionState::Idle => {
				*self = ActionState::Confirming(target);
				Ok(())
			}
			other => Err(SelectorError::InvalidTransition {
				from: other.name(),
				to: "confirming",
			}),
		}
	}

	fn cancel(&mut self) -> Result<(), SelectorError> {
		match self {
			ActionState::Confirming(_) => {
				*self = ActionState::Idle;
				Ok(())
			}
			other => Err(SelectorError::InvalidTransition {
				from: other.name(),
				to: "idle",
			}),
		}
	}

	fn submit(&mut self) -> Result<T, SelectorError> {
		match self {
			ActionState::Confirming(target) => {
				let target = target.clone();
				*self = ActionState::Submitting(target.clone());
				Ok(target)
			}
			other => Err(SelectorError::InvalidTransition {
				from: other.name(),
				to: "submitting",
			}),
		}
	}

	fn finish(&mut self, outcome: Result<(), String>) {
		*self = match outcome {
			Ok(()) => ActionState::Done,
			Err(message) => ActionState::Failed(message),
		};
	}

	fn acknowledge(&mut self) -> Result<(), SelectorError> {
		match self {
			ActionState::Done | ActionState::Failed(_) => {
				*self = ActionState::Idle;
				Ok(())
			}
			other => Err(SelectorError::InvalidTransition {
				from: other.name(),
				to: "idle",
			}),
		}
	}
}

/// State of the list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
	#[default]
	Idle,
	Loading,
	Loaded,
	Failed(String),
}

/// A staged edit: the query being edited and the summary typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
	pub saved_query_id: String,
	pub draft: String,
}

/// A staged removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTarget {
	pub saved_query_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
	#[error("cannot move from {from} to {to}")]
	InvalidTransition {
		from: &'static str,
		to: &'static str,
	},

	#[error("saved query {0} is not in the list")]
	UnknownQuery(String),

	#[error("summary must not be empty")]
	EmptySummary,
}

type SelectCallback = Box<dyn FnMut(&SavedQueryResponse) + Send>;

/// List, selection and edit/remove state for one project's saved queries.
pub struct QuerySelector<A: SavedQueryApi> {
	api: Arc<A>,
	project_id: String,
	query_type: Option<String>,
	queries: Vec<SavedQueryResponse>,
	selected: Option<String>,
	fetch: FetchState,
	edit: ActionState<EditTarget>,
	remove: ActionState<RemoveTarget>,
	on_select: Option<SelectCallback>,
}

impl<A: SavedQueryApi> QuerySelector<A> {
	pub fn new(api: Arc<A>, project_id: impl Into<String>) -> Self {
		Self {
			api,
			project_id: project_id.into(),
			query_type: None,
			queries: Vec::new(),
			selected: None,
			fetch: FetchState::Idle,
			edit: ActionState::Idle,
			remove: ActionState::Idle,
			on_select: None,
		}
	}

	/// Only list queries of this type.
	pub fn with_type(mut self, query_type: impl Into<String>) -> Self {
		self.query_type = Some(query_type.into());
		self
	}

	/// Called with the chosen query on every [`select`](Self::select).
	pub fn on_select(mut self, callback: impl FnMut(&SavedQueryResponse) + Send + 'static) -> Self {
		self.on_select = Some(Box::new(callback));
		self
	}

	pub fn queries(&self) -> &[SavedQueryResponse] {
		&self.queries
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn fetch_state(&self) -> &FetchState {
		&self.fetch
	}

	pub fn edit_state(&self) -> &ActionState<EditTarget> {
		&self.edit
	}

	pub fn remove_state(&self) -> &ActionState<RemoveTarget> {
		&self.remove
	}

	/// True once a load finished with no queries.
	pub fn is_empty(&self) -> bool {
		self.fetch == FetchState::Loaded && self.queries.is_empty()
	}

	/// Fetch the list: `Loading`, then `Loaded` or `Failed`.
	pub async fn load(&mut self) {
		self.fetch = FetchState::Loading;
		match self
			.api
			.list(&self.project_id, self.query_type.as_deref())
			.await
		{
			Ok(queries) => {
				debug!(count = queries.len(), project_id = %self.project_id, "saved queries loaded");
				self.queries = queries;
				self.fetch = FetchState::Loaded;
			}
			Err(e) => {
				warn!(error = %e, project_id = %self.project_id, "failed to load saved queries");
				self.fetch = FetchState::Failed(e.user_message());
			}
		}
	}

	/// Mark a query as chosen and hand it to the select callback.
	pub fn select(&mut self, saved_query_id: &str) -> Result<&SavedQueryResponse, SelectorError> {
		let index = self.position(saved_query_id)?;
		self.selected = Some(saved_query_id.to_string());
		let query = &self.queries[index];
		if let Some(callback) = self.on_select.as_mut() {
			callback(query);
		}
		Ok(query)
	}

	/// Stage an edit with the draft pre-filled from the current summary.
	pub fn request_edit(&mut self, saved_query_id: &str) -> Result<(), SelectorError> {
		let index = self.position(saved_query_id)?;
		let draft = self.queries[index].summary.clone();
		self.edit.begin(EditTarget {
			saved_query_id: saved_query_id.to_string(),
			draft,
		})
	}

	/// Replace the draft summary of the staged edit.
	pub fn set_edit_draft(&mut self, draft: impl Into<String>) -> Result<(), SelectorError> {
		match &mut self.edit {
			ActionState::Confirming(target) => {
				target.draft = draft.into();
				Ok(())
			}
			other => Err(SelectorError::InvalidTransition {
				from: other.name(),
				to: "confirming",
			}),
		}
	}

	pub fn cancel_edit(&mut self) -> Result<(), SelectorError> {
		self.edit.cancel()
	}

	/// Submit the staged edit.
	///
	/// A blank draft is refused and the edit stays in `Confirming`. Otherwise
	/// the action ends in `Done` (list entry replaced) or `Failed`.
	pub async fn confirm_edit(&mut self) -> Result<(), SelectorError> {
		if let ActionState::Confirming(target) = &self.edit {
			if target.draft.trim().is_empty() {
				return Err(SelectorError::EmptySummary);
			}
		}

		let target = self.edit.submit()?;
		let result = self
			.api
			.update(&self.project_id, &target.saved_query_id, &target.draft)
			.await;

		match result {
			Ok(updated) => {
				if let Some(existing) = self.queries.iter_mut().find(|q| q.id == updated.id) {
					*existing = updated;
				}
				self.edit.finish(Ok(()));
			}
			Err(e) => {
				warn!(error = %e, saved_query_id = %target.saved_query_id, "saved query edit failed");
				self.edit.finish(Err(e.user_message()));
			}
		}
		Ok(())
	}

	pub fn acknowledge_edit(&mut self) -> Result<(), SelectorError> {
		self.edit.acknowledge()
	}

	/// Stage a removal awaiting confirmation.
	pub fn request_remove(&mut self, saved_query_id: &str) -> Result<(), SelectorError> {
		self.position(saved_query_id)?;
		self.remove.begin(RemoveTarget {
			saved_query_id: saved_query_id.to_string(),
		})
	}

	pub fn cancel_remove(&mut self) -> Result<(), SelectorError> {
		self.remove.cancel()
	}

	/// Submit the staged removal; ends in `Done` (entry dropped) or `Failed`.
	pub async fn confirm_remove(&mut self) -> Result<(), SelectorError> {
		let target = self.remove.submit()?;
		let result = self
			.api
			.remove(&self.project_id, &target.saved_query_id)
			.await;

		match result {
			Ok(_) => {
				self.queries.retain(|q| q.id != target.saved_query_id);
				if self.selected.as_deref() == Some(target.saved_query_id.as_str()) {
					self.selected = None;
				}
				self.remove.finish(Ok(()));
			}
			Err(e) => {
				warn!(error = %e, saved_query_id = %target.saved_query_id, "saved query removal failed");
				self.remove.finish(Err(e.user_message()));
			}
		}
		Ok(())
	}

	pub fn acknowledge_remove(&mut self) -> Result<(), SelectorError> {
		self.remove.acknowledge()
	}

	fn position(&self, saved_query_id: &str) -> Result<usize, SelectorError> {
		self
			.queries
			.iter()
			.position(|q| q.id == saved_query_id)
			.ok_or_else(|| SelectorError::UnknownQuery(saved_query_id.to_string()))
	}
}
