// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chartroom_server_api::{DatabaseHealth, HealthResponse, HealthStatus};
use sqlx::SqlitePool;

use crate::{api::AppState, version};

/// Probe the database with a trivial query and time it.
pub async fn check_database(pool: &SqlitePool) -> DatabaseHealth {
	use tokio::time::Instant;

	let start = Instant::now();
	let result = chartroom_server_db::ping(pool).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	match result {
		Ok(()) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			error: None,
		},
		Err(e) => {
			tracing::error!(error = %e, "database health check failed");
			DatabaseHealth {
				status: HealthStatus::Unhealthy,
				latency_ms,
				error: Some(e.to_string()),
			}
		}
	}
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - database connectivity check. No authentication.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = check_database(&state.pool).await;
	let status = database.status;

	let response = HealthResponse {
		status,
		timestamp: chrono::Utc::now().to_rfc3339(),
		version: version::current().to_string(),
		database,
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
