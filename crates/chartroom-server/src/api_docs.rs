// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for chartroom-server, generated with utoipa and served
//! as JSON at `/api/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use chartroom_server_api::{
	CreateSavedQueryRequest, DatabaseHealth, HealthResponse, HealthStatus, RemoveSavedQueryResponse,
	SavedQueryCreatorResponse, SavedQueryErrorResponse, SavedQueryResponse, UpdateSavedQueryRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chartroom Server API",
        version = "1.0.0",
        description = "Saved queries scoped to projects, guarded by team roles.",
        license(name = "Proprietary")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "saved-queries", description = "List, create, update and remove saved queries"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::saved_queries::list_saved_queries,
        crate::routes::saved_queries::create_saved_query,
        crate::routes::saved_queries::update_saved_query,
        crate::routes::saved_queries::remove_saved_query,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            SavedQueryResponse,
            SavedQueryCreatorResponse,
            CreateSavedQueryRequest,
            UpdateSavedQueryRequest,
            RemoveSavedQueryResponse,
            SavedQueryErrorResponse,
            HealthResponse,
            HealthStatus,
            DatabaseHealth,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the saved query paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		if let Some(components) = openapi.components.as_mut() {
			components.add_security_scheme(
				"bearer",
				SecurityScheme::Http(
					HttpBuilder::new()
						.scheme(HttpAuthScheme::Bearer)
						.description(Some("Session token"))
						.build(),
				),
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spec_has_saved_query_paths() {
		let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
		for path in [
			"/project/{project_id}/savedQuery",
			"/project/{project_id}/savedQuery/{id}",
			"/health",
		] {
			assert!(json.contains(path), "Missing path: {path}");
		}
	}

	#[test]
	fn spec_declares_bearer_scheme() {
		let spec = ApiDoc::openapi();
		let components = spec.components.unwrap();
		assert!(components.security_schemes.contains_key("bearer"));
	}
}
