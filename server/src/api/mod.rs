pub mod recipes;
pub mod root;

use axum::extract::MatchedPath;
use axum::http::Request;
use axum::{middleware, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::FieldError;
use crate::telemetry;
use crate::AppState;

pub const SWAGGER_UI_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field problems, present on validation failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Cookbook API", description = "Manage recipes and their ingredients"),
        components(schemas(ErrorResponse, FieldError))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> =
        vec![root::ApiDoc::openapi(), recipes::ApiDoc::openapi()];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

/// Build the full application: routes, docs, request tracing and query
/// counting.
pub fn app(state: AppState, track_db_query_count: bool) -> Router {
    let swagger_ui = SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi());

    let mut router = Router::new()
        .merge(root::router())
        .nest("/recipes", recipes::router())
        .merge(swagger_ui)
        .with_state(state);

    if track_db_query_count {
        router = router.layer(middleware::from_fn(
            telemetry::db_query_count_header_middleware,
        ));
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        let db_queries = telemetry::get_query_count().unwrap_or(0);
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                db_queries,
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                db_queries,
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
        // Outermost, so the counter exists before the trace span opens.
        .layer(middleware::from_fn(telemetry::query_counting_middleware))
}


#[cfg(test)]
mod tests {
    use super::test_support::test_app;
    use axum::http::StatusCode;

    #[test]
    fn test_openapi_lists_all_paths() {
        let spec = super::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/"));
        assert!(paths.iter().any(|p| p.as_str() == "/recipes"));
        assert!(paths.iter().any(|p| p.as_str() == "/recipes/{id}"));
    }

    #[tokio::test]
    async fn test_openapi_json_is_served() {
        let app = test_app().await;
        let response = app.get("/openapi.json").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["info"]["title"], "Cookbook API");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app().await;
        let response = app.get("/nope").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
