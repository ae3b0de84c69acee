use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::{OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use crate::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentationLinks {
    pub swagger: String,
    pub openapi: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EndpointInfo {
    pub method: String,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub description: String,
    pub documentation: DocumentationLinks,
    pub endpoints: Vec<EndpointInfo>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

#[derive(OpenApi)]
#[openapi(
    paths(index),
    components(schemas(IndexResponse, DocumentationLinks, EndpointInfo))
)]
pub struct ApiDoc;

fn endpoint(method: &str, path: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        method: method.to_string(),
        path: path.to_string(),
        description: description.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "index",
    responses(
        (status = 200, description = "Service description and endpoint index", body = IndexResponse)
    )
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Welcome to the Cookbook!".to_string(),
        description: "API for managing your recipes".to_string(),
        documentation: DocumentationLinks {
            swagger: SWAGGER_UI_PATH.to_string(),
            openapi: OPENAPI_JSON_PATH.to_string(),
        },
        endpoints: vec![
            endpoint("GET", "/recipes", "List all recipes, most viewed first"),
            endpoint(
                "GET",
                "/recipes/{id}",
                "Get one recipe with its ingredients (counts a view)",
            ),
            endpoint("POST", "/recipes", "Create a recipe with ingredients"),
        ],
    })
}
