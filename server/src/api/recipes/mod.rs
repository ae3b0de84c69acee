pub mod create;
pub mod get;
pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /recipes endpoints (mounted at /recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/{id}", get(get::get_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_recipes, get::get_recipe, create::create_recipe),
    components(schemas(
        crate::types::CreateRecipeRequest,
        crate::types::IngredientInput,
        crate::types::RecipeSummary,
        crate::types::RecipeDetail,
        crate::types::IngredientResponse,
    ))
)]
pub struct ApiDoc;
