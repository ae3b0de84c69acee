use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::models::NewRecipe;
use crate::queries;
use crate::types::{CreateRecipeRequest, RecipeDetail};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    post,
    path = "/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeDetail),
        (status = 422, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_recipe(
    State(db): State<AppState>,
    payload: Result<Json<CreateRecipeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RecipeDetail>), AppError> {
    let Json(request) = payload?;
    request.validate().map_err(AppError::Validation)?;

    // Recipe and ingredients commit together or not at all
    let detail = db
        .immediate_transaction(move |conn| {
            let new_recipe = NewRecipe {
                title: &request.title,
                cooking_time: request.cooking_time,
                description: &request.description,
                views: 0,
            };
            let ingredients: Vec<(&str, &str)> = request
                .ingredients
                .iter()
                .map(|i| (i.name.as_str(), i.quantity.as_str()))
                .collect();

            let created = queries::create_recipe_with_ingredients(conn, &new_recipe, &ingredients)?;
            Ok(RecipeDetail::from(created))
        })
        .await?;

    tracing::info!(
        recipe_id = detail.id,
        ingredients = detail.ingredients.len(),
        "recipe created"
    );

    Ok((StatusCode::CREATED, Json(detail)))
}
