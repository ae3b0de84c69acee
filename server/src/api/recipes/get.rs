use crate::api::ErrorResponse;
use crate::error::AppError;
use crate::queries;
use crate::types::RecipeDetail;
use crate::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details; counts as one view", body = RecipeDetail),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 422, description = "Invalid recipe ID", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(db): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RecipeDetail>, AppError> {
    let Path(id) = id?;

    let detail = db
        .immediate_transaction(move |conn| {
            let mut loaded =
                queries::find_recipe_with_ingredients(conn, id)?.ok_or(AppError::NotFound(id))?;
            loaded.recipe.views = queries::increment_views(conn, &loaded.recipe)?;
            Ok(RecipeDetail::from(loaded))
        })
        .await?;

    Ok(Json(detail))
}
