use crate::api::ErrorResponse;
use crate::error::{AppError, FieldError};
use crate::queries;
use crate::types::RecipeSummary;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// Number of recipes to skip (default: 0)
    pub skip: Option<i64>,
    /// Number of recipes to return (default: 100, max: 1000)
    pub limit: Option<i64>,
}

impl ListRecipesParams {
    /// Resolve defaults, reject negatives and cap the page size.
    fn resolve(&self) -> Result<(i64, i64), AppError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        let mut errors = Vec::new();
        if skip < 0 {
            errors.push(FieldError::new("skip", "must be greater than or equal to 0"));
        }
        if limit < 0 {
            errors.push(FieldError::new("limit", "must be greater than or equal to 0"));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok((skip, limit.min(MAX_LIMIT)))
    }
}

#[utoipa::path(
    get,
    path = "/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes, most viewed first, then by shortest cooking time", body = [RecipeSummary]),
        (status = 422, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(db): State<AppState>,
    params: Result<Query<ListRecipesParams>, QueryRejection>,
) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let Query(params) = params?;
    let (skip, limit) = params.resolve()?;

    let rows = db
        .transaction(move |conn| Ok(queries::list_recipes(conn, skip, limit)?))
        .await?;

    Ok(Json(rows.into_iter().map(RecipeSummary::from).collect()))
}
