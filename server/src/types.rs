//! Request and response shapes for the recipe endpoints.
//!
//! These are kept apart from the diesel rows in `models.rs`; the mapping
//! functions below are the only place the two meet, and they never copy
//! storage-only columns such as `recipe_id` into a response.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FieldError;
use crate::models::{Ingredient, RecipeListRow, RecipeWithIngredients};

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const INGREDIENT_NAME_MAX_CHARS: usize = 255;
pub const INGREDIENT_QUANTITY_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientInput {
    /// 1-255 characters
    #[schema(example = "Beet")]
    pub name: String,
    /// Free-form amount, 1-100 characters
    #[schema(example = "2 pcs")]
    pub quantity: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    /// 1-255 characters
    #[schema(example = "Borscht")]
    pub title: String,
    /// Minutes, greater than zero
    #[schema(example = 60)]
    pub cooking_time: i32,
    /// At least 10 characters
    #[schema(example = "Traditional soup with beets and cabbage")]
    pub description: String,
    /// May be empty
    pub ingredients: Vec<IngredientInput>,
}

impl CreateRecipeRequest {
    /// Check every field and report all failures at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        check_length(&mut errors, "title", &self.title, 1, TITLE_MAX_CHARS);

        if self.cooking_time <= 0 {
            errors.push(FieldError::new(
                "cooking_time",
                "must be greater than 0",
            ));
        }

        if self.description.chars().count() < DESCRIPTION_MIN_CHARS {
            errors.push(FieldError::new(
                "description",
                format!("must be at least {DESCRIPTION_MIN_CHARS} characters"),
            ));
        }

        for (i, ingredient) in self.ingredients.iter().enumerate() {
            check_length(
                &mut errors,
                &format!("ingredients[{i}].name"),
                &ingredient.name,
                1,
                INGREDIENT_NAME_MAX_CHARS,
            );
            check_length(
                &mut errors,
                &format!("ingredients[{i}].quantity"),
                &ingredient.quantity,
                1,
                INGREDIENT_QUANTITY_MAX_CHARS,
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_length(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            format!("must be at least {min} characters"),
        ));
    } else if len > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
}

/// List-view projection: no description, no ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: i32,
    pub title: String,
    pub cooking_time: i32,
    pub views: i32,
}

impl From<RecipeListRow> for RecipeSummary {
    fn from(row: RecipeListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            cooking_time: row.cooking_time,
            views: row.views,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub quantity: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            quantity: ingredient.quantity,
        }
    }
}

/// Detail-view projection with ingredients in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecipeDetail {
    pub id: i32,
    pub title: String,
    pub cooking_time: i32,
    pub description: String,
    pub views: i32,
    pub ingredients: Vec<IngredientResponse>,
}

impl From<RecipeWithIngredients> for RecipeDetail {
    fn from(loaded: RecipeWithIngredients) -> Self {
        let RecipeWithIngredients {
            recipe,
            ingredients,
        } = loaded;

        Self {
            id: recipe.id,
            title: recipe.title,
            cooking_time: recipe.cooking_time,
            description: recipe.description,
            views: recipe.views,
            ingredients: ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;

    fn valid_request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: "Borscht".to_string(),
            cooking_time: 60,
            description: "Traditional soup with beets and cabbage".to_string(),
            ingredients: vec![IngredientInput {
                name: "Beet".to_string(),
                quantity: "2 pcs".to_string(),
            }],
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_zero_ingredients_allowed() {
        let mut request = valid_request();
        request.ingredients.clear();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_short_description_rejected() {
        let mut request = valid_request();
        request.description = "Short".to_string();
        let errors = request.validate().unwrap_err();
        assert_eq!(fields(&errors), vec!["description"]);
    }

    #[test]
    fn test_description_boundary() {
        let mut request = valid_request();
        request.description = "0123456789".to_string();
        assert!(request.validate().is_ok());
        request.description = "012345678".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_title_bounds() {
        let mut request = valid_request();
        request.title = String::new();
        assert_eq!(fields(&request.validate().unwrap_err()), vec!["title"]);

        request.title = "a".repeat(255);
        assert!(request.validate().is_ok());

        request.title = "a".repeat(256);
        assert_eq!(fields(&request.validate().unwrap_err()), vec!["title"]);
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let mut request = valid_request();
        // 255 two-byte characters
        request.title = "б".repeat(255);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_cooking_time_must_be_positive() {
        let mut request = valid_request();
        request.cooking_time = 0;
        assert_eq!(fields(&request.validate().unwrap_err()), vec!["cooking_time"]);
        request.cooking_time = -5;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_ingredient_errors_name_their_index() {
        let mut request = valid_request();
        request.ingredients.push(IngredientInput {
            name: String::new(),
            quantity: "q".repeat(101),
        });
        let errors = request.validate().unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["ingredients[1].name", "ingredients[1].quantity"]
        );
    }

    #[test]
    fn test_all_errors_reported_together() {
        let request = CreateRecipeRequest {
            title: String::new(),
            cooking_time: 0,
            description: String::new(),
            ingredients: vec![],
        };
        assert_eq!(request.validate().unwrap_err().len(), 3);
    }

    #[test]
    fn test_detail_mapping_drops_recipe_id() {
        let loaded = RecipeWithIngredients {
            recipe: Recipe {
                id: 7,
                title: "Salted water".to_string(),
                cooking_time: 1,
                description: "Water, but salted".to_string(),
                views: 3,
            },
            ingredients: vec![Ingredient {
                id: 11,
                name: "Salt".to_string(),
                quantity: "1 tsp".to_string(),
                recipe_id: 7,
            }],
        };

        let detail = RecipeDetail::from(loaded);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Salted water",
                "cooking_time": 1,
                "description": "Water, but salted",
                "views": 3,
                "ingredients": [{"id": 11, "name": "Salt", "quantity": "1 tsp"}]
            })
        );
    }
}
