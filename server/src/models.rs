use diesel::prelude::*;

use crate::schema::{ingredients, recipes};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub cooking_time: i32,
    pub description: String,
    pub views: i32,
}

#[derive(Insertable)]
#[diesel(table_name = recipes)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub cooking_time: i32,
    pub description: &'a str,
    pub views: i32,
}

// recipe_id is set once at insert time and never updated.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = ingredients)]
#[diesel(belongs_to(Recipe))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub quantity: String,
    // Read by `belonging_to` through the column, never through the field.
    #[allow(dead_code)]
    pub recipe_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub recipe_id: i32,
}

/// A recipe row together with all of its ingredients, ordered by insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWithIngredients {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}

/// Columns needed for the list view.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeListRow {
    pub id: i32,
    pub title: String,
    pub cooking_time: i32,
    pub views: i32,
}
