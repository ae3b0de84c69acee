//! Explicit data-access functions. Each takes the connection of an open
//! transaction (see `Database::transaction`) and returns plain rows.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::models::{
    Ingredient, NewIngredient, NewRecipe, Recipe, RecipeListRow, RecipeWithIngredients,
};
use crate::schema::{ingredients, recipes};

/// Recipes ordered by popularity: most viewed first, then quickest to cook.
pub fn list_recipes(
    conn: &mut SqliteConnection,
    skip: i64,
    limit: i64,
) -> QueryResult<Vec<RecipeListRow>> {
    recipes::table
        .order((recipes::views.desc(), recipes::cooking_time.asc()))
        .select(RecipeListRow::as_select())
        .limit(limit)
        .offset(skip)
        .load(conn)
}

/// Load a recipe and all of its ingredients in two statements.
pub fn find_recipe_with_ingredients(
    conn: &mut SqliteConnection,
    id: i32,
) -> QueryResult<Option<RecipeWithIngredients>> {
    let Some(recipe) = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let ingredients = Ingredient::belonging_to(&recipe)
        .select(Ingredient::as_select())
        .order(ingredients::id.asc())
        .load(conn)?;

    Ok(Some(RecipeWithIngredients {
        recipe,
        ingredients,
    }))
}

/// Store `recipe.views + 1` and return the new value.
///
/// Writes back the value that was read, so the read and this update must
/// share an immediate transaction (`Database::immediate_transaction`).
pub fn increment_views(conn: &mut SqliteConnection, recipe: &Recipe) -> QueryResult<i32> {
    let views = recipe.views + 1;
    diesel::update(recipes::table.find(recipe.id))
        .set(recipes::views.eq(views))
        .execute(conn)?;
    Ok(views)
}

pub fn insert_recipe(
    conn: &mut SqliteConnection,
    new_recipe: &NewRecipe<'_>,
) -> QueryResult<Recipe> {
    diesel::insert_into(recipes::table)
        .values(new_recipe)
        .returning(Recipe::as_returning())
        .get_result(conn)
}

/// Insert ingredients one row at a time, preserving input order.
pub fn insert_ingredients(
    conn: &mut SqliteConnection,
    new_ingredients: &[NewIngredient<'_>],
) -> QueryResult<Vec<Ingredient>> {
    new_ingredients
        .iter()
        .map(|ingredient| {
            diesel::insert_into(ingredients::table)
                .values(ingredient)
                .returning(Ingredient::as_returning())
                .get_result(conn)
        })
        .collect()
}

/// Insert a recipe, then its ingredients referencing the new id.
///
/// Must run inside a transaction: a failure on any ingredient leaves the
/// recipe row behind unless the caller rolls back.
pub fn create_recipe_with_ingredients(
    conn: &mut SqliteConnection,
    new_recipe: &NewRecipe<'_>,
    ingredients: &[(&str, &str)],
) -> QueryResult<RecipeWithIngredients> {
    let recipe = insert_recipe(conn, new_recipe)?;

    let new_ingredients: Vec<NewIngredient<'_>> = ingredients
        .iter()
        .map(|&(name, quantity)| NewIngredient {
            name,
            quantity,
            recipe_id: recipe.id,
        })
        .collect();

    let ingredients = insert_ingredients(conn, &new_ingredients)?;

    Ok(RecipeWithIngredients {
        recipe,
        ingredients,
    })
}

/// Delete a recipe. Its ingredients go with it through the foreign key's
/// `ON DELETE CASCADE`. Returns the number of recipes removed.
#[allow(dead_code)]
pub fn delete_recipe(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
    diesel::delete(recipes::table.find(id)).execute(conn)
}

pub fn count_recipes(conn: &mut SqliteConnection) -> QueryResult<i64> {
    recipes::table.count().get_result(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_db;
    use crate::error::AppError;

    fn count_ingredients(conn: &mut SqliteConnection, recipe_id: i32) -> QueryResult<i64> {
        ingredients::table
            .filter(ingredients::recipe_id.eq(recipe_id))
            .count()
            .get_result(conn)
    }

    fn new_recipe<'a>(title: &'a str, cooking_time: i32) -> NewRecipe<'a> {
        NewRecipe {
            title,
            cooking_time,
            description: "A perfectly fine description",
            views: 0,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_views_then_cooking_time() {
        let db = test_db().await;

        let rows = db
            .transaction(|conn| {
                insert_recipe(conn, &new_recipe("Slow", 90))?;
                insert_recipe(conn, &new_recipe("Quick", 10))?;
                let popular = insert_recipe(conn, &new_recipe("Popular", 120))?;
                increment_views(conn, &popular)?;
                Ok(list_recipes(conn, 0, 100)?)
            })
            .await
            .unwrap();

        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Popular", "Quick", "Slow"]);
    }

    #[tokio::test]
    async fn test_list_applies_skip_then_limit() {
        let db = test_db().await;

        let rows = db
            .transaction(|conn| {
                for minutes in 1..=5 {
                    insert_recipe(conn, &new_recipe("Dish", minutes))?;
                }
                Ok(list_recipes(conn, 1, 2)?)
            })
            .await
            .unwrap();

        let times: Vec<i32> = rows.iter().map(|r| r.cooking_time).collect();
        assert_eq!(times, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_find_missing_recipe_returns_none() {
        let db = test_db().await;
        let found = db
            .transaction(|conn| Ok(find_recipe_with_ingredients(conn, 9999)?))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_ingredients_load_in_insertion_order() {
        let db = test_db().await;

        let (created, loaded) = db
            .transaction(|conn| {
                let created = create_recipe_with_ingredients(
                    conn,
                    &new_recipe("Pancakes", 20),
                    &[("Flour", "200 g"), ("Milk", "300 ml"), ("Egg", "2 pcs")],
                )?;
                let loaded = find_recipe_with_ingredients(conn, created.recipe.id)?;
                Ok((created, loaded))
            })
            .await
            .unwrap();

        let loaded = loaded.unwrap();
        assert_eq!(loaded, created);
        let names: Vec<&str> = loaded.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Milk", "Egg"]);
        assert!(loaded
            .ingredients
            .iter()
            .all(|i| i.recipe_id == loaded.recipe.id));
    }

    #[tokio::test]
    async fn test_increment_views_adds_exactly_one() {
        let db = test_db().await;

        let views = db
            .transaction(|conn| {
                let recipe = insert_recipe(conn, &new_recipe("Toast", 3))?;
                let first = increment_views(conn, &recipe)?;
                let reread = find_recipe_with_ingredients(conn, recipe.id)?
                    .map(|r| r.recipe)
                    .ok_or(AppError::NotFound(recipe.id))?;
                let second = increment_views(conn, &reread)?;
                Ok((first, second))
            })
            .await
            .unwrap();

        assert_eq!(views, (1, 2));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_ingredients() {
        let db = test_db().await;

        let (deleted, remaining, recipes_left) = db
            .transaction(|conn| {
                let created = create_recipe_with_ingredients(
                    conn,
                    &new_recipe("Stew", 180),
                    &[("Beef", "1 kg"), ("Carrot", "3 pcs")],
                )?;
                let id = created.recipe.id;
                assert_eq!(count_ingredients(conn, id)?, 2);

                let deleted = delete_recipe(conn, id)?;
                Ok((deleted, count_ingredients(conn, id)?, count_recipes(conn)?))
            })
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(remaining, 0);
        assert_eq!(recipes_left, 0);
    }

    #[tokio::test]
    async fn test_failed_ingredient_rolls_back_recipe() {
        let db = test_db().await;
        let too_long = "x".repeat(300);

        let result = db
            .transaction(move |conn| {
                Ok(create_recipe_with_ingredients(
                    conn,
                    &new_recipe("Half done", 15),
                    &[("Salt", "1 tsp"), (too_long.as_str(), "1 pc")],
                )?)
            })
            .await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        let count = db
            .transaction(|conn| Ok(count_recipes(conn)?))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_orphan_ingredient_is_rejected() {
        let db = test_db().await;

        let result = db
            .transaction(|conn| {
                Ok(insert_ingredients(
                    conn,
                    &[NewIngredient {
                        name: "Ghost pepper",
                        quantity: "1 pc",
                        recipe_id: 12345,
                    }],
                )?)
            })
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_recipe_id_cannot_be_reassigned() {
        let db = test_db().await;

        let result = db
            .transaction(|conn| {
                let first = create_recipe_with_ingredients(
                    conn,
                    &new_recipe("One", 5),
                    &[("Rice", "1 cup")],
                )?;
                let second = insert_recipe(conn, &new_recipe("Two", 5))?;
                diesel::update(ingredients::table.find(first.ingredients[0].id))
                    .set(ingredients::recipe_id.eq(second.id))
                    .execute(conn)?;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
