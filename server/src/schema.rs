// Kept in sync by hand with the DDL in `raw_sql.rs`.

diesel::table! {
    recipes (id) {
        id -> Integer,
        title -> Text,
        cooking_time -> Integer,
        description -> Text,
        views -> Integer,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Integer,
        name -> Text,
        quantity -> Text,
        recipe_id -> Integer,
    }
}

diesel::joinable!(ingredients -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(ingredients, recipes,);
