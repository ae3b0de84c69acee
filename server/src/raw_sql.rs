//! Raw SQL that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! Everything here is static SQL. No user input is ever concatenated into
//! these strings; values always go through `.bind()` or the query builder.
//!
//! When adding new SQL here:
//! 1. Document why Diesel DSL can't be used
//! 2. Keep it idempotent if it runs at startup
//! 3. Mirror any column change in `schema.rs`

/// Per-connection settings applied when the pool hands out a connection.
///
/// `foreign_keys` is off by default in SQLite and must be enabled on every
/// connection for `ON DELETE CASCADE` to fire.
///
/// # Why raw SQL?
/// Diesel has no DSL for PRAGMA statements.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; \
    PRAGMA busy_timeout = 5000;";

/// Table and index definitions.
///
/// Length and range CHECKs mirror the request validation so the store
/// rejects bad rows even when validation is bypassed.
///
/// # Why raw SQL?
/// Diesel's DSL only queries tables, it cannot declare them.
pub const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS recipes (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        title VARCHAR(255) NOT NULL
            CHECK (length(title) BETWEEN 1 AND 255),
        cooking_time INTEGER NOT NULL CHECK (cooking_time > 0),
        description TEXT NOT NULL,
        views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0)
    )",
    "CREATE INDEX IF NOT EXISTS ix_recipes_title ON recipes (title)",
    "CREATE INDEX IF NOT EXISTS ix_recipes_popularity \
        ON recipes (views DESC, cooking_time ASC)",
    "CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
        name VARCHAR(255) NOT NULL
            CHECK (length(name) BETWEEN 1 AND 255),
        quantity VARCHAR(100) NOT NULL
            CHECK (length(quantity) BETWEEN 1 AND 100),
        recipe_id INTEGER NOT NULL
            REFERENCES recipes (id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS ix_ingredients_recipe_id ON ingredients (recipe_id)",
    "CREATE TRIGGER IF NOT EXISTS ingredients_recipe_id_immutable
        BEFORE UPDATE OF recipe_id ON ingredients
        WHEN NEW.recipe_id IS NOT OLD.recipe_id
        BEGIN
            SELECT RAISE(ABORT, 'ingredients.recipe_id is immutable');
        END",
];
