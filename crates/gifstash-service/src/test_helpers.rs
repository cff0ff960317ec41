use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut connection)
        .expect("Failed to enable foreign keys");

    connection
        .run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    connection
}

pub mod test_utils {
    use super::*;
    use crate::models::{Favorite, NewUser, User};
    use crate::schema::{favorites, users};

    pub fn seed_user(conn: &mut SqliteConnection, username: &str) -> User {
        diesel::insert_into(users::table)
            .values(NewUser {
                username: username.to_string(),
                password: username.to_string(),
            })
            .returning(users::all_columns)
            .get_result(conn)
            .expect("Failed to seed user")
    }

    pub fn count_favorites(conn: &mut SqliteConnection) -> i64 {
        favorites::table
            .count()
            .get_result(conn)
            .expect("Failed to count favorites")
    }

    pub fn count_users(conn: &mut SqliteConnection) -> i64 {
        users::table
            .count()
            .get_result(conn)
            .expect("Failed to count users")
    }

    pub fn get_favorite_by_gif_id(
        conn: &mut SqliteConnection,
        gif_id: &str,
    ) -> Option<Favorite> {
        favorites::table
            .filter(favorites::gif_id.eq(gif_id))
            .first::<Favorite>(conn)
            .optional()
            .expect("Failed to query favorite by gif id")
    }
}
