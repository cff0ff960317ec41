use crate::validation::{self, ValidationError};
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// A saved GIF reference, scoped to its owning user.
///
/// `(user_id, gif_id)` is unique at the storage layer; rows are only ever
/// created and deleted, never updated.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::favorites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub gif_id: String,
    pub gif_url: String,
    pub gif_title: Option<String>,
    pub thumbnail_url: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub gif_id: String,
    pub gif_url: String,
    pub gif_title: Option<String>,
    pub thumbnail_url: String,
}

impl NewFavorite {
    pub fn new(
        user_id: i32,
        gif_id: String,
        gif_url: String,
        gif_title: Option<String>,
        thumbnail_url: String,
    ) -> Result<Self, ValidationError> {
        if gif_id.trim().is_empty() {
            return Err(ValidationError::MissingField("gifId"));
        }
        validation::validate_media_url(&gif_url)?;
        validation::validate_media_url(&thumbnail_url)?;

        Ok(NewFavorite {
            user_id,
            gif_id,
            gif_url,
            gif_title: gif_title.filter(|t| !t.trim().is_empty()),
            thumbnail_url,
        })
    }
}
